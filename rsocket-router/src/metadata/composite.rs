//! Composite metadata decoding and encoding.
//!
//! Entry layout:
//!
//! ```text
//! +-+-------------+----------------------+-----------------+-------------+
//! |M| id or len-1 | mime (custom only)   | content length  | content     |
//! +-+-------------+----------------------+-----------------+-------------+
//!  1 bit  7 bits    len bytes, US-ASCII    24 bit unsigned   length bytes
//! ```

use crate::error::MetadataError;
use crate::metadata::mime::WellKnownMimeType;
use crate::metadata::routing::encode_routing;
use bytes::{Buf, BufMut, Bytes, BytesMut};

const WELL_KNOWN_FLAG: u8 = 0x80;
const MAX_CUSTOM_MIME_LEN: usize = 128;
const MAX_CONTENT_LEN: usize = 0xFF_FFFF;

/// The MIME key of one composite entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MimeKey {
    WellKnown(WellKnownMimeType),
    Custom(String),
    /// Well-known id with no registry entry yet; its content is kept but has no MIME string.
    Reserved(u8),
}

impl MimeKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MimeKey::WellKnown(known) => Some(known.as_str()),
            MimeKey::Custom(mime) => Some(mime),
            MimeKey::Reserved(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeEntry {
    pub mime: MimeKey,
    pub content: Bytes,
}

impl CompositeEntry {
    pub fn mime_type(&self) -> Option<&str> {
        self.mime.as_str()
    }
}

/// Lazy, zero-copy iterator over the entries of a composite metadata buffer.
///
/// Content slices share the original allocation. The iterator yields at most
/// one error and then stops.
pub struct CompositeMetadata {
    remaining: Bytes,
    failed: bool,
}

impl CompositeMetadata {
    pub fn new(buffer: Bytes) -> Self {
        Self {
            remaining: buffer,
            failed: false,
        }
    }

    fn take(&mut self, field: &'static str, needed: usize) -> Result<Bytes, MetadataError> {
        if self.remaining.len() < needed {
            return Err(MetadataError::Truncated {
                field,
                needed,
                remaining: self.remaining.len(),
            });
        }
        Ok(self.remaining.split_to(needed))
    }

    fn decode_entry(&mut self) -> Result<CompositeEntry, MetadataError> {
        let header = self.take("mime header", 1)?[0];

        let mime = if header & WELL_KNOWN_FLAG != 0 {
            let id = header & !WELL_KNOWN_FLAG;
            WellKnownMimeType::from_id(id).map_or(MimeKey::Reserved(id), MimeKey::WellKnown)
        } else {
            let mime_len = (header as usize) + 1;
            let raw = self.take("mime type", mime_len)?;
            if !raw.is_ascii() {
                return Err(MetadataError::InvalidMimeType(
                    String::from_utf8_lossy(&raw).into_owned(),
                ));
            }
            MimeKey::Custom(String::from_utf8_lossy(&raw).into_owned())
        };

        let mut length = self.take("content length", 3)?;
        let content_len = length.get_uint(3) as usize;
        let content = self.take("content", content_len)?;

        Ok(CompositeEntry { mime, content })
    }
}

impl Iterator for CompositeMetadata {
    type Item = Result<CompositeEntry, MetadataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining.is_empty() {
            return None;
        }
        let entry = self.decode_entry();
        if entry.is_err() {
            self.failed = true;
        }
        Some(entry)
    }
}

impl std::iter::FusedIterator for CompositeMetadata {}

/// Incremental writer for composite metadata buffers.
#[derive(Default)]
pub struct CompositeMetadataBuilder {
    buffer: BytesMut,
}

impl CompositeMetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_well_known(
        &mut self,
        mime: WellKnownMimeType,
        content: &[u8],
    ) -> Result<&mut Self, MetadataError> {
        check_content_len(content)?;
        self.buffer.put_u8(WELL_KNOWN_FLAG | mime.id());
        self.put_content(content);
        Ok(self)
    }

    /// Adds an entry under `mime`, using the compact well-known form when one exists.
    pub fn add_entry(&mut self, mime: &str, content: &[u8]) -> Result<&mut Self, MetadataError> {
        match WellKnownMimeType::from_mime(mime) {
            Some(known) => self.add_well_known(known, content),
            None => self.add_custom(mime, content),
        }
    }

    /// Adds an entry that always spells out its MIME string.
    pub fn add_custom(&mut self, mime: &str, content: &[u8]) -> Result<&mut Self, MetadataError> {
        if mime.is_empty() || !mime.is_ascii() {
            return Err(MetadataError::InvalidMimeType(mime.to_string()));
        }
        if mime.len() > MAX_CUSTOM_MIME_LEN {
            return Err(MetadataError::TooLong {
                field: "mime type",
                len: mime.len(),
                max: MAX_CUSTOM_MIME_LEN,
            });
        }
        check_content_len(content)?;
        self.buffer.put_u8((mime.len() - 1) as u8);
        self.buffer.put_slice(mime.as_bytes());
        self.put_content(content);
        Ok(self)
    }

    pub fn add_routing<S: AsRef<str>>(&mut self, routes: &[S]) -> Result<&mut Self, MetadataError> {
        let content = encode_routing(routes)?;
        self.add_well_known(WellKnownMimeType::MESSAGE_RSOCKET_ROUTING, &content)
    }

    pub fn build(&mut self) -> Bytes {
        std::mem::take(&mut self.buffer).freeze()
    }

    fn put_content(&mut self, content: &[u8]) {
        self.buffer.put_uint(content.len() as u64, 3);
        self.buffer.put_slice(content);
    }
}

fn check_content_len(content: &[u8]) -> Result<(), MetadataError> {
    if content.len() > MAX_CONTENT_LEN {
        return Err(MetadataError::TooLong {
            field: "entry content",
            len: content.len(),
            max: MAX_CONTENT_LEN,
        });
    }
    Ok(())
}
