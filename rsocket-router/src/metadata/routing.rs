//! Routing (tagging) metadata: a sequence of length-prefixed UTF-8 route tags.

use crate::error::MetadataError;
use bytes::{BufMut, Bytes, BytesMut};

const MAX_TAG_LEN: usize = u8::MAX as usize;

/// Decoded content of a routing metadata entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingMetadata {
    routes: Vec<String>,
}

impl RoutingMetadata {
    pub fn decode(content: &Bytes) -> Result<Self, MetadataError> {
        let mut routes = Vec::new();
        let mut cursor = &content[..];

        while let Some((&len, rest)) = cursor.split_first() {
            let len = len as usize;
            if rest.len() < len {
                return Err(MetadataError::Truncated {
                    field: "route tag",
                    needed: len,
                    remaining: rest.len(),
                });
            }
            let (tag, rest) = rest.split_at(len);
            let tag = std::str::from_utf8(tag).map_err(|_| MetadataError::InvalidRoute)?;
            routes.push(tag.to_string());
            cursor = rest;
        }

        Ok(Self { routes })
    }

    /// The route that selects a handler; later tags are carried but unused.
    pub fn first(&self) -> Option<&str> {
        self.routes.first().map(String::as_str)
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Encodes route tags as routing metadata content.
pub fn encode_routing<S: AsRef<str>>(routes: &[S]) -> Result<Bytes, MetadataError> {
    let mut buffer = BytesMut::new();
    for route in routes {
        let route = route.as_ref();
        if route.is_empty() {
            return Err(MetadataError::EmptyTag);
        }
        if route.len() > MAX_TAG_LEN {
            return Err(MetadataError::TooLong {
                field: "route tag",
                len: route.len(),
                max: MAX_TAG_LEN,
            });
        }
        buffer.put_u8(route.len() as u8);
        buffer.put_slice(route.as_bytes());
    }
    Ok(buffer.freeze())
}
