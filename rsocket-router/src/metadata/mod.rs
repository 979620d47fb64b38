/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Metadata layer.
//!
//! Decomposes the metadata buffer of an initiating payload into MIME-keyed views
//! and derives the routing key from the first routing entry.
//!
//! ```
//! use rsocket_router::metadata::{extract_route, CompositeMetadataBuilder, MetadataEncoding};
//!
//! let metadata = CompositeMetadataBuilder::new()
//!     .add_entry("application/x.trace", b"span-1")
//!     .unwrap()
//!     .add_routing(&["echo", "ignored"])
//!     .unwrap()
//!     .build();
//!
//! let route = extract_route(Some(&metadata), MetadataEncoding::Composite).unwrap();
//! assert_eq!(route.as_deref(), Some("echo"));
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod composite;
pub mod mime;
pub mod routing;

pub use composite::{CompositeEntry, CompositeMetadata, CompositeMetadataBuilder, MimeKey};
pub use mime::WellKnownMimeType;
pub use routing::{encode_routing, RoutingMetadata};

use crate::error::MetadataError;

/// How a connection's payload metadata buffers are encoded.
///
/// Negotiated once at setup through the metadata MIME type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataEncoding {
    /// `message/x.rsocket.composite-metadata.v0`
    #[default]
    Composite,
    /// `message/x.rsocket.routing.v0`: the whole buffer is one routing entry.
    Routing,
}

impl MetadataEncoding {
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime == WellKnownMimeType::MESSAGE_RSOCKET_COMPOSITE_METADATA.as_str() {
            Some(MetadataEncoding::Composite)
        } else if mime == WellKnownMimeType::MESSAGE_RSOCKET_ROUTING.as_str() {
            Some(MetadataEncoding::Routing)
        } else {
            None
        }
    }

    pub fn mime(&self) -> WellKnownMimeType {
        match self {
            MetadataEncoding::Composite => WellKnownMimeType::MESSAGE_RSOCKET_COMPOSITE_METADATA,
            MetadataEncoding::Routing => WellKnownMimeType::MESSAGE_RSOCKET_ROUTING,
        }
    }
}

/// Typed view of one metadata entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetadataView {
    Routing(RoutingMetadata),
    Raw(Bytes),
}

/// Metadata entries keyed by MIME type. When a key repeats, the first entry wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedMetadata {
    entries: HashMap<String, MetadataView>,
}

impl ParsedMetadata {
    pub fn get(&self, mime: &str) -> Option<&MetadataView> {
        self.entries.get(mime)
    }

    pub fn routing(&self) -> Option<&RoutingMetadata> {
        match self.get(WellKnownMimeType::MESSAGE_RSOCKET_ROUTING.as_str()) {
            Some(MetadataView::Routing(routing)) => Some(routing),
            _ => None,
        }
    }

    /// The routing key, `None` when there is no routing entry or it holds no usable tag.
    pub fn route(&self) -> Option<&str> {
        self.routing()
            .and_then(RoutingMetadata::first)
            .filter(|route| !route.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, mime: &str, content: Bytes) -> Result<(), MetadataError> {
        if self.entries.contains_key(mime) {
            return Ok(());
        }
        let view = if mime == WellKnownMimeType::MESSAGE_RSOCKET_ROUTING.as_str() {
            MetadataView::Routing(RoutingMetadata::decode(&content)?)
        } else {
            MetadataView::Raw(content)
        };
        self.entries.insert(mime.to_string(), view);
        Ok(())
    }
}

/// Decodes every entry of `buffer`; any malformed entry fails the whole buffer.
pub fn parse_metadata(
    buffer: &Bytes,
    encoding: MetadataEncoding,
) -> Result<ParsedMetadata, MetadataError> {
    let mut parsed = ParsedMetadata::default();
    match encoding {
        MetadataEncoding::Composite => {
            for entry in CompositeMetadata::new(buffer.clone()) {
                let CompositeEntry { mime, content } = entry?;
                // reserved ids carry nothing the router can key on
                if let Some(mime) = mime.as_str() {
                    parsed.insert(mime, content)?;
                }
            }
        }
        MetadataEncoding::Routing => {
            parsed.insert(
                WellKnownMimeType::MESSAGE_RSOCKET_ROUTING.as_str(),
                buffer.clone(),
            )?;
        }
    }
    Ok(parsed)
}

/// Routing key of an initiating payload's metadata, if any.
pub fn extract_route(
    metadata: Option<&Bytes>,
    encoding: MetadataEncoding,
) -> Result<Option<String>, MetadataError> {
    let Some(buffer) = metadata else {
        return Ok(None);
    };
    let parsed = parse_metadata(buffer, encoding)?;
    Ok(parsed.route().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::{
        encode_routing, extract_route, parse_metadata, CompositeMetadataBuilder,
        MetadataEncoding, MetadataView, WellKnownMimeType,
    };
    use crate::error::MetadataError;
    use bytes::Bytes;

    #[test]
    fn routing_entry_after_other_entries_is_found() {
        let metadata = CompositeMetadataBuilder::new()
            .add_well_known(WellKnownMimeType::MESSAGE_RSOCKET_TRACING_ZIPKIN, b"\x00")
            .unwrap()
            .add_custom("application/x.tenant", b"acme")
            .unwrap()
            .add_routing(&["orders"])
            .unwrap()
            .build();

        let parsed = parse_metadata(&metadata, MetadataEncoding::Composite).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.route(), Some("orders"));
        assert_eq!(
            parsed.get("application/x.tenant"),
            Some(&MetadataView::Raw(Bytes::from_static(b"acme")))
        );
    }

    #[test]
    fn reserved_entry_before_routing_is_skipped() {
        let mut raw = vec![0xD0, 0x00, 0x00, 0x01, 0xAA];
        let routing = CompositeMetadataBuilder::new()
            .add_routing(&["echo"])
            .unwrap()
            .build();
        raw.extend_from_slice(&routing);
        let metadata = Bytes::from(raw);

        let parsed = parse_metadata(&metadata, MetadataEncoding::Composite).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(
            extract_route(Some(&metadata), MetadataEncoding::Composite).unwrap(),
            Some("echo".to_string())
        );
    }

    #[test]
    fn first_routing_entry_wins() {
        let metadata = CompositeMetadataBuilder::new()
            .add_routing(&["first"])
            .unwrap()
            .add_routing(&["second"])
            .unwrap()
            .build();

        assert_eq!(
            extract_route(Some(&metadata), MetadataEncoding::Composite).unwrap(),
            Some("first".to_string())
        );
    }

    #[test]
    fn routing_mime_spelled_out_still_matches() {
        let content = encode_routing(&["spelled"]).unwrap();
        let metadata = CompositeMetadataBuilder::new()
            .add_custom("message/x.rsocket.routing.v0", &content)
            .unwrap()
            .build();

        assert_eq!(
            extract_route(Some(&metadata), MetadataEncoding::Composite).unwrap(),
            Some("spelled".to_string())
        );
    }

    #[test]
    fn absent_metadata_and_empty_routing_resolve_to_no_route() {
        assert_eq!(
            extract_route(None, MetadataEncoding::Composite).unwrap(),
            None
        );

        let metadata = CompositeMetadataBuilder::new()
            .add_well_known(WellKnownMimeType::MESSAGE_RSOCKET_ROUTING, b"")
            .unwrap()
            .build();
        assert_eq!(
            extract_route(Some(&metadata), MetadataEncoding::Composite).unwrap(),
            None
        );

        let empty_tag = Bytes::from_static(&[0x00]);
        assert_eq!(
            extract_route(Some(&empty_tag), MetadataEncoding::Routing).unwrap(),
            None
        );
    }

    #[test]
    fn bare_routing_encoding_reads_whole_buffer_as_tags() {
        let metadata = encode_routing(&["stream.ticks"]).unwrap();

        assert_eq!(
            extract_route(Some(&metadata), MetadataEncoding::Routing).unwrap(),
            Some("stream.ticks".to_string())
        );
    }

    #[test]
    fn malformed_entry_anywhere_fails_extraction() {
        let mut raw = CompositeMetadataBuilder::new()
            .add_routing(&["echo"])
            .unwrap()
            .build()
            .to_vec();
        raw.extend_from_slice(&[0xFE, 0x00]);

        assert!(matches!(
            extract_route(Some(&Bytes::from(raw)), MetadataEncoding::Composite),
            Err(MetadataError::Truncated { .. })
        ));
    }

    #[test]
    fn encoding_negotiated_from_mime() {
        assert_eq!(
            MetadataEncoding::from_mime("message/x.rsocket.routing.v0"),
            Some(MetadataEncoding::Routing)
        );
        assert_eq!(MetadataEncoding::from_mime("application/json"), None);
        assert_eq!(
            MetadataEncoding::Composite.mime(),
            WellKnownMimeType::MESSAGE_RSOCKET_COMPOSITE_METADATA
        );
    }
}
