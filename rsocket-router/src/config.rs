//! Per-connection router settings.

use crate::metadata::{MetadataEncoding, WellKnownMimeType};
use serde::{Deserialize, Serialize};

fn default_data_mime_type() -> String {
    WellKnownMimeType::APPLICATION_JSON.as_str().to_string()
}

/// Settings a [`crate::RoutedResponder`] applies to every interaction of its connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// How initiating payloads encode their metadata.
    pub metadata_encoding: MetadataEncoding,
    /// Data MIME type negotiated for the connection; carried for handlers, not interpreted.
    #[serde(default = "default_data_mime_type")]
    pub data_mime_type: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            metadata_encoding: MetadataEncoding::default(),
            data_mime_type: default_data_mime_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RouterConfig;
    use crate::metadata::MetadataEncoding;

    #[test]
    fn defaults_to_composite_metadata_and_json_data() {
        let config = RouterConfig::default();

        assert_eq!(config.metadata_encoding, MetadataEncoding::Composite);
        assert_eq!(config.data_mime_type, "application/json");
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config: RouterConfig =
            serde_json::from_str(r#"{ "metadata_encoding": "routing" }"#).unwrap();

        assert_eq!(config.metadata_encoding, MetadataEncoding::Routing);
        assert_eq!(config.data_mime_type, "application/json");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<RouterConfig>(r#"{ "mime": "x" }"#).is_err());
    }
}
