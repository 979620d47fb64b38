//! Error types for metadata parsing, interaction dispatch and route-table builds.

use crate::interaction::InteractionKind;
use thiserror::Error;

/// Failures while decoding or encoding composite and routing metadata.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata truncated while reading {field}: need {needed} byte(s), {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
    #[error("invalid mime type: {0}")]
    InvalidMimeType(String),
    #[error("route tag is not valid UTF-8")]
    InvalidRoute,
    #[error("route tag must not be empty")]
    EmptyTag,
    #[error("{field} of {len} bytes exceeds the maximum of {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Terminal failure of a single interaction.
///
/// Every variant is contained to the interaction that produced it; none of them
/// invalidates the connection or the route table.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("{kind} not implemented")]
    Unimplemented { kind: InteractionKind },
    #[error("malformed metadata: {0}")]
    MalformedMetadata(#[from] MetadataError),
    #[error("application error: {0}")]
    Application(String),
    #[error("{kind} handler for route {route:?} panicked")]
    HandlerPanicked { kind: InteractionKind, route: String },
    #[error("unsupported setup: {0}")]
    UnsupportedSetup(String),
    #[error("setup rejected: {0}")]
    Rejected(String),
}

impl RouterError {
    pub fn application(message: impl Into<String>) -> Self {
        RouterError::Application(message.into())
    }

    pub fn unimplemented(kind: InteractionKind) -> Self {
        RouterError::Unimplemented { kind }
    }
}

/// Build-time handler resolution failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouteConfigError {
    #[error("no {kind} handler registered under name {name:?}")]
    UnknownHandler { name: String, kind: InteractionKind },
    #[error("{kind} handler factory {name:?} failed: {reason}")]
    FactoryFailed {
        name: String,
        kind: InteractionKind,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{MetadataError, RouteConfigError, RouterError};
    use crate::interaction::InteractionKind;

    #[test]
    fn metadata_errors_convert_into_router_errors() {
        let err: RouterError = MetadataError::InvalidRoute.into();

        assert_eq!(
            err,
            RouterError::MalformedMetadata(MetadataError::InvalidRoute)
        );
        assert_eq!(
            err.to_string(),
            "malformed metadata: route tag is not valid UTF-8"
        );
    }

    #[test]
    fn unimplemented_mentions_interaction_kind() {
        let err = RouterError::unimplemented(InteractionKind::RequestStream);

        assert_eq!(err.to_string(), "request-stream not implemented");
    }

    #[test]
    fn unknown_handler_names_the_missing_factory() {
        let err = RouteConfigError::UnknownHandler {
            name: "com.example.Missing".to_string(),
            kind: InteractionKind::RequestResponse,
        };

        assert!(err.to_string().contains("\"com.example.Missing\""));
    }
}
