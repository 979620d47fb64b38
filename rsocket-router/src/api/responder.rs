//! The responder surface a connection drives, one method per interaction kind.

use crate::api::handler::{error_stream, PayloadStream};
use crate::error::RouterError;
use crate::interaction::InteractionKind;
use crate::payload::Payload;
use async_trait::async_trait;

/// Server-side acceptor of interactions for one connection.
///
/// The default bodies are the protocol fallbacks: result-bearing kinds fail
/// with [`RouterError::Unimplemented`], fire-and-forget completes without effect.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn fire_and_forget(&self, payload: Payload) -> Result<(), RouterError> {
        fallback_fire_and_forget(payload)
    }

    async fn request_response(&self, payload: Payload) -> Result<Payload, RouterError> {
        fallback_request_response(payload)
    }

    fn request_stream(&self, payload: Payload) -> PayloadStream {
        fallback_request_stream(payload)
    }

    fn request_channel(&self, payloads: PayloadStream) -> PayloadStream {
        fallback_request_channel(payloads)
    }
}

pub(crate) fn fallback_fire_and_forget(payload: Payload) -> Result<(), RouterError> {
    drop(payload);
    Ok(())
}

pub(crate) fn fallback_request_response(payload: Payload) -> Result<Payload, RouterError> {
    drop(payload);
    Err(RouterError::unimplemented(InteractionKind::RequestResponse))
}

pub(crate) fn fallback_request_stream(payload: Payload) -> PayloadStream {
    drop(payload);
    error_stream(RouterError::unimplemented(InteractionKind::RequestStream))
}

pub(crate) fn fallback_request_channel(payloads: PayloadStream) -> PayloadStream {
    drop(payloads);
    error_stream(RouterError::unimplemented(InteractionKind::RequestChannel))
}
