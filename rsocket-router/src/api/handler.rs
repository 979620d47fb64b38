//! Handler contracts, one per interaction kind.
//!
//! Applications implement these (or pass closures); the dispatcher is the only caller.

use crate::error::RouterError;
use crate::payload::Payload;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;

/// Lazy, cancellable sequence of payloads terminated by completion or one error.
///
/// Dropping the stream cancels it.
pub type PayloadStream = BoxStream<'static, Result<Payload, RouterError>>;

#[async_trait]
pub trait FireAndForgetHandler: Send + Sync {
    async fn handle(&self, payload: Payload) -> Result<(), RouterError>;
}

#[async_trait]
pub trait RequestResponseHandler: Send + Sync {
    async fn handle(&self, payload: Payload) -> Result<Payload, RouterError>;
}

pub trait RequestStreamHandler: Send + Sync {
    fn handle(&self, payload: Payload) -> PayloadStream;
}

/// The full-duplex kind: `payloads` starts with the frame that carried the route.
pub trait RequestChannelHandler: Send + Sync {
    fn handle(&self, payloads: PayloadStream) -> PayloadStream;
}

#[async_trait]
impl<F, Fut> FireAndForgetHandler for F
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), RouterError>> + Send + 'static,
{
    async fn handle(&self, payload: Payload) -> Result<(), RouterError> {
        (self)(payload).await
    }
}

#[async_trait]
impl<F, Fut> RequestResponseHandler for F
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Payload, RouterError>> + Send + 'static,
{
    async fn handle(&self, payload: Payload) -> Result<Payload, RouterError> {
        (self)(payload).await
    }
}

impl<F> RequestStreamHandler for F
where
    F: Fn(Payload) -> PayloadStream + Send + Sync,
{
    fn handle(&self, payload: Payload) -> PayloadStream {
        (self)(payload)
    }
}

impl<F> RequestChannelHandler for F
where
    F: Fn(PayloadStream) -> PayloadStream + Send + Sync,
{
    fn handle(&self, payloads: PayloadStream) -> PayloadStream {
        (self)(payloads)
    }
}

/// A stream that fails immediately with `err`.
pub fn error_stream(err: RouterError) -> PayloadStream {
    stream::once(async move { Err(err) }).boxed()
}

/// A finite stream of successful payloads.
pub fn payload_stream<I>(payloads: I) -> PayloadStream
where
    I: IntoIterator<Item = Payload>,
    I::IntoIter: Send + 'static,
{
    stream::iter(payloads.into_iter().map(Ok)).boxed()
}

#[cfg(test)]
mod tests {
    use super::{
        error_stream, payload_stream, FireAndForgetHandler, PayloadStream, RequestChannelHandler,
        RequestResponseHandler, RequestStreamHandler,
    };
    use crate::error::RouterError;
    use crate::payload::Payload;
    use futures::StreamExt;

    #[tokio::test]
    async fn closures_act_as_single_value_handlers() {
        let echo = |payload: Payload| async move { Ok::<_, RouterError>(payload) };
        let sink = |_payload: Payload| async move { Ok::<_, RouterError>(()) };

        let reply = RequestResponseHandler::handle(&echo, Payload::from("hi"))
            .await
            .unwrap();
        assert_eq!(reply.data_utf8(), "hi");
        assert!(FireAndForgetHandler::handle(&sink, Payload::from("x"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn closures_act_as_stream_handlers() {
        let repeat = |payload: Payload| -> PayloadStream {
            payload_stream(vec![payload.clone(), payload])
        };
        let passthrough = |payloads: PayloadStream| -> PayloadStream { payloads };

        let out: Vec<_> = RequestStreamHandler::handle(&repeat, Payload::from("a"))
            .collect()
            .await;
        assert_eq!(out.len(), 2);

        let echoed: Vec<_> =
            RequestChannelHandler::handle(&passthrough, payload_stream(vec![Payload::from("b")]))
                .collect()
                .await;
        assert_eq!(echoed, vec![Ok(Payload::from("b"))]);
    }

    #[tokio::test]
    async fn error_stream_yields_exactly_one_error() {
        let items: Vec<_> = error_stream(RouterError::application("boom"))
            .collect()
            .await;

        assert_eq!(items, vec![Err(RouterError::application("boom"))]);
    }
}
