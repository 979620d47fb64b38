//! Interaction-boundary guards: panics become failed interactions and a failing
//! stream stops at its first error.

use crate::api::handler::PayloadStream;
use crate::error::RouterError;
use crate::interaction::InteractionKind;
use crate::observability::events;
use futures::future::{self, FutureExt};
use futures::stream::StreamExt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

const COMPONENT: &str = "interaction_guard";

fn panicked(kind: InteractionKind, route: &str, interaction_id: &str) -> RouterError {
    error!(
        event = events::INTERACTION_HANDLER_PANICKED,
        component = COMPONENT,
        interaction_id,
        %kind,
        route,
        "handler panicked; failing the interaction"
    );
    RouterError::HandlerPanicked {
        kind,
        route: route.to_string(),
    }
}

/// Runs a synchronous handler entry point, converting a panic into an error.
pub(crate) fn guard_call<T>(
    kind: InteractionKind,
    route: &str,
    interaction_id: &str,
    call: impl FnOnce() -> T,
) -> Result<T, RouterError> {
    catch_unwind(AssertUnwindSafe(call)).map_err(|_| panicked(kind, route, interaction_id))
}

/// Awaits a handler future, converting a panic while polling into an error.
pub(crate) async fn guard_future<T, F>(
    kind: InteractionKind,
    route: String,
    interaction_id: String,
    future: F,
) -> Result<T, RouterError>
where
    F: Future<Output = Result<T, RouterError>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(panicked(kind, &route, &interaction_id)),
    }
}

/// Wraps a handler stream so a panic while polling ends it with one error.
pub(crate) fn guard_stream(
    kind: InteractionKind,
    route: String,
    interaction_id: String,
    stream: PayloadStream,
) -> PayloadStream {
    let guarded = AssertUnwindSafe(stream)
        .catch_unwind()
        .map(move |item| match item {
            Ok(item) => item,
            Err(_) => Err(panicked(kind, &route, &interaction_id)),
        });
    terminate_on_error(guarded.boxed())
}

/// Delivers the first error as the terminal signal and nothing after it.
pub(crate) fn terminate_on_error(stream: PayloadStream) -> PayloadStream {
    stream
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::{guard_call, guard_future, guard_stream, terminate_on_error};
    use crate::api::handler::PayloadStream;
    use crate::error::RouterError;
    use crate::interaction::InteractionKind;
    use crate::payload::Payload;
    use futures::stream::{self, StreamExt};

    #[test]
    fn panicking_call_becomes_handler_panicked() {
        let result: Result<(), _> = guard_call(InteractionKind::RequestStream, "ticks", "id", || {
            panic!("boom")
        });

        assert_eq!(
            result,
            Err(RouterError::HandlerPanicked {
                kind: InteractionKind::RequestStream,
                route: "ticks".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn panicking_future_becomes_handler_panicked() {
        let result: Result<Payload, _> = guard_future(
            InteractionKind::RequestResponse,
            "echo".to_string(),
            "id".to_string(),
            async { panic!("boom") },
        )
        .await;

        assert!(matches!(result, Err(RouterError::HandlerPanicked { .. })));
    }

    #[tokio::test]
    async fn stream_panic_mid_flight_ends_with_one_error() {
        let source: PayloadStream = stream::iter(0..3)
            .map(|n| {
                if n == 1 {
                    panic!("boom");
                }
                Ok(Payload::from(n.to_string()))
            })
            .boxed();

        let items: Vec<_> = guard_stream(
            InteractionKind::RequestChannel,
            "chat".to_string(),
            "id".to_string(),
            source,
        )
        .collect()
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Ok(Payload::from("0".to_string())));
        assert!(matches!(items[1], Err(RouterError::HandlerPanicked { .. })));
    }

    #[tokio::test]
    async fn nothing_is_delivered_after_the_first_error() {
        let source: PayloadStream = stream::iter(vec![
            Ok(Payload::from("a")),
            Err(RouterError::application("first")),
            Ok(Payload::from("b")),
            Err(RouterError::application("second")),
        ])
        .boxed();

        let items: Vec<_> = terminate_on_error(source).collect().await;

        assert_eq!(
            items,
            vec![
                Ok(Payload::from("a")),
                Err(RouterError::application("first"))
            ]
        );
    }
}
