//! Routes each interaction to the handler its first frame names.

use crate::api::handler::{
    error_stream, FireAndForgetHandler, PayloadStream, RequestChannelHandler,
    RequestResponseHandler, RequestStreamHandler,
};
use crate::api::responder::{
    fallback_fire_and_forget, fallback_request_channel, fallback_request_response,
    fallback_request_stream, Responder,
};
use crate::config::RouterConfig;
use crate::control_plane::route_table::{RouteTable, Routes};
use crate::data_plane::guard::{guard_call, guard_future, guard_stream};
use crate::error::RouterError;
use crate::interaction::InteractionKind;
use crate::metadata::{extract_route, MetadataEncoding};
use crate::observability::{events, fields};
use crate::payload::Payload;
use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const COMPONENT: &str = "dispatcher";

pub(crate) enum Resolution<H: ?Sized> {
    Handler { route: String, handler: Arc<H> },
    Unrouted,
}

/// Looks up the handler for `payload` in the `kind` namespace of the table.
///
/// A route present only under another kind resolves to [`Resolution::Unrouted`].
pub(crate) fn resolve<H: ?Sized>(
    kind: InteractionKind,
    routes: &Routes<H>,
    encoding: MetadataEncoding,
    payload: &Payload,
    interaction_id: &str,
) -> Result<Resolution<H>, RouterError> {
    trace!(
        event = events::INTERACTION_RECEIVED,
        component = COMPONENT,
        interaction_id,
        %kind,
        inbound = ?kind.inbound(),
        outbound = ?kind.outbound(),
        payload = %fields::format_payload(payload),
        "interaction received"
    );

    let route = match extract_route(payload.metadata(), encoding) {
        Ok(route) => route,
        Err(err) => {
            warn!(
                event = events::INTERACTION_METADATA_MALFORMED,
                component = COMPONENT,
                interaction_id,
                %kind,
                error = %err,
                "failing interaction with malformed metadata"
            );
            return Err(err.into());
        }
    };

    let handler = route
        .as_deref()
        .and_then(|route| routes.get(route))
        .cloned();
    match (route, handler) {
        (Some(route), Some(handler)) => {
            debug!(
                event = events::INTERACTION_DISPATCHED,
                component = COMPONENT,
                interaction_id,
                %kind,
                route = route.as_str(),
                "dispatching to handler"
            );
            Ok(Resolution::Handler { route, handler })
        }
        (route, _) => {
            debug!(
                event = events::INTERACTION_UNROUTED,
                component = COMPONENT,
                interaction_id,
                %kind,
                route = fields::format_route(route.as_deref()),
                "no handler for route; using protocol fallback"
            );
            Ok(Resolution::Unrouted)
        }
    }
}

/// The per-connection router: a [`Responder`] backed by a shared [`RouteTable`].
///
/// Holds no per-interaction state, so one instance serves every concurrent
/// interaction of its connection.
pub struct RoutedResponder {
    routes: Arc<RouteTable>,
    config: RouterConfig,
}

impl RoutedResponder {
    pub fn new(routes: Arc<RouteTable>, config: RouterConfig) -> Self {
        Self { routes, config }
    }

    /// Router with composite metadata and `application/json` data.
    pub fn from_table(routes: RouteTable) -> Self {
        Self::new(Arc::new(routes), RouterConfig::default())
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    pub fn metadata_encoding(&self) -> MetadataEncoding {
        self.config.metadata_encoding
    }

    pub fn data_mime_type(&self) -> &str {
        &self.config.data_mime_type
    }
}

#[async_trait]
impl Responder for RoutedResponder {
    async fn fire_and_forget(&self, payload: Payload) -> Result<(), RouterError> {
        let kind = InteractionKind::FireAndForget;
        let interaction_id = fields::new_interaction_id();
        let resolution: Resolution<dyn FireAndForgetHandler> = resolve(
            kind,
            self.routes.fire_and_forget(),
            self.config.metadata_encoding,
            &payload,
            &interaction_id,
        )?;

        match resolution {
            Resolution::Unrouted => fallback_fire_and_forget(payload),
            Resolution::Handler { route, handler } => {
                guard_future(kind, route, interaction_id, async move {
                    handler.handle(payload).await
                })
                .await
            }
        }
    }

    async fn request_response(&self, payload: Payload) -> Result<Payload, RouterError> {
        let kind = InteractionKind::RequestResponse;
        let interaction_id = fields::new_interaction_id();
        let resolution: Resolution<dyn RequestResponseHandler> = resolve(
            kind,
            self.routes.request_response(),
            self.config.metadata_encoding,
            &payload,
            &interaction_id,
        )?;

        match resolution {
            Resolution::Unrouted => fallback_request_response(payload),
            Resolution::Handler { route, handler } => {
                guard_future(kind, route, interaction_id, async move {
                    handler.handle(payload).await
                })
                .await
            }
        }
    }

    fn request_stream(&self, payload: Payload) -> PayloadStream {
        let kind = InteractionKind::RequestStream;
        let interaction_id = fields::new_interaction_id();
        let resolution: Result<Resolution<dyn RequestStreamHandler>, _> = resolve(
            kind,
            self.routes.request_stream(),
            self.config.metadata_encoding,
            &payload,
            &interaction_id,
        );

        match resolution {
            Err(err) => error_stream(err),
            Ok(Resolution::Unrouted) => fallback_request_stream(payload),
            Ok(Resolution::Handler { route, handler }) => {
                match guard_call(kind, &route, &interaction_id, || handler.handle(payload)) {
                    Ok(outbound) => guard_stream(kind, route, interaction_id, outbound),
                    Err(err) => error_stream(err),
                }
            }
        }
    }

    /// Nothing is read from `payloads` until the returned stream is polled.
    fn request_channel(&self, payloads: PayloadStream) -> PayloadStream {
        let kind = InteractionKind::RequestChannel;
        let routes = Arc::clone(&self.routes);
        let encoding = self.config.metadata_encoding;
        let interaction_id = fields::new_interaction_id();

        stream::once(async move {
            let (first, rest) = payloads.into_future().await;
            let first = match first {
                Some(Ok(first)) => first,
                Some(Err(err)) => {
                    warn!(
                        event = events::CHANNEL_FIRST_FRAME_FAILED,
                        component = COMPONENT,
                        interaction_id = interaction_id.as_str(),
                        error = %err,
                        "inbound channel failed before its first frame"
                    );
                    return error_stream(err);
                }
                None => {
                    debug!(
                        event = events::CHANNEL_EMPTY,
                        component = COMPONENT,
                        interaction_id = interaction_id.as_str(),
                        "inbound channel completed without a frame"
                    );
                    return fallback_request_channel(rest);
                }
            };

            let resolution: Result<Resolution<dyn RequestChannelHandler>, _> = resolve(
                kind,
                routes.request_channel(),
                encoding,
                &first,
                &interaction_id,
            );
            match resolution {
                Err(err) => {
                    drop(first);
                    error_stream(err)
                }
                Ok(Resolution::Unrouted) => {
                    drop(first);
                    fallback_request_channel(rest)
                }
                Ok(Resolution::Handler { route, handler }) => {
                    let inbound = stream::once(future::ready(Ok::<_, RouterError>(first)))
                        .chain(rest)
                        .boxed();
                    match guard_call(kind, &route, &interaction_id, || handler.handle(inbound)) {
                        Ok(outbound) => guard_stream(kind, route, interaction_id, outbound),
                        Err(err) => error_stream(err),
                    }
                }
            }
        })
        .flatten()
        .boxed()
    }
}
