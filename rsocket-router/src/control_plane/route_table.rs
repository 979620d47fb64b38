//! Immutable per-kind route table and its builder.

use crate::api::handler::{
    FireAndForgetHandler, RequestChannelHandler, RequestResponseHandler, RequestStreamHandler,
};
use crate::control_plane::registry::HandlerRegistry;
use crate::error::RouteConfigError;
use crate::interaction::InteractionKind;
use crate::observability::events;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "route_table";

pub(crate) type Routes<H> = HashMap<String, Arc<H>>;

/// Route name -> handler, one independent namespace per interaction kind.
///
/// Only [`RouteTableBuilder::build`] creates a table; it is read-only afterwards
/// and can be shared across any number of concurrent interactions.
#[derive(Default)]
pub struct RouteTable {
    fire_and_forget: Routes<dyn FireAndForgetHandler>,
    request_response: Routes<dyn RequestResponseHandler>,
    request_stream: Routes<dyn RequestStreamHandler>,
    request_channel: Routes<dyn RequestChannelHandler>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub(crate) fn fire_and_forget(&self) -> &Routes<dyn FireAndForgetHandler> {
        &self.fire_and_forget
    }

    pub(crate) fn request_response(&self) -> &Routes<dyn RequestResponseHandler> {
        &self.request_response
    }

    pub(crate) fn request_stream(&self) -> &Routes<dyn RequestStreamHandler> {
        &self.request_stream
    }

    pub(crate) fn request_channel(&self) -> &Routes<dyn RequestChannelHandler> {
        &self.request_channel
    }

    /// Registered route names for `kind`, sorted.
    pub fn routes(&self, kind: InteractionKind) -> Vec<&str> {
        let mut routes: Vec<&str> = match kind {
            InteractionKind::FireAndForget => keys(&self.fire_and_forget),
            InteractionKind::RequestResponse => keys(&self.request_response),
            InteractionKind::RequestStream => keys(&self.request_stream),
            InteractionKind::RequestChannel => keys(&self.request_channel),
        };
        routes.sort_unstable();
        routes
    }

    pub fn contains(&self, kind: InteractionKind, route: &str) -> bool {
        match kind {
            InteractionKind::FireAndForget => self.fire_and_forget.contains_key(route),
            InteractionKind::RequestResponse => self.request_response.contains_key(route),
            InteractionKind::RequestStream => self.request_stream.contains_key(route),
            InteractionKind::RequestChannel => self.request_channel.contains_key(route),
        }
    }

    pub fn len(&self) -> usize {
        self.fire_and_forget.len()
            + self.request_response.len()
            + self.request_stream.len()
            + self.request_channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn keys<H: ?Sized>(routes: &Routes<H>) -> Vec<&str> {
    routes.keys().map(String::as_str).collect()
}

impl Display for RouteTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RouteTable{{request-response={:?}, fire-and-forget={:?}, request-stream={:?}, request-channel={:?}}}",
            self.routes(InteractionKind::RequestResponse),
            self.routes(InteractionKind::FireAndForget),
            self.routes(InteractionKind::RequestStream),
            self.routes(InteractionKind::RequestChannel),
        )
    }
}

impl Debug for RouteTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Accumulates `(route, handler)` pairs per interaction kind.
///
/// Registering the same route twice under one kind keeps the last handler.
#[derive(Default)]
pub struct RouteTableBuilder {
    table: RouteTable,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fire_and_forget<H>(self, route: impl Into<String>, handler: H) -> Self
    where
        H: FireAndForgetHandler + 'static,
    {
        self.add_fire_and_forget_arc(route, Arc::new(handler))
    }

    pub fn add_fire_and_forget_arc(
        mut self,
        route: impl Into<String>,
        handler: Arc<dyn FireAndForgetHandler>,
    ) -> Self {
        insert(
            &mut self.table.fire_and_forget,
            route.into(),
            handler,
            InteractionKind::FireAndForget,
        );
        self
    }

    pub fn add_request_response<H>(self, route: impl Into<String>, handler: H) -> Self
    where
        H: RequestResponseHandler + 'static,
    {
        self.add_request_response_arc(route, Arc::new(handler))
    }

    pub fn add_request_response_arc(
        mut self,
        route: impl Into<String>,
        handler: Arc<dyn RequestResponseHandler>,
    ) -> Self {
        insert(
            &mut self.table.request_response,
            route.into(),
            handler,
            InteractionKind::RequestResponse,
        );
        self
    }

    pub fn add_request_stream<H>(self, route: impl Into<String>, handler: H) -> Self
    where
        H: RequestStreamHandler + 'static,
    {
        self.add_request_stream_arc(route, Arc::new(handler))
    }

    pub fn add_request_stream_arc(
        mut self,
        route: impl Into<String>,
        handler: Arc<dyn RequestStreamHandler>,
    ) -> Self {
        insert(
            &mut self.table.request_stream,
            route.into(),
            handler,
            InteractionKind::RequestStream,
        );
        self
    }

    pub fn add_request_channel<H>(self, route: impl Into<String>, handler: H) -> Self
    where
        H: RequestChannelHandler + 'static,
    {
        self.add_request_channel_arc(route, Arc::new(handler))
    }

    pub fn add_request_channel_arc(
        mut self,
        route: impl Into<String>,
        handler: Arc<dyn RequestChannelHandler>,
    ) -> Self {
        insert(
            &mut self.table.request_channel,
            route.into(),
            handler,
            InteractionKind::RequestChannel,
        );
        self
    }

    /// Resolves `handler_name` through `registry`; an unresolvable name fails the build.
    pub fn add_fire_and_forget_named(
        self,
        route: impl Into<String>,
        handler_name: &str,
        registry: &HandlerRegistry,
    ) -> Result<Self, RouteConfigError> {
        let handler = registry.resolve_fire_and_forget(handler_name)?;
        Ok(self.add_fire_and_forget_arc(route, handler))
    }

    pub fn add_request_response_named(
        self,
        route: impl Into<String>,
        handler_name: &str,
        registry: &HandlerRegistry,
    ) -> Result<Self, RouteConfigError> {
        let handler = registry.resolve_request_response(handler_name)?;
        Ok(self.add_request_response_arc(route, handler))
    }

    pub fn add_request_stream_named(
        self,
        route: impl Into<String>,
        handler_name: &str,
        registry: &HandlerRegistry,
    ) -> Result<Self, RouteConfigError> {
        let handler = registry.resolve_request_stream(handler_name)?;
        Ok(self.add_request_stream_arc(route, handler))
    }

    pub fn add_request_channel_named(
        self,
        route: impl Into<String>,
        handler_name: &str,
        registry: &HandlerRegistry,
    ) -> Result<Self, RouteConfigError> {
        let handler = registry.resolve_request_channel(handler_name)?;
        Ok(self.add_request_channel_arc(route, handler))
    }

    /// Kind-directed variant of the `add_*_named` family, for table-driven configuration.
    pub fn add_named(
        self,
        kind: InteractionKind,
        route: impl Into<String>,
        handler_name: &str,
        registry: &HandlerRegistry,
    ) -> Result<Self, RouteConfigError> {
        match kind {
            InteractionKind::FireAndForget => {
                self.add_fire_and_forget_named(route, handler_name, registry)
            }
            InteractionKind::RequestResponse => {
                self.add_request_response_named(route, handler_name, registry)
            }
            InteractionKind::RequestStream => {
                self.add_request_stream_named(route, handler_name, registry)
            }
            InteractionKind::RequestChannel => {
                self.add_request_channel_named(route, handler_name, registry)
            }
        }
    }

    pub fn build(self) -> RouteTable {
        info!(
            event = events::ROUTE_TABLE_BUILT,
            component = COMPONENT,
            routes = self.table.len(),
            "{}",
            self.table
        );
        self.table
    }
}

fn insert<H: ?Sized>(routes: &mut Routes<H>, route: String, handler: Arc<H>, kind: InteractionKind) {
    if routes.insert(route.clone(), handler).is_some() {
        warn!(
            event = events::ROUTE_REPLACED,
            component = COMPONENT,
            %kind,
            route = route.as_str(),
            "replacing previously registered handler"
        );
    } else {
        debug!(
            event = events::ROUTE_REGISTERED,
            component = COMPONENT,
            %kind,
            route = route.as_str(),
            "registered route"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::RouteTable;
    use crate::api::handler::{payload_stream, PayloadStream};
    use crate::control_plane::registry::HandlerRegistry;
    use crate::error::{RouteConfigError, RouterError};
    use crate::interaction::InteractionKind;
    use crate::payload::Payload;

    fn reply(
        text: &'static str,
    ) -> impl Fn(Payload) -> std::future::Ready<Result<Payload, RouterError>> {
        move |_payload| std::future::ready(Ok(Payload::from(text)))
    }

    #[tokio::test]
    async fn last_registration_for_a_route_wins() {
        let table = RouteTable::builder()
            .add_request_response("echo", reply("first"))
            .add_request_response("echo", reply("second"))
            .build();

        let handler = table.request_response().get("echo").cloned().unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(handler.handle(Payload::default()).await.unwrap().data_utf8(), "second");
    }

    #[test]
    fn same_name_under_two_kinds_is_independent() {
        let table = RouteTable::builder()
            .add_request_response("ticks", reply("one"))
            .add_request_stream("ticks", |payload: Payload| -> PayloadStream {
                payload_stream(vec![payload])
            })
            .build();

        assert!(table.contains(InteractionKind::RequestResponse, "ticks"));
        assert!(table.contains(InteractionKind::RequestStream, "ticks"));
        assert!(!table.contains(InteractionKind::RequestChannel, "ticks"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn routes_are_listed_sorted_per_kind() {
        let table = RouteTable::builder()
            .add_fire_and_forget("zeta", |_payload: Payload| async { Ok::<_, RouterError>(()) })
            .add_fire_and_forget("alpha", |_payload: Payload| async { Ok::<_, RouterError>(()) })
            .build();

        assert_eq!(table.routes(InteractionKind::FireAndForget), vec!["alpha", "zeta"]);
        assert!(table.routes(InteractionKind::RequestResponse).is_empty());
        assert!(table.to_string().contains("fire-and-forget=[\"alpha\", \"zeta\"]"));
    }

    #[test]
    fn named_registration_fails_the_build_for_unknown_handlers() {
        let mut registry = HandlerRegistry::new();
        registry.register_request_response("print", || Ok(reply("printed")));

        let builder = RouteTable::builder()
            .add_request_response_named("print", "print", &registry)
            .unwrap();
        let err = builder
            .add_named(InteractionKind::RequestResponse, "lost", "io.example.Missing", &registry)
            .err();

        assert_eq!(
            err,
            Some(RouteConfigError::UnknownHandler {
                name: "io.example.Missing".to_string(),
                kind: InteractionKind::RequestResponse,
            })
        );
    }

    #[test]
    fn empty_builder_builds_empty_table() {
        assert!(RouteTable::builder().build().is_empty());
    }
}
