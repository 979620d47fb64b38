//! Named handler factories used to late-bind route-table entries.

use crate::api::handler::{
    FireAndForgetHandler, RequestChannelHandler, RequestResponseHandler, RequestStreamHandler,
};
use crate::error::RouteConfigError;
use crate::interaction::InteractionKind;
use crate::observability::events;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "handler_registry";

type Factory<H> = Arc<dyn Fn() -> Result<Arc<H>, String> + Send + Sync>;
type Factories<H> = HashMap<String, Factory<H>>;

/// Symbolic handler name -> constructor, per interaction kind.
///
/// A registry may be layered over a parent: lookups try the local factories
/// first and then walk up the parent chain.
/// A factory that returns an error or panics resolves to
/// [`RouteConfigError::FactoryFailed`].
#[derive(Default)]
pub struct HandlerRegistry {
    parent: Option<Arc<HandlerRegistry>>,
    fire_and_forget: Factories<dyn FireAndForgetHandler>,
    request_response: Factories<dyn RequestResponseHandler>,
    request_stream: Factories<dyn RequestStreamHandler>,
    request_channel: Factories<dyn RequestChannelHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scoped registry that falls back to `parent` for names it does not know.
    pub fn with_parent(parent: Arc<HandlerRegistry>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn register_fire_and_forget<H, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        H: FireAndForgetHandler + 'static,
        F: Fn() -> Result<H, String> + Send + Sync + 'static,
    {
        let factory: Factory<dyn FireAndForgetHandler> = Arc::new(move || {
            factory().map(|handler| Arc::new(handler) as Arc<dyn FireAndForgetHandler>)
        });
        register(&mut self.fire_and_forget, name.into(), factory, InteractionKind::FireAndForget);
        self
    }

    pub fn register_request_response<H, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        H: RequestResponseHandler + 'static,
        F: Fn() -> Result<H, String> + Send + Sync + 'static,
    {
        let factory: Factory<dyn RequestResponseHandler> = Arc::new(move || {
            factory().map(|handler| Arc::new(handler) as Arc<dyn RequestResponseHandler>)
        });
        register(
            &mut self.request_response,
            name.into(),
            factory,
            InteractionKind::RequestResponse,
        );
        self
    }

    pub fn register_request_stream<H, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        H: RequestStreamHandler + 'static,
        F: Fn() -> Result<H, String> + Send + Sync + 'static,
    {
        let factory: Factory<dyn RequestStreamHandler> = Arc::new(move || {
            factory().map(|handler| Arc::new(handler) as Arc<dyn RequestStreamHandler>)
        });
        register(&mut self.request_stream, name.into(), factory, InteractionKind::RequestStream);
        self
    }

    pub fn register_request_channel<H, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        H: RequestChannelHandler + 'static,
        F: Fn() -> Result<H, String> + Send + Sync + 'static,
    {
        let factory: Factory<dyn RequestChannelHandler> = Arc::new(move || {
            factory().map(|handler| Arc::new(handler) as Arc<dyn RequestChannelHandler>)
        });
        register(
            &mut self.request_channel,
            name.into(),
            factory,
            InteractionKind::RequestChannel,
        );
        self
    }

    pub fn resolve_fire_and_forget(
        &self,
        name: &str,
    ) -> Result<Arc<dyn FireAndForgetHandler>, RouteConfigError> {
        self.resolve(|registry| &registry.fire_and_forget, name, InteractionKind::FireAndForget)
    }

    pub fn resolve_request_response(
        &self,
        name: &str,
    ) -> Result<Arc<dyn RequestResponseHandler>, RouteConfigError> {
        self.resolve(
            |registry| &registry.request_response,
            name,
            InteractionKind::RequestResponse,
        )
    }

    pub fn resolve_request_stream(
        &self,
        name: &str,
    ) -> Result<Arc<dyn RequestStreamHandler>, RouteConfigError> {
        self.resolve(|registry| &registry.request_stream, name, InteractionKind::RequestStream)
    }

    pub fn resolve_request_channel(
        &self,
        name: &str,
    ) -> Result<Arc<dyn RequestChannelHandler>, RouteConfigError> {
        self.resolve(|registry| &registry.request_channel, name, InteractionKind::RequestChannel)
    }

    /// Names resolvable for `kind`, including inherited ones, sorted.
    pub fn names(&self, kind: InteractionKind) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(registry) = current {
            let local: Vec<&String> = match kind {
                InteractionKind::FireAndForget => registry.fire_and_forget.keys().collect(),
                InteractionKind::RequestResponse => registry.request_response.keys().collect(),
                InteractionKind::RequestStream => registry.request_stream.keys().collect(),
                InteractionKind::RequestChannel => registry.request_channel.keys().collect(),
            };
            names.extend(local.into_iter().cloned());
            current = registry.parent.as_deref();
        }
        names.sort();
        names.dedup();
        names
    }

    fn resolve<H: ?Sized>(
        &self,
        select: impl Fn(&HandlerRegistry) -> &Factories<H>,
        name: &str,
        kind: InteractionKind,
    ) -> Result<Arc<H>, RouteConfigError> {
        let mut current = Some(self);
        while let Some(registry) = current {
            if let Some(factory) = select(registry).get(name) {
                let built = catch_unwind(AssertUnwindSafe(|| factory()))
                    .unwrap_or_else(|panic| Err(panic_reason(panic.as_ref())));
                return built.map_err(|reason| {
                    warn!(
                        event = events::HANDLER_RESOLVE_FAILED,
                        component = COMPONENT,
                        handler = name,
                        %kind,
                        reason = reason.as_str(),
                        "handler factory failed"
                    );
                    RouteConfigError::FactoryFailed {
                        name: name.to_string(),
                        kind,
                        reason,
                    }
                });
            }
            current = registry.parent.as_deref();
        }

        warn!(
            event = events::HANDLER_RESOLVE_FAILED,
            component = COMPONENT,
            handler = name,
            %kind,
            reason = "unknown_handler",
            "no handler factory registered under this name"
        );
        Err(RouteConfigError::UnknownHandler {
            name: name.to_string(),
            kind,
        })
    }
}

fn register<H: ?Sized>(
    factories: &mut Factories<H>,
    name: String,
    factory: Factory<H>,
    kind: InteractionKind,
) {
    debug!(
        event = events::HANDLER_REGISTERED,
        component = COMPONENT,
        handler = name.as_str(),
        %kind,
        "registering handler factory"
    );
    factories.insert(name, factory);
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    let message = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("factory panicked: {message}")
}
