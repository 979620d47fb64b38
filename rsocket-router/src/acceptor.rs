//! Connection setup: picks the route table and router settings for a new connection.

use crate::config::RouterConfig;
use crate::control_plane::route_table::RouteTable;
use crate::data_plane::dispatcher::RoutedResponder;
use crate::error::RouterError;
use crate::metadata::{extract_route, MetadataEncoding};
use crate::observability::events;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

const COMPONENT: &str = "acceptor";

/// The SETUP frame fields the router consults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupPayload {
    pub metadata_mime_type: String,
    pub data_mime_type: String,
    pub metadata: Option<Bytes>,
    pub data: Bytes,
}

impl SetupPayload {
    pub fn new(metadata_mime_type: impl Into<String>, data_mime_type: impl Into<String>) -> Self {
        Self {
            metadata_mime_type: metadata_mime_type.into(),
            data_mime_type: data_mime_type.into(),
            metadata: None,
            data: Bytes::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<Bytes>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }
}

/// Decides whether a connection may be established.
///
/// `route` is the setup route already extracted from the setup metadata.
pub trait SetupAuthenticator: Send + Sync {
    fn authenticate(&self, setup: &SetupPayload, route: Option<&str>) -> Result<(), RouterError>;
}

impl<F> SetupAuthenticator for F
where
    F: Fn(&SetupPayload, Option<&str>) -> Result<(), RouterError> + Send + Sync,
{
    fn authenticate(&self, setup: &SetupPayload, route: Option<&str>) -> Result<(), RouterError> {
        (self)(setup, route)
    }
}

/// Accepts every connection.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl SetupAuthenticator for AllowAll {
    fn authenticate(&self, _setup: &SetupPayload, _route: Option<&str>) -> Result<(), RouterError> {
        Ok(())
    }
}

/// Builds one [`RoutedResponder`] per accepted connection.
///
/// A setup route naming a registered endpoint selects that endpoint's table;
/// every other connection is served by the default table.
pub struct RouterAcceptor {
    default_routes: Arc<RouteTable>,
    endpoints: HashMap<String, Arc<RouteTable>>,
    authenticator: Arc<dyn SetupAuthenticator>,
}

impl RouterAcceptor {
    pub fn new(default_routes: RouteTable) -> Self {
        Self {
            default_routes: Arc::new(default_routes),
            endpoints: HashMap::new(),
            authenticator: Arc::new(AllowAll),
        }
    }

    pub fn with_endpoint(mut self, setup_route: impl Into<String>, routes: RouteTable) -> Self {
        self.endpoints.insert(setup_route.into(), Arc::new(routes));
        self
    }

    pub fn with_authenticator<A>(mut self, authenticator: A) -> Self
    where
        A: SetupAuthenticator + 'static,
    {
        self.authenticator = Arc::new(authenticator);
        self
    }

    /// Registered endpoint setup routes, sorted.
    pub fn endpoints(&self) -> Vec<&str> {
        let mut endpoints: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        endpoints.sort_unstable();
        endpoints
    }

    pub fn accept(&self, setup: &SetupPayload) -> Result<Arc<RoutedResponder>, RouterError> {
        match self.try_accept(setup) {
            Ok((route, responder)) => {
                info!(
                    event = events::SETUP_ACCEPTED,
                    component = COMPONENT,
                    setup_route = route.as_deref().unwrap_or("<default>"),
                    metadata_mime_type = setup.metadata_mime_type.as_str(),
                    data_mime_type = responder.data_mime_type(),
                    "connection accepted"
                );
                Ok(responder)
            }
            Err(err) => {
                warn!(
                    event = events::SETUP_REJECTED,
                    component = COMPONENT,
                    metadata_mime_type = setup.metadata_mime_type.as_str(),
                    error = %err,
                    "connection rejected"
                );
                Err(err)
            }
        }
    }

    fn try_accept(
        &self,
        setup: &SetupPayload,
    ) -> Result<(Option<String>, Arc<RoutedResponder>), RouterError> {
        let metadata_encoding =
            MetadataEncoding::from_mime(&setup.metadata_mime_type).ok_or_else(|| {
                RouterError::UnsupportedSetup(format!(
                    "metadata mime type {:?}",
                    setup.metadata_mime_type
                ))
            })?;

        let route = extract_route(setup.metadata.as_ref(), metadata_encoding)?;
        self.authenticator.authenticate(setup, route.as_deref())?;

        let routes = route
            .as_deref()
            .and_then(|route| self.endpoints.get(route))
            .unwrap_or(&self.default_routes);

        let mut config = RouterConfig {
            metadata_encoding,
            ..RouterConfig::default()
        };
        if !setup.data_mime_type.is_empty() {
            config.data_mime_type = setup.data_mime_type.clone();
        }

        let responder = RoutedResponder::new(Arc::clone(routes), config);
        Ok((route, Arc::new(responder)))
    }
}
