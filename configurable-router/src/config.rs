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

use rsocket_router::{HandlerRegistry, InteractionKind, RouteConfigError, RouteTable, RouterConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("unable to parse configuration: {0}")]
    Parse(#[from] json5::Error),
    #[error("route {route:?}: {source}")]
    Route {
        route: String,
        source: RouteConfigError,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub kind: InteractionKind,
    pub route: String,
    /// Name the handler was registered under in the [`HandlerRegistry`].
    pub handler: String,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!("loaded configuration from {}", path.display());
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(json5::from_str(text)?)
    }

    /// Resolves every configured route; the first unknown handler name aborts.
    pub fn route_table(&self, registry: &HandlerRegistry) -> Result<RouteTable, ConfigError> {
        let mut builder = RouteTable::builder();
        for route in &self.routes {
            builder = builder
                .add_named(route.kind, route.route.as_str(), &route.handler, registry)
                .map_err(|source| ConfigError::Route {
                    route: route.route.clone(),
                    source,
                })?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};
    use crate::handlers::builtin_registry;
    use rsocket_router::metadata::MetadataEncoding;
    use rsocket_router::{InteractionKind, RouteConfigError};

    #[test]
    fn bundled_default_config_resolves() {
        let config = Config::parse(include_str!("../DEFAULT_CONFIG.json5")).unwrap();

        let table = config.route_table(&builtin_registry()).unwrap();

        assert_eq!(config.router.metadata_encoding, MetadataEncoding::Composite);
        assert_eq!(table.len(), config.routes.len());
        assert!(table.contains(InteractionKind::RequestResponse, "echo"));
    }

    #[test]
    fn router_section_is_optional() {
        let config = Config::parse(
            r#"{
                // comments are allowed
                routes: [{ kind: "request-stream", route: "ticks", handler: "repeat" }],
            }"#,
        )
        .unwrap();

        assert_eq!(config.router.data_mime_type, "application/json");
        assert_eq!(config.routes[0].kind, InteractionKind::RequestStream);
    }

    #[test]
    fn unknown_handler_names_abort() {
        let config = Config::parse(
            r#"{ routes: [{ kind: "request-response", route: "orders", handler: "missing" }] }"#,
        )
        .unwrap();

        let err = config.route_table(&builtin_registry()).err();

        assert!(matches!(
            err,
            Some(ConfigError::Route {
                ref route,
                source: RouteConfigError::UnknownHandler { .. },
            }) if route == "orders"
        ));
    }

    #[test]
    fn unknown_interaction_kinds_are_parse_errors() {
        let err =
            Config::parse(r#"{ routes: [{ kind: "metadata-push", route: "x", handler: "echo" }] }"#)
                .err();

        assert!(matches!(err, Some(ConfigError::Parse(_))));
    }
}
