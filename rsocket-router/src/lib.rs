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


//! # rsocket-router
//!
//! `rsocket-router` dispatches the interactions of one multiplexed RSocket
//! connection to application handlers, keyed by the route carried in the
//! metadata of each interaction's first frame.
//!
//! The transport and frame codec are out of scope: the router receives
//! already-decoded [`Payload`]s (or a [`PayloadStream`] for request-channel)
//! through the [`Responder`] trait and hands results back the same way.
//!
//! ## Quick start
//!
//! ```
//! use rsocket_router::metadata::CompositeMetadataBuilder;
//! use rsocket_router::{Payload, Responder, RouteTable, RoutedResponder, RouterError};
//!
//! let table = RouteTable::builder()
//!     .add_request_response("echo", |payload: Payload| async move {
//!         Ok::<_, RouterError>(payload)
//!     })
//!     .build();
//! let router = RoutedResponder::from_table(table);
//!
//! let metadata = CompositeMetadataBuilder::new()
//!     .add_routing(&["echo"])
//!     .unwrap()
//!     .build();
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let reply = router
//!     .request_response(Payload::with_metadata("hi", metadata))
//!     .await
//!     .unwrap();
//! assert_eq!(reply.data_utf8(), "hi");
//!
//! // No routing metadata: the protocol default answers.
//! assert!(router.request_response(Payload::from("hi")).await.is_err());
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API: payload model, handler contracts and the `Responder` surface
//! - Metadata: composite and routing metadata codecs, route extraction
//! - Control plane: handler registry and route-table construction
//! - Data plane: per-interaction dispatch and the interaction boundary
//! - Acceptor: per-connection route table and settings selection
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events, with stable event names in
//! [`observability::events`] and a per-interaction correlation id.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod acceptor;
pub use acceptor::{AllowAll, RouterAcceptor, SetupAuthenticator, SetupPayload};

mod api;
pub use api::handler::{
    error_stream, payload_stream, FireAndForgetHandler, PayloadStream, RequestChannelHandler,
    RequestResponseHandler, RequestStreamHandler,
};
pub use api::responder::Responder;

mod config;
pub use config::RouterConfig;

mod control_plane;
pub use control_plane::registry::HandlerRegistry;
pub use control_plane::route_table::{RouteTable, RouteTableBuilder};

mod data_plane;
pub use data_plane::dispatcher::RoutedResponder;

mod error;
pub use error::{MetadataError, RouteConfigError, RouterError};

mod interaction;
pub use interaction::{Cardinality, InteractionKind};

pub mod metadata;

#[doc(hidden)]
pub mod observability;

mod payload;
pub use payload::Payload;
