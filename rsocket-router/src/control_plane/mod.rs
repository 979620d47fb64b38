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

//! Control-plane layer.
//!
//! Owns route registration: the handler registry used for late-bound handler
//! names and the immutable route table handed to the dispatcher.
//!
//! ```
//! use rsocket_router::{HandlerRegistry, InteractionKind, Payload, RouteTable, RouterError};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_request_response("print", || {
//!     Ok(|payload: Payload| async move { Ok::<_, RouterError>(payload) })
//! });
//!
//! let table = RouteTable::builder()
//!     .add_request_response_named("print", "print", &registry)
//!     .unwrap()
//!     .build();
//! assert!(table.contains(InteractionKind::RequestResponse, "print"));
//!
//! // A misconfigured handler name fails the build instead of leaving a hole.
//! assert!(RouteTable::builder()
//!     .add_request_response_named("print", "io.example.Missing", &registry)
//!     .is_err());
//! ```

pub(crate) mod registry;
pub(crate) mod route_table;
