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


//! Data-plane layer.
//!
//! Owns per-interaction dispatch: route extraction from the first frame,
//! lookup in the kind's namespace, handler invocation and the interaction
//! boundary that turns failures into terminal signals.
//!
//! ```
//! use futures::StreamExt;
//! use rsocket_router::metadata::CompositeMetadataBuilder;
//! use rsocket_router::{Payload, PayloadStream, Responder, RouteTable, RoutedResponder};
//!
//! let table = RouteTable::builder()
//!     .add_request_channel("chat", |payloads: PayloadStream| payloads)
//!     .build();
//! let router = RoutedResponder::from_table(table);
//!
//! let metadata = CompositeMetadataBuilder::new()
//!     .add_routing(&["chat"])
//!     .unwrap()
//!     .build();
//! let inbound = rsocket_router::payload_stream(vec![
//!     Payload::with_metadata("first", metadata),
//!     Payload::from("second"),
//! ]);
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! // The route-bearing frame is re-delivered to the handler ahead of the rest.
//! let echoed: Vec<String> = router
//!     .request_channel(inbound)
//!     .map(|item| item.unwrap().data_utf8())
//!     .collect()
//!     .await;
//! assert_eq!(echoed, vec!["first", "second"]);
//! # });
//! ```

pub(crate) mod dispatcher;
pub(crate) mod guard;
