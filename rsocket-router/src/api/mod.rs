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

//! API facade layer.
//!
//! Holds the contracts applications implement (handlers) and the responder
//! surface the connection layer drives.
//!
//! ```
//! use futures::StreamExt;
//! use rsocket_router::{payload_stream, Payload, PayloadStream, Responder};
//!
//! struct Ticker;
//!
//! #[async_trait::async_trait]
//! impl Responder for Ticker {
//!     fn request_stream(&self, payload: Payload) -> PayloadStream {
//!         payload_stream(vec![payload.clone(), payload])
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let ticks: Vec<_> = Ticker.request_stream(Payload::from("tick")).collect().await;
//! assert_eq!(ticks.len(), 2);
//! assert!(Ticker.request_response(Payload::from("x")).await.is_err());
//! # });
//! ```

pub mod handler;
pub mod responder;
