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

//! Handlers the configuration file can refer to by name.

use futures::stream::{self, StreamExt};
use rsocket_router::{error_stream, HandlerRegistry, Payload, PayloadStream, RouterError};
use tracing::info;

const REPEAT_COUNT: usize = 3;

fn echo(payload: Payload) -> std::future::Ready<Result<Payload, RouterError>> {
    std::future::ready(Ok(Payload::from_data(payload.data().clone())))
}

fn uppercase(payload: Payload) -> std::future::Ready<Result<Payload, RouterError>> {
    std::future::ready(Ok(Payload::from(payload.data_utf8().to_uppercase())))
}

fn log_sink(payload: Payload) -> std::future::Ready<Result<(), RouterError>> {
    info!("log sink received: {}", payload.data_utf8());
    std::future::ready(Ok(()))
}

fn repeat(payload: Payload) -> PayloadStream {
    let text = payload.data_utf8();
    stream::iter(
        (1..=REPEAT_COUNT).map(move |index| Ok(Payload::from(format!("{index}: {text}")))),
    )
    .boxed()
}

fn countdown(payload: Payload) -> PayloadStream {
    match payload.data_utf8().trim().parse::<u32>() {
        Ok(start) => {
            stream::iter((0..=start).rev().map(|n| Ok(Payload::from(n.to_string())))).boxed()
        }
        Err(err) => error_stream(RouterError::application(format!("countdown start: {err}"))),
    }
}

fn chat_echo(payloads: PayloadStream) -> PayloadStream {
    payloads
        .map(|item| item.map(|payload| Payload::from(format!("echo: {}", payload.data_utf8()))))
        .boxed()
}

/// Registry holding every built-in handler under its configuration name.
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register_request_response("echo", || Ok(echo))
        .register_request_response("uppercase", || Ok(uppercase))
        .register_fire_and_forget("log", || Ok(log_sink))
        .register_request_stream("repeat", || Ok(repeat))
        .register_request_stream("countdown", || Ok(countdown))
        .register_request_channel("chat-echo", || Ok(chat_echo));
    registry
}
