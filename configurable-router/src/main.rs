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

mod config;
mod handlers;

use bytes::Bytes;
use clap::Parser;
use config::Config;
use futures::StreamExt;
use rsocket_router::metadata::{encode_routing, CompositeMetadataBuilder, MetadataEncoding};
use rsocket_router::{
    payload_stream, InteractionKind, Payload, Responder, RoutedResponder, RouterError,
};
use std::error::Error;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// One interaction to drive through the router: `KIND:ROUTE:DATA`.
///
/// Channel data is split on `,` into separate frames.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Invocation {
    kind: InteractionKind,
    route: String,
    data: String,
}

impl FromStr for Invocation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(3, ':');
        let (Some(kind), Some(route)) = (parts.next(), parts.next()) else {
            return Err(format!("expected KIND:ROUTE[:DATA], got {value:?}"));
        };
        let kind = InteractionKind::from_str(kind)
            .map_err(|_| format!("unknown interaction kind {kind:?}"))?;
        Ok(Self {
            kind,
            route: route.to_string(),
            data: parts.next().unwrap_or_default().to_string(),
        })
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Routes RSocket interactions to handlers named in a JSON5 configuration", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "DEFAULT_CONFIG.json5")]
    config: String,

    /// Interaction to run, e.g. `request-response:echo:hello`; may be repeated.
    #[arg(short, long, value_name = "KIND:ROUTE:DATA")]
    invoke: Vec<Invocation>,
}

fn routing_metadata(encoding: MetadataEncoding, route: &str) -> Result<Bytes, RouterError> {
    let metadata = match encoding {
        MetadataEncoding::Composite => {
            CompositeMetadataBuilder::new().add_routing(&[route])?.build()
        }
        MetadataEncoding::Routing => encode_routing(&[route])?,
    };
    Ok(metadata)
}

fn print_outcome(invocation: &Invocation, outcome: Result<String, RouterError>) {
    match outcome {
        Ok(data) => println!("{}:{} <- {data}", invocation.kind, invocation.route),
        Err(err) => println!("{}:{} !! {err}", invocation.kind, invocation.route),
    }
}

async fn invoke(router: &RoutedResponder, invocation: &Invocation) -> Result<(), RouterError> {
    let metadata = routing_metadata(router.metadata_encoding(), &invocation.route)?;
    let first = Payload::with_metadata(invocation.data.clone(), metadata);

    match invocation.kind {
        InteractionKind::FireAndForget => {
            let outcome = router.fire_and_forget(first).await;
            print_outcome(invocation, outcome.map(|()| "done".to_string()));
        }
        InteractionKind::RequestResponse => {
            let outcome = router.request_response(first).await;
            print_outcome(invocation, outcome.map(|payload| payload.data_utf8()));
        }
        InteractionKind::RequestStream => {
            let mut outbound = router.request_stream(first);
            while let Some(item) = outbound.next().await {
                print_outcome(invocation, item.map(|payload| payload.data_utf8()));
            }
        }
        InteractionKind::RequestChannel => {
            let (_, metadata) = first.into_parts();
            let mut frames = invocation.data.split(',').map(str::to_string);
            let head = frames.next().unwrap_or_default();
            let inbound: Vec<Payload> =
                std::iter::once(Payload::new(head, metadata))
                    .chain(frames.map(Payload::from))
                    .collect();
            let mut outbound = router.request_channel(payload_stream(inbound));
            while let Some(item) = outbound.next().await {
                print_outcome(invocation, item.map(|payload| payload.data_utf8()));
            }
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load(&args.config)?;
    let registry = handlers::builtin_registry();
    let table = config.route_table(&registry)?;
    info!("routes: {table}");

    let router = RoutedResponder::new(Arc::new(table), config.router.clone());
    if args.invoke.is_empty() {
        warn!("nothing to invoke; pass --invoke KIND:ROUTE:DATA");
    }
    for invocation in &args.invoke {
        invoke(&router, invocation).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,rsocket_router=debug".into()),
        )
        .init();

    let args = Args::parse();
    info!("configurable-router starting with config {}", args.config);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("configurable-router failed: {error}");
            ExitCode::from(2)
        }
    }
}
