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

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::StreamExt;
use rsocket_router::metadata::{extract_route, CompositeMetadataBuilder, MetadataEncoding};
use rsocket_router::{
    payload_stream, Payload, PayloadStream, Responder, RouteTable, RoutedResponder, RouterError,
};

fn composite_metadata(route: &str) -> bytes::Bytes {
    CompositeMetadataBuilder::new()
        .add_entry("application/x.trace", b"0123456789abcdef")
        .unwrap()
        .add_routing(&[route])
        .unwrap()
        .build()
}

fn bench_extract_route(c: &mut Criterion) {
    let metadata = composite_metadata("orders.lookup");

    c.bench_function("extract_route_composite", |b| {
        b.iter(|| extract_route(black_box(Some(&metadata)), MetadataEncoding::Composite))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut builder = RouteTable::builder();
    for index in 0..64 {
        builder = builder.add_request_response(format!("route.{index}"), |payload: Payload| {
            async move { Ok::<_, RouterError>(payload) }
        });
    }
    let router = RoutedResponder::from_table(
        builder
            .add_request_channel("chat", |payloads: PayloadStream| payloads)
            .build(),
    );
    let metadata = composite_metadata("route.42");
    let chat_metadata = composite_metadata("chat");

    c.bench_function("dispatch_request_response", |b| {
        b.iter(|| {
            let payload = Payload::with_metadata("hi", metadata.clone());
            runtime.block_on(router.request_response(black_box(payload)))
        })
    });

    c.bench_function("dispatch_request_channel_8", |b| {
        b.iter(|| {
            let mut frames = vec![Payload::with_metadata("0", chat_metadata.clone())];
            frames.extend((1..8).map(|n| Payload::from(n.to_string())));
            runtime.block_on(router.request_channel(payload_stream(frames)).count())
        })
    });
}

criterion_group!(router_benches, bench_extract_route, bench_dispatch);
criterion_main!(router_benches);
