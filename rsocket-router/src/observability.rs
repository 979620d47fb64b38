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

//! Stable event names and field formatters for `tracing` output.

pub mod events {
    pub const HANDLER_REGISTERED: &str = "handler_registered";
    pub const ROUTE_REGISTERED: &str = "route_registered";
    pub const ROUTE_REPLACED: &str = "route_replaced";
    pub const ROUTE_TABLE_BUILT: &str = "route_table_built";
    pub const HANDLER_RESOLVE_FAILED: &str = "handler_resolve_failed";

    pub const INTERACTION_RECEIVED: &str = "interaction_received";
    pub const INTERACTION_DISPATCHED: &str = "interaction_dispatched";
    pub const INTERACTION_UNROUTED: &str = "interaction_unrouted";
    pub const INTERACTION_METADATA_MALFORMED: &str = "interaction_metadata_malformed";
    pub const INTERACTION_HANDLER_PANICKED: &str = "interaction_handler_panicked";
    pub const CHANNEL_EMPTY: &str = "channel_empty";
    pub const CHANNEL_FIRST_FRAME_FAILED: &str = "channel_first_frame_failed";

    pub const SETUP_ACCEPTED: &str = "setup_accepted";
    pub const SETUP_REJECTED: &str = "setup_rejected";
}

pub mod fields {
    use crate::payload::Payload;
    use uuid::Uuid;

    /// Correlation id attached to every event of one interaction.
    pub fn new_interaction_id() -> String {
        Uuid::new_v4().hyphenated().to_string()
    }

    pub fn format_route(route: Option<&str>) -> &str {
        route.unwrap_or("<none>")
    }

    pub fn format_payload(payload: &Payload) -> String {
        format!(
            "data={}B metadata={}",
            payload.data().len(),
            payload
                .metadata()
                .map(|metadata| format!("{}B", metadata.len()))
                .unwrap_or_else(|| "none".to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fields;
    use crate::payload::Payload;

    #[test]
    fn interaction_ids_are_unique() {
        assert_ne!(fields::new_interaction_id(), fields::new_interaction_id());
    }

    #[test]
    fn payload_summary_reports_sizes_only() {
        let payload = Payload::with_metadata("abc", "de");

        assert_eq!(fields::format_payload(&payload), "data=3B metadata=2B");
        assert_eq!(
            fields::format_payload(&Payload::from("x")),
            "data=1B metadata=none"
        );
        assert_eq!(fields::format_route(None), "<none>");
    }
}
