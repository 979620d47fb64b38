//! Interaction kinds and their cardinality.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The four RSocket interaction models.
///
/// Each kind owns an independent route namespace: the kind is chosen by which
/// operation the peer invoked, never by the route name.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum InteractionKind {
    FireAndForget,
    RequestResponse,
    RequestStream,
    RequestChannel,
}

/// How many payloads travel in one direction of an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    Zero,
    One,
    Many,
}

impl InteractionKind {
    pub fn inbound(&self) -> Cardinality {
        match self {
            InteractionKind::RequestChannel => Cardinality::Many,
            _ => Cardinality::One,
        }
    }

    pub fn outbound(&self) -> Cardinality {
        match self {
            InteractionKind::FireAndForget => Cardinality::Zero,
            InteractionKind::RequestResponse => Cardinality::One,
            InteractionKind::RequestStream | InteractionKind::RequestChannel => Cardinality::Many,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cardinality, InteractionKind};
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn kinds_round_trip_through_kebab_case_names() {
        for kind in InteractionKind::iter() {
            let name = kind.to_string();
            assert_eq!(InteractionKind::from_str(&name).unwrap(), kind);
        }
        assert_eq!(
            InteractionKind::RequestResponse.as_ref(),
            "request-response"
        );
    }

    #[test]
    fn channel_is_the_only_many_to_many_kind() {
        let duplex: Vec<_> = InteractionKind::iter()
            .filter(|kind| {
                kind.inbound() == Cardinality::Many && kind.outbound() == Cardinality::Many
            })
            .collect();

        assert_eq!(duplex, vec![InteractionKind::RequestChannel]);
        assert_eq!(InteractionKind::FireAndForget.outbound(), Cardinality::Zero);
    }
}
