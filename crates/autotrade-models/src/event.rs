use serde::{Deserialize, Serialize};

use crate::proposal::{OfferState, Proposal};

/// Opaque resumption state of the offer transport's negotiation feed.
///
/// The engine never looks inside; it only persists and restores it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct NegotiationSnapshot(pub serde_json::Value);

/// An event emitted by the offer transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportEvent {
    NewOffer {
        proposal: Proposal,
    },
    OfferStateChanged {
        proposal: Proposal,
        previous_state: OfferState,
    },
    Snapshot {
        snapshot: NegotiationSnapshot,
    },
}

impl TransportEvent {
    /// Id of the proposal this event concerns, if any.
    pub fn proposal_id(&self) -> Option<&str> {
        match self {
            TransportEvent::NewOffer { proposal }
            | TransportEvent::OfferStateChanged { proposal, .. } => Some(&proposal.id),
            TransportEvent::Snapshot { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_state_change_line() {
        let line = r#"{"type":"offer_state_changed","previous_state":"active","proposal":{"id":"77","partner":"765","state":"invalid_items","created_at":"2024-05-01T12:00:00Z"}}"#;
        let event: TransportEvent = serde_json::from_str(line).unwrap();
        match &event {
            TransportEvent::OfferStateChanged {
                proposal,
                previous_state,
            } => {
                assert_eq!(proposal.state, OfferState::InvalidItems);
                assert_eq!(*previous_state, OfferState::Active);
                assert!(proposal.items_to_give.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(event.proposal_id(), Some("77"));
    }

    #[test]
    fn snapshot_is_transparent() {
        let line = r#"{"type":"snapshot","snapshot":{"sent":{},"received":{"77":2}}}"#;
        let event: TransportEvent = serde_json::from_str(line).unwrap();
        let TransportEvent::Snapshot { snapshot } = event else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.0["received"]["77"], serde_json::json!(2));
    }
}
