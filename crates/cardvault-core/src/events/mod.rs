//! Domain events emitted by sharing and ownership operations.
//!
//! Events are recorded in the structured log when a mutation commits;
//! they describe what happened, never who may see it.

pub mod share;
pub mod transfer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use share::ShareEvent;
pub use transfer::TransferEvent;

use crate::types::id::UserId;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: UserId,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A share-related event.
    Share(ShareEvent),
    /// An ownership transfer event.
    Transfer(TransferEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: UserId, payload: EventPayload) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Render the event as a single JSON line for the structured log.
    pub fn to_log_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::ResourceId;

    #[test]
    fn test_log_line_is_tagged() {
        let event = DomainEvent::new(
            UserId::new(),
            EventPayload::Transfer(TransferEvent::Completed {
                resource_type: "card".to_string(),
                resource_id: ResourceId::new(),
                previous_owner: UserId::new(),
                new_owner: UserId::new(),
                revoked_shares: 2,
            }),
        );

        let value: serde_json::Value =
            serde_json::from_str(&event.to_log_line()).expect("valid json");
        assert_eq!(value["payload"]["domain"], "Transfer");
        assert_eq!(value["payload"]["event"]["type"], "Completed");
        assert_eq!(value["payload"]["event"]["revoked_shares"], 2);
    }
}
