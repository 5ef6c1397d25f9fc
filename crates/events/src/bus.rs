//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Events are published only after the transaction that caused them has
//! committed, so a subscriber never sees a transition that was rolled back.

use chrono::{DateTime, Utc};
use civic_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A new application was created and is awaiting payment.
pub const APPLICATION_SUBMITTED: &str = "application.submitted";
/// Payment was confirmed; the application is in the officer's queue.
pub const APPLICATION_PAID: &str = "application.paid";
/// The assigned officer approved the application.
pub const APPLICATION_APPROVED: &str = "application.approved";
/// The assigned officer rejected the application.
pub const APPLICATION_REJECTED: &str = "application.rejected";

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A lifecycle event for one application.
///
/// Built with [`PlatformEvent::new`] and the `with_*` methods. The payload
/// carries whatever the notification text needs (appointment, reason).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"application.approved"`.
    pub event_type: String,

    pub application_id: DbId,

    /// Citizen who owns the application.
    pub applicant_id: DbId,

    /// Officer the application is assigned to.
    pub officer_id: DbId,

    /// User that triggered the event.
    pub actor_user_id: Option<DbId>,

    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(
        event_type: impl Into<String>,
        application_id: DbId,
        applicant_id: DbId,
        officer_id: DbId,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            application_id,
            applicant_id,
            officer_id,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus, shared as `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer fills.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: PlatformEvent) {
        // A send error only means there are no receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
