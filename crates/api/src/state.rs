use std::sync::Arc;

use civic_core::appointment::SlotAllocator;
use civic_events::EventBus;

use crate::config::ServerConfig;
use crate::storage::DocumentStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything heavy is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: civic_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Lifecycle events, consumed by the notification dispatcher.
    pub event_bus: Arc<EventBus>,
    /// Where issued certificate documents are written.
    pub documents: Arc<dyn DocumentStore>,
    pub allocator: SlotAllocator,
}
