//! Notification model.

use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_type: String,
    pub application_id: Option<DbId>,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
