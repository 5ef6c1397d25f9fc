//! Officer performance snapshot model.

use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `officer_performance` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfficerPerformance {
    pub officer_id: DbId,
    pub approved_count: i64,
    pub rejected_count: i64,
    pub pending_count: i64,
    pub avg_resolution_secs: Option<f64>,
    pub refreshed_at: Timestamp,
}
