//! Appointment capacity bucket model.

use chrono::NaiveDate;
use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `appointment_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppointmentSlot {
    pub id: DbId,
    pub officer_id: DbId,
    pub slot_date: NaiveDate,
    pub period: String,
    pub reserved_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
