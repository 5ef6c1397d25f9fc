//! Certificate (issuance record) model and DTOs.

use chrono::NaiveDate;
use civic_core::appointment::{Appointment, Period};
use civic_core::error::CoreError;
use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `certificates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Certificate {
    pub id: DbId,
    pub application_id: DbId,
    pub applicant_id: DbId,
    pub category: String,
    pub subtype: Option<String>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_period: Option<String>,
    pub appointment_time_range: Option<String>,
    pub document_ref: String,
    pub document_sha256: String,
    pub approved_by: DbId,
    pub issued_at: Timestamp,
}

impl Certificate {
    /// The embedded appointment, if one was reserved.
    pub fn appointment(&self) -> Result<Option<Appointment>, CoreError> {
        match (
            self.appointment_date,
            self.appointment_period.as_deref(),
            self.appointment_time_range.as_ref(),
        ) {
            (Some(date), Some(period), Some(time_range)) => Ok(Some(Appointment {
                date,
                period: Period::parse(period)?,
                time_range: time_range.clone(),
            })),
            _ => Ok(None),
        }
    }
}

/// DTO for inserting a certificate.
#[derive(Debug, Clone)]
pub struct CreateCertificate {
    pub application_id: DbId,
    pub applicant_id: DbId,
    pub category: String,
    pub subtype: Option<String>,
    pub appointment: Option<Appointment>,
    pub document_ref: String,
    pub document_sha256: String,
    pub approved_by: DbId,
}
