//! Application entity model and DTOs.

use civic_core::application::{
    ApplicationCategory, ApplicationStatus, ReviewSubject, VitalSubtype,
};
use civic_core::error::CoreError;
use civic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub applicant_id: DbId,
    pub category: String,
    pub subtype: Option<String>,
    pub status: String,
    pub form: serde_json::Value,
    pub assigned_officer_id: DbId,
    pub rejection_reason: Option<String>,
    pub payment_reference: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    pub fn category(&self) -> Result<ApplicationCategory, CoreError> {
        ApplicationCategory::parse(&self.category)
    }

    pub fn subtype(&self) -> Result<Option<VitalSubtype>, CoreError> {
        self.subtype.as_deref().map(VitalSubtype::parse).transpose()
    }

    pub fn status(&self) -> Result<ApplicationStatus, CoreError> {
        ApplicationStatus::parse(&self.status)
    }

    /// The fields consulted by the approve/reject preconditions.
    pub fn review_subject(&self) -> Result<ReviewSubject, CoreError> {
        Ok(ReviewSubject {
            category: self.category()?,
            subtype: self.subtype()?,
            status: self.status()?,
            assigned_officer_id: self.assigned_officer_id,
        })
    }
}

/// DTO for inserting a new application (status starts at `pending_payment`).
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub applicant_id: DbId,
    pub category: ApplicationCategory,
    pub subtype: Option<VitalSubtype>,
    pub form: serde_json::Value,
    pub assigned_officer_id: DbId,
}

/// Filters for an officer's work queue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficerQueueQuery {
    pub status: Option<ApplicationStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
