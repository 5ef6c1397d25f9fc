//! Application categories, statuses and the review state machine.
//!
//! ```text
//! pending_payment ──► pending ──► approved
//!                            └──► rejected
//! ```
//!
//! `approved` and `rejected` are terminal. The checks in [`check_reviewable`]
//! run in a fixed order so that callers see the same error for the same
//! situation regardless of which endpoint they hit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum number of characters in a rejection reason (after trimming).
pub const MIN_REJECTION_REASON_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Category / subtype
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationCategory {
    TaxId,
    VitalRecord,
}

impl ApplicationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationCategory::TaxId => "tax_id",
            ApplicationCategory::VitalRecord => "vital_record",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "tax_id" => Ok(ApplicationCategory::TaxId),
            "vital_record" => Ok(ApplicationCategory::VitalRecord),
            other => Err(CoreError::Internal(format!(
                "Unknown application category '{other}'"
            ))),
        }
    }

    /// Vital records are the only category that needs an in-person appointment.
    pub fn requires_appointment(self) -> bool {
        matches!(self, ApplicationCategory::VitalRecord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalSubtype {
    Birth,
    Marriage,
}

impl VitalSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            VitalSubtype::Birth => "birth",
            VitalSubtype::Marriage => "marriage",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "birth" => Ok(VitalSubtype::Birth),
            "marriage" => Ok(VitalSubtype::Marriage),
            other => Err(CoreError::Internal(format!(
                "Unknown vital subtype '{other}'"
            ))),
        }
    }
}

/// The service a citizen applies for, as named in route paths
/// (`/tax-id/...`, `/birth/...`, `/marriage/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    TaxId,
    Birth,
    Marriage,
}

impl ServiceKind {
    pub fn from_path_segment(segment: &str) -> Result<Self, CoreError> {
        match segment {
            "tax-id" => Ok(ServiceKind::TaxId),
            "birth" => Ok(ServiceKind::Birth),
            "marriage" => Ok(ServiceKind::Marriage),
            other => Err(CoreError::Validation(format!(
                "Unknown service category '{other}'"
            ))),
        }
    }

    pub fn category(self) -> ApplicationCategory {
        match self {
            ServiceKind::TaxId => ApplicationCategory::TaxId,
            ServiceKind::Birth | ServiceKind::Marriage => ApplicationCategory::VitalRecord,
        }
    }

    pub fn subtype(self) -> Option<VitalSubtype> {
        match self {
            ServiceKind::TaxId => None,
            ServiceKind::Birth => Some(VitalSubtype::Birth),
            ServiceKind::Marriage => Some(VitalSubtype::Marriage),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceKind::TaxId => "tax-id",
            ServiceKind::Birth => "birth",
            ServiceKind::Marriage => "marriage",
        };
        f.write_str(label)
    }
}

/// Subtype is required iff the category is a vital record.
pub fn validate_category_subtype(
    category: ApplicationCategory,
    subtype: Option<VitalSubtype>,
) -> Result<(), CoreError> {
    match (category, subtype) {
        (ApplicationCategory::VitalRecord, Some(_)) | (ApplicationCategory::TaxId, None) => Ok(()),
        (ApplicationCategory::VitalRecord, None) => Err(CoreError::Validation(
            "Vital record applications require a subtype".to_string(),
        )),
        (ApplicationCategory::TaxId, Some(_)) => Err(CoreError::Validation(
            "Tax ID applications must not carry a vital subtype".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    PendingPayment,
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::PendingPayment => "pending_payment",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending_payment" => Ok(ApplicationStatus::PendingPayment),
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown application status '{other}'"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    /// Statuses reachable from `self` in one step.
    pub fn valid_transitions(self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::PendingPayment => &[ApplicationStatus::Pending],
            ApplicationStatus::Pending => {
                &[ApplicationStatus::Approved, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Approved | ApplicationStatus::Rejected => &[],
        }
    }

    pub fn can_transition(self, to: ApplicationStatus) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Review checks
// ---------------------------------------------------------------------------

/// Reasons an approve/reject request is refused.
///
/// The display strings are the user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Application not found")]
    NotFound(DbId),

    #[error("Application type mismatch")]
    TypeMismatch,

    #[error("Officer not assigned to this application")]
    NotAssigned,

    #[error("Application already processed")]
    AlreadyProcessed,

    #[error("Application payment has not been confirmed")]
    AwaitingPayment,

    #[error("Rejection reason must be at least 5 characters long.")]
    ReasonTooShort,
}

impl From<LifecycleError> for CoreError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound(id) => CoreError::NotFound {
                entity: "Application",
                id,
            },
            LifecycleError::TypeMismatch | LifecycleError::ReasonTooShort => {
                CoreError::Validation(err.to_string())
            }
            LifecycleError::NotAssigned => CoreError::Forbidden(err.to_string()),
            LifecycleError::AlreadyProcessed | LifecycleError::AwaitingPayment => {
                CoreError::Conflict(err.to_string())
            }
        }
    }
}

/// The fields of an application the review checks look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSubject {
    pub category: ApplicationCategory,
    pub subtype: Option<VitalSubtype>,
    pub status: ApplicationStatus,
    pub assigned_officer_id: DbId,
}

/// Run the approve/reject preconditions in order:
/// existence, type, assignment, terminal state, payment.
pub fn check_reviewable(
    application_id: DbId,
    subject: Option<&ReviewSubject>,
    acting_officer_id: DbId,
    expected: ServiceKind,
) -> Result<(), LifecycleError> {
    let subject = subject.ok_or(LifecycleError::NotFound(application_id))?;

    if subject.category != expected.category() || subject.subtype != expected.subtype() {
        return Err(LifecycleError::TypeMismatch);
    }
    if subject.assigned_officer_id != acting_officer_id {
        return Err(LifecycleError::NotAssigned);
    }
    if subject.status.is_terminal() {
        return Err(LifecycleError::AlreadyProcessed);
    }
    if subject.status == ApplicationStatus::PendingPayment {
        return Err(LifecycleError::AwaitingPayment);
    }
    Ok(())
}

/// Rejections must explain themselves.
pub fn validate_rejection_reason(reason: &str) -> Result<(), LifecycleError> {
    if reason.trim().chars().count() < MIN_REJECTION_REASON_LEN {
        return Err(LifecycleError::ReasonTooShort);
    }
    Ok(())
}
