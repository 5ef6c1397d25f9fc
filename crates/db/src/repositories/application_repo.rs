//! Repository for the `applications` table.
//!
//! Status changes are conditional updates keyed on the expected current
//! status, so a lost race shows up as `None` rather than a double write.

use civic_core::application::ApplicationStatus;
use civic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::application::{Application, CreateApplication, OfficerQueueQuery};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list for `applications` queries.
const COLUMNS: &str = "id, applicant_id, category, subtype, status, form, \
    assigned_officer_id, rejection_reason, payment_reference, resolved_at, \
    created_at, updated_at";

/// Provides persistence for service applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application in `pending_payment`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications \
                (applicant_id, category, subtype, status, form, assigned_officer_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(input.applicant_id)
            .bind(input.category.as_str())
            .bind(input.subtype.map(|s| s.as_str()))
            .bind(ApplicationStatus::PendingPayment.as_str())
            .bind(&input.form)
            .bind(input.assigned_officer_id)
            .fetch_one(pool)
            .await
    }

    /// Find an application by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load and row-lock an application for the rest of the transaction.
    ///
    /// Concurrent reviewers of the same application queue here, so the
    /// second one observes the first one's committed status.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Move `pending_payment` -> `pending` and record the payment reference.
    ///
    /// Returns `None` if the application is not awaiting payment.
    pub async fn confirm_payment(
        pool: &PgPool,
        id: DbId,
        payment_reference: &str,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $2, payment_reference = $3 \
             WHERE id = $1 AND status = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Pending.as_str())
            .bind(payment_reference)
            .bind(ApplicationStatus::PendingPayment.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move `pending` -> `approved`. Returns `None` if it was not pending.
    pub async fn mark_approved(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $2, resolved_at = NOW() \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Approved.as_str())
            .bind(ApplicationStatus::Pending.as_str())
            .fetch_optional(conn)
            .await
    }

    /// Move `pending` -> `rejected` with the reason stored verbatim.
    /// Returns `None` if it was not pending.
    pub async fn mark_rejected(
        conn: &mut PgConnection,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $2, rejection_reason = $3, resolved_at = NOW() \
             WHERE id = $1 AND status = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Rejected.as_str())
            .bind(reason)
            .bind(ApplicationStatus::Pending.as_str())
            .fetch_optional(conn)
            .await
    }

    /// All applications submitted by a citizen, newest first.
    pub async fn list_for_applicant(
        pool: &PgPool,
        applicant_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications \
             WHERE applicant_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(applicant_id)
            .fetch_all(pool)
            .await
    }

    /// An officer's assigned applications, oldest first, optionally filtered
    /// by status.
    pub async fn list_for_officer(
        pool: &PgPool,
        officer_id: DbId,
        params: &OfficerQueueQuery,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications \
             WHERE assigned_officer_id = $1 \
               AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at ASC, id ASC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(officer_id)
            .bind(params.status.map(|s| s.as_str()))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }
}
