//! Repository for the `certificates` table.

use civic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::certificate::{Certificate, CreateCertificate};

/// Column list for `certificates` queries.
const COLUMNS: &str = "id, application_id, applicant_id, category, subtype, \
    appointment_date, appointment_period, appointment_time_range, \
    document_ref, document_sha256, approved_by, issued_at";

/// Provides persistence for issued certificates.
pub struct CertificateRepo;

impl CertificateRepo {
    /// Insert the certificate for an application unless one already exists.
    ///
    /// Returns `None` when the application already has a certificate, which
    /// keeps issuance at-most-once even if the caller retries.
    pub async fn create_once(
        conn: &mut PgConnection,
        input: &CreateCertificate,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let appointment = input.appointment.as_ref();
        let query = format!(
            "INSERT INTO certificates \
                (application_id, applicant_id, category, subtype, \
                 appointment_date, appointment_period, appointment_time_range, \
                 document_ref, document_sha256, approved_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT ON CONSTRAINT uq_certificates_application DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Certificate>(&query)
            .bind(input.application_id)
            .bind(input.applicant_id)
            .bind(&input.category)
            .bind(&input.subtype)
            .bind(appointment.map(|a| a.date))
            .bind(appointment.map(|a| a.period.as_str()))
            .bind(appointment.map(|a| a.time_range.as_str()))
            .bind(&input.document_ref)
            .bind(&input.document_sha256)
            .bind(input.approved_by)
            .fetch_optional(conn)
            .await
    }

    /// Find the certificate issued for an application.
    pub async fn find_by_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certificates WHERE application_id = $1");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(application_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of certificates recorded for an application (0 or 1).
    pub async fn count_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM certificates WHERE application_id = $1")
                .bind(application_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
