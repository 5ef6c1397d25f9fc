//! Certificate issuance for an approval in progress.
//!
//! Runs on the approval transaction's connection: the slot reservation, the
//! certificate row and the status flip commit or roll back together.

use chrono::{NaiveDate, Utc};
use civic_core::application::LifecycleError;
use civic_core::appointment::{Appointment, ReserveError, SlotAllocator};
use civic_core::certificate::{self, CertificateContent};
use civic_core::error::CoreError;
use civic_core::types::DbId;
use civic_db::models::application::Application;
use civic_db::models::certificate::{Certificate, CreateCertificate};
use civic_db::repositories::{CertificateRepo, PgSlotLedger};
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::storage::DocumentStore;

/// Reserves the appointment (vital records only), renders and stores the
/// document, and inserts the certificate record.
pub struct CertificateIssuer<'a> {
    allocator: SlotAllocator,
    documents: &'a dyn DocumentStore,
}

impl<'a> CertificateIssuer<'a> {
    pub fn new(allocator: SlotAllocator, documents: &'a dyn DocumentStore) -> Self {
        Self {
            allocator,
            documents,
        }
    }

    /// Issue the certificate for `application`.
    ///
    /// A second issuance for the same application is reported as
    /// [`LifecycleError::AlreadyProcessed`].
    pub async fn issue(
        &self,
        conn: &mut PgConnection,
        application: &Application,
        applicant_name: &str,
        officer_id: DbId,
        today: NaiveDate,
    ) -> AppResult<Certificate> {
        let category = application.category()?;
        let subtype = application.subtype()?;

        let appointment = if category.requires_appointment() {
            Some(
                self.reserve_appointment(&mut *conn, application.id, officer_id, today)
                    .await?,
            )
        } else {
            None
        };

        let document = certificate::render(&CertificateContent {
            application_id: application.id,
            applicant_name,
            category,
            subtype,
            form: &application.form,
            appointment: appointment.as_ref(),
            approved_by: officer_id,
            issued_at: Utc::now(),
        });
        let document_ref = self.documents.store(&document.bytes).await?;

        let created = CertificateRepo::create_once(
            conn,
            &CreateCertificate {
                application_id: application.id,
                applicant_id: application.applicant_id,
                category: category.as_str().to_string(),
                subtype: subtype.map(|s| s.as_str().to_string()),
                appointment,
                document_ref,
                document_sha256: document.sha256,
                approved_by: officer_id,
            },
        )
        .await?;

        created.ok_or_else(|| LifecycleError::AlreadyProcessed.into())
    }

    async fn reserve_appointment(
        &self,
        conn: &mut PgConnection,
        application_id: DbId,
        officer_id: DbId,
        today: NaiveDate,
    ) -> AppResult<Appointment> {
        let mut ledger = PgSlotLedger::new(conn);
        match self.allocator.reserve(&mut ledger, officer_id, today).await {
            Ok(appointment) => {
                tracing::info!(
                    application_id,
                    officer_id,
                    slot_date = %appointment.date,
                    period = %appointment.period,
                    "Appointment slot reserved"
                );
                Ok(appointment)
            }
            Err(ReserveError::Storage(e)) => Err(AppError::Database(e)),
            Err(e) => {
                tracing::error!(
                    error_class = "resource_exhausted",
                    application_id,
                    officer_id,
                    error = %e,
                    "Appointment allocation failed"
                );
                Err(AppError::Core(
                    e.into_core(|db| CoreError::Internal(db.to_string())),
                ))
            }
        }
    }
}
