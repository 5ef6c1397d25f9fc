//! Approve and reject transactions.
//!
//! Both lock the application row first, so concurrent reviews of the same
//! application serialise and the loser sees a terminal status. Lock order is
//! application row, then slot buckets (chronological), then the officer's
//! user row.

use chrono::NaiveDate;
use civic_core::application::{
    check_reviewable, validate_rejection_reason, LifecycleError, ServiceKind,
};
use civic_core::error::CoreError;
use civic_core::types::DbId;
use civic_db::models::application::Application;
use civic_db::models::certificate::Certificate;
use civic_db::repositories::{ApplicationRepo, OfficerRepo, UserRepo};
use civic_events::bus::{APPLICATION_APPROVED, APPLICATION_REJECTED};
use civic_events::PlatformEvent;
use serde::Serialize;
use sqlx::PgConnection;

use crate::engine::issuance::CertificateIssuer;
use crate::error::AppResult;
use crate::state::AppState;

/// Result of a successful approval.
#[derive(Debug, Serialize)]
pub struct ApprovalOutcome {
    pub application: Application,
    pub certificate: Certificate,
}

/// Lock the application and run the review preconditions.
async fn load_reviewable(
    conn: &mut PgConnection,
    application_id: DbId,
    officer_id: DbId,
    expected: ServiceKind,
) -> AppResult<Application> {
    let application = ApplicationRepo::find_for_update(conn, application_id)
        .await?
        .ok_or(LifecycleError::NotFound(application_id))?;

    let subject = application.review_subject()?;
    check_reviewable(application_id, Some(&subject), officer_id, expected)?;
    Ok(application)
}

/// Approve a pending application and issue its certificate.
///
/// `today` anchors the appointment search; the first candidate is the next
/// working day.
pub async fn approve(
    state: &AppState,
    application_id: DbId,
    officer_id: DbId,
    expected: ServiceKind,
    today: NaiveDate,
) -> AppResult<ApprovalOutcome> {
    let mut tx = state.pool.begin().await?;

    let application = load_reviewable(&mut tx, application_id, officer_id, expected).await?;

    let applicant_name = UserRepo::full_name(&mut tx, application.applicant_id)
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "Applicant {} of application {application_id} is missing",
                application.applicant_id
            ))
        })?;

    let issuer = CertificateIssuer::new(state.allocator, state.documents.as_ref());
    let certificate = issuer
        .issue(&mut tx, &application, &applicant_name, officer_id, today)
        .await?;

    let approved = ApplicationRepo::mark_approved(&mut tx, application_id)
        .await?
        .ok_or(LifecycleError::AlreadyProcessed)?;

    OfficerRepo::decrement_workload(&mut tx, officer_id).await?;

    tx.commit().await?;

    tracing::info!(
        application_id,
        officer_id,
        certificate_id = certificate.id,
        "Application approved"
    );

    let appointment = certificate.appointment()?.map(|a| {
        serde_json::json!({
            "date": a.date.to_string(),
            "period": a.period.as_str(),
            "time_range": a.time_range,
        })
    });
    state.event_bus.publish(
        PlatformEvent::new(
            APPLICATION_APPROVED,
            application_id,
            approved.applicant_id,
            officer_id,
        )
        .with_actor(officer_id)
        .with_payload(serde_json::json!({ "appointment": appointment })),
    );

    Ok(ApprovalOutcome {
        application: approved,
        certificate,
    })
}

/// Reject a pending application. The reason is checked after the review
/// preconditions and stored verbatim.
pub async fn reject(
    state: &AppState,
    application_id: DbId,
    officer_id: DbId,
    expected: ServiceKind,
    reason: &str,
) -> AppResult<Application> {
    let mut tx = state.pool.begin().await?;

    load_reviewable(&mut tx, application_id, officer_id, expected).await?;
    validate_rejection_reason(reason)?;

    let rejected = ApplicationRepo::mark_rejected(&mut tx, application_id, reason)
        .await?
        .ok_or(LifecycleError::AlreadyProcessed)?;

    OfficerRepo::decrement_workload(&mut tx, officer_id).await?;

    tx.commit().await?;

    tracing::info!(application_id, officer_id, "Application rejected");

    state.event_bus.publish(
        PlatformEvent::new(
            APPLICATION_REJECTED,
            application_id,
            rejected.applicant_id,
            officer_id,
        )
        .with_actor(officer_id)
        .with_payload(serde_json::json!({ "reason": reason })),
    );

    Ok(rejected)
}
