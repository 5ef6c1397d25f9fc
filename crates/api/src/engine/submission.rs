//! New applications and payment confirmation.

use civic_core::application::{ApplicationStatus, ServiceKind};
use civic_core::assignment::{select_least_loaded, subcity_from_form, NO_OFFICER_AVAILABLE};
use civic_core::error::CoreError;
use civic_core::roles::UserKind;
use civic_core::types::DbId;
use civic_db::models::application::{Application, CreateApplication};
use civic_db::repositories::{ApplicationRepo, OfficerRepo, UserRepo};
use civic_events::bus::{APPLICATION_PAID, APPLICATION_SUBMITTED};
use civic_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Shown when a citizen without both ID documents tries to apply.
pub const IDENTITY_INCOMPLETE: &str = "Please upload both sides of your ID before applying.";

/// Shown when payment is confirmed twice.
pub const PAYMENT_ALREADY_CONFIRMED: &str = "Payment already confirmed for this application";

/// Pick the least-loaded eligible officer for `subcity` and bump their
/// workload.
///
/// The increment is best-effort: a failure is logged and the assignment
/// stands.
pub async fn assign_officer(state: &AppState, subcity: &str) -> AppResult<DbId> {
    let officers = OfficerRepo::list_eligible(&state.pool, subcity).await?;
    let candidates = OfficerRepo::to_candidates(&officers)?;

    let Some(chosen) = select_least_loaded(&candidates, subcity) else {
        tracing::error!(
            error_class = "resource_exhausted",
            subcity,
            "No eligible officer for new application"
        );
        return Err(CoreError::Unavailable(NO_OFFICER_AVAILABLE.to_string()).into());
    };
    let officer_id = chosen.officer_id;

    if let Err(e) = OfficerRepo::increment_workload(&state.pool, officer_id).await {
        tracing::warn!(error = %e, officer_id, "Failed to increment officer workload");
    }

    Ok(officer_id)
}

/// Create an application for `citizen_id` in `pending_payment`.
pub async fn submit(
    state: &AppState,
    citizen_id: DbId,
    kind: ServiceKind,
    form: serde_json::Value,
) -> AppResult<Application> {
    let citizen = UserRepo::find_by_id(&state.pool, citizen_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: citizen_id,
        })?;

    match citizen.kind()? {
        UserKind::Citizen(profile) if profile.has_complete_identity() => {}
        UserKind::Citizen(_) => {
            return Err(CoreError::Validation(IDENTITY_INCOMPLETE.to_string()).into())
        }
        _ => return Err(CoreError::Forbidden("Citizen role required".to_string()).into()),
    }

    if !form.is_object() {
        return Err(AppError::BadRequest("Form must be a JSON object.".to_string()));
    }
    let subcity = subcity_from_form(&form)?;

    let officer_id = assign_officer(state, &subcity).await?;

    let application = ApplicationRepo::create(
        &state.pool,
        &CreateApplication {
            applicant_id: citizen_id,
            category: kind.category(),
            subtype: kind.subtype(),
            form,
            assigned_officer_id: officer_id,
        },
    )
    .await?;

    tracing::info!(
        application_id = application.id,
        applicant_id = citizen_id,
        officer_id,
        service = %kind,
        %subcity,
        "Application submitted"
    );

    state.event_bus.publish(
        PlatformEvent::new(APPLICATION_SUBMITTED, application.id, citizen_id, officer_id)
            .with_actor(citizen_id),
    );

    Ok(application)
}

/// Record a successful payment and move the application to `pending`.
pub async fn confirm_payment(
    state: &AppState,
    citizen_id: DbId,
    application_id: DbId,
    transaction_ref: &str,
) -> AppResult<Application> {
    let transaction_ref = transaction_ref.trim();
    if transaction_ref.is_empty() {
        return Err(AppError::BadRequest(
            "Transaction reference is required.".to_string(),
        ));
    }

    let application = ApplicationRepo::find_by_id(&state.pool, application_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Application",
            id: application_id,
        })?;

    if application.applicant_id != citizen_id {
        return Err(CoreError::Forbidden("You do not own this application".to_string()).into());
    }
    if application.status()? != ApplicationStatus::PendingPayment {
        return Err(CoreError::Conflict(PAYMENT_ALREADY_CONFIRMED.to_string()).into());
    }

    // A concurrent confirmation may win between the read and this update.
    let paid = ApplicationRepo::confirm_payment(&state.pool, application_id, transaction_ref)
        .await?
        .ok_or_else(|| CoreError::Conflict(PAYMENT_ALREADY_CONFIRMED.to_string()))?;

    tracing::info!(application_id, applicant_id = citizen_id, "Payment confirmed");

    state.event_bus.publish(
        PlatformEvent::new(
            APPLICATION_PAID,
            application_id,
            citizen_id,
            paid.assigned_officer_id,
        )
        .with_actor(citizen_id),
    );

    Ok(paid)
}
