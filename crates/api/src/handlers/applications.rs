//! Handlers for citizen submissions, payment, and application reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use civic_core::application::ServiceKind;
use civic_core::error::CoreError;
use civic_core::roles::Role;
use civic_core::types::DbId;
use civic_db::models::application::{Application, OfficerQueueQuery};
use civic_db::models::certificate::Certificate;
use civic_db::repositories::{ApplicationRepo, CertificateRepo};
use serde::Deserialize;

use crate::engine::submission;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireCitizen, RequireOfficer};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /{category}/applications`.
#[derive(Debug, Deserialize)]
pub struct SubmitApplication {
    pub form: serde_json::Value,
}

/// Body for `POST /applications/{id}/payment`.
#[derive(Debug, Deserialize)]
pub struct ConfirmPayment {
    pub transaction_ref: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an application the caller is allowed to see: its applicant, its
/// assigned officer, or an admin.
async fn find_visible(
    state: &AppState,
    auth: &AuthUser,
    application_id: DbId,
) -> AppResult<Application> {
    let application = ApplicationRepo::find_by_id(&state.pool, application_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Application",
            id: application_id,
        })?;

    let visible = match auth.role {
        Role::Admin => true,
        Role::Citizen => application.applicant_id == auth.user_id,
        Role::Officer => application.assigned_officer_id == auth.user_id,
    };
    if !visible {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this application".into(),
        )));
    }
    Ok(application)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/{category}/applications
pub async fn submit(
    RequireCitizen(auth): RequireCitizen,
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(input): Json<SubmitApplication>,
) -> AppResult<(StatusCode, Json<ApiResponse<Application>>)> {
    let kind = ServiceKind::from_path_segment(&category)?;
    let application = submission::submit(&state, auth.user_id, kind, input.form).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(application))))
}

/// POST /api/v1/applications/{id}/payment
pub async fn confirm_payment(
    RequireCitizen(auth): RequireCitizen,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
    Json(input): Json<ConfirmPayment>,
) -> AppResult<Json<ApiResponse<Application>>> {
    let application =
        submission::confirm_payment(&state, auth.user_id, application_id, &input.transaction_ref)
            .await?;
    Ok(Json(ApiResponse::new(application)))
}

/// GET /api/v1/applications/mine
pub async fn list_mine(
    RequireCitizen(auth): RequireCitizen,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Application>>>> {
    let applications = ApplicationRepo::list_for_applicant(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::new(applications)))
}

/// GET /api/v1/officer/applications?status=&limit=&offset=
pub async fn officer_queue(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Query(params): Query<OfficerQueueQuery>,
) -> AppResult<Json<ApiResponse<Vec<Application>>>> {
    let applications =
        ApplicationRepo::list_for_officer(&state.pool, auth.user_id, &params).await?;
    Ok(Json(ApiResponse::new(applications)))
}

/// GET /api/v1/applications/{id}
pub async fn get_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Application>>> {
    let application = find_visible(&state, &auth, application_id).await?;
    Ok(Json(ApiResponse::new(application)))
}

/// GET /api/v1/applications/{id}/certificate
pub async fn get_certificate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Certificate>>> {
    find_visible(&state, &auth, application_id).await?;
    let certificate = CertificateRepo::find_by_application(&state.pool, application_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Certificate",
            id: application_id,
        })?;
    Ok(Json(ApiResponse::new(certificate)))
}
