//! Handlers for officer approve/reject actions.
//!
//! The `{category}` path segment (`tax-id`, `birth`, `marriage`) is the
//! expected service; reviewing through the wrong one is a type mismatch.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use civic_core::application::ServiceKind;
use civic_core::appointment::office_date;
use civic_core::types::DbId;
use civic_db::models::application::Application;
use serde::Deserialize;

use crate::engine::review::{self, ApprovalOutcome};
use crate::error::AppResult;
use crate::middleware::rbac::RequireOfficer;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `POST /{category}/applications/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectApplication {
    #[serde(default)]
    pub reason: String,
}

/// POST /api/v1/{category}/applications/{id}/approve
pub async fn approve(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path((category, application_id)): Path<(String, DbId)>,
) -> AppResult<Json<ApiResponse<ApprovalOutcome>>> {
    let kind = ServiceKind::from_path_segment(&category)?;
    let today = office_date(Utc::now(), state.config.office_utc_offset);
    let outcome = review::approve(&state, application_id, auth.user_id, kind, today).await?;
    Ok(Json(ApiResponse::new(outcome)))
}

/// POST /api/v1/{category}/applications/{id}/reject
pub async fn reject(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path((category, application_id)): Path<(String, DbId)>,
    Json(input): Json<RejectApplication>,
) -> AppResult<Json<ApiResponse<Application>>> {
    let kind = ServiceKind::from_path_segment(&category)?;
    let application =
        review::reject(&state, application_id, auth.user_id, kind, &input.reason).await?;
    Ok(Json(ApiResponse::new(application)))
}
