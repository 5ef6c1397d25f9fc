//! Admin-only handlers: account provisioning, officer leave, and the
//! performance report.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use civic_core::error::CoreError;
use civic_core::roles::Role;
use civic_core::types::DbId;
use civic_db::models::performance::OfficerPerformance;
use civic_db::models::user::{CreateUser, User};
use civic_db::repositories::{OfficerRepo, PerformanceRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `PUT /admin/officers/{id}/leave`.
#[derive(Debug, Deserialize)]
pub struct SetLeave {
    pub on_leave: bool,
}

#[derive(Debug, Serialize)]
pub struct LeaveStatus {
    pub officer_id: DbId,
    pub on_leave: bool,
}

/// Officers need a department and subcity; nobody else may carry them.
fn validate_new_user(input: &CreateUser) -> Result<(), AppError> {
    if input.full_name.trim().is_empty() || input.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Full name and email are required.".to_string(),
        ));
    }
    let has_subcity = input
        .subcity
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    match input.role {
        Role::Officer if input.department.is_none() || !has_subcity => Err(AppError::BadRequest(
            "Officers require a department and subcity.".to_string(),
        )),
        Role::Citizen | Role::Admin if input.department.is_some() || input.subcity.is_some() => {
            Err(AppError::BadRequest(
                "Only officers have a department or subcity.".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// POST /api/v1/admin/users
pub async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    validate_new_user(&input)?;
    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(user))))
}

/// PUT /api/v1/admin/officers/{id}/leave
pub async fn set_officer_leave(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(officer_id): Path<DbId>,
    Json(input): Json<SetLeave>,
) -> AppResult<Json<ApiResponse<LeaveStatus>>> {
    let found = OfficerRepo::set_on_leave(&state.pool, officer_id, input.on_leave).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Officer",
            id: officer_id,
        }));
    }
    tracing::info!(officer_id, on_leave = input.on_leave, "Officer leave updated");
    Ok(Json(ApiResponse::new(LeaveStatus {
        officer_id,
        on_leave: input.on_leave,
    })))
}

/// GET /api/v1/admin/officers/performance
pub async fn officer_performance(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<OfficerPerformance>>>> {
    let rows = PerformanceRepo::list_all(&state.pool).await?;
    Ok(Json(ApiResponse::new(rows)))
}
