//! Handlers for officer appointment occupancy.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use civic_core::error::CoreError;
use civic_core::roles::Role;
use civic_core::types::DbId;
use civic_db::models::appointment::AppointmentSlot;
use civic_db::repositories::AppointmentSlotRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for `GET /officers/{id}/appointments`.
#[derive(Debug, Deserialize)]
pub struct AppointmentQuery {
    /// Restrict to one day (`YYYY-MM-DD`).
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/officers/{id}/appointments?date=
///
/// Admins see any officer; officers see only themselves.
pub async fn list_appointments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(officer_id): Path<DbId>,
    Query(params): Query<AppointmentQuery>,
) -> AppResult<Json<ApiResponse<Vec<AppointmentSlot>>>> {
    let allowed = match auth.role {
        Role::Admin => true,
        Role::Officer => auth.user_id == officer_id,
        Role::Citizen => false,
    };
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only view your own appointments".into(),
        )));
    }

    let slots = AppointmentSlotRepo::list_for_officer(&state.pool, officer_id, params.date).await?;
    Ok(Json(ApiResponse::new(slots)))
}
