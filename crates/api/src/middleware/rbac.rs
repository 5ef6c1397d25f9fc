//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers with any other role
//! with 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use civic_core::error::CoreError;
use civic_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: Role,
    message: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }
    Ok(user)
}

/// Requires the `citizen` role.
///
/// ```ignore
/// async fn submit(RequireCitizen(user): RequireCitizen) -> AppResult<Json<()>> { .. }
/// ```
pub struct RequireCitizen(pub AuthUser);

impl FromRequestParts<AppState> for RequireCitizen {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Citizen, "Citizen role required")
            .await
            .map(RequireCitizen)
    }
}

/// Requires the `officer` role.
pub struct RequireOfficer(pub AuthUser);

impl FromRequestParts<AppState> for RequireOfficer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Officer, "Officer role required")
            .await
            .map(RequireOfficer)
    }
}

/// Requires the `admin` role.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin, "Admin role required")
            .await
            .map(RequireAdmin)
    }
}
