//! Handler for recording a citizen's identity documents.
//!
//! Extraction and verification happen upstream; this stores the references
//! the submission gate checks.

use axum::extract::State;
use axum::Json;
use civic_core::error::CoreError;
use civic_db::models::user::User;
use civic_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireCitizen;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `PUT /me/id-documents`. Blank values clear the side.
#[derive(Debug, Deserialize)]
pub struct IdDocuments {
    pub front: Option<String>,
    pub back: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// PUT /api/v1/me/id-documents
pub async fn set_id_documents(
    RequireCitizen(auth): RequireCitizen,
    State(state): State<AppState>,
    Json(input): Json<IdDocuments>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = UserRepo::set_id_documents(
        &state.pool,
        auth.user_id,
        non_blank(&input.front),
        non_blank(&input.back),
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "User",
        id: auth.user_id,
    })?;
    Ok(Json(ApiResponse::new(user)))
}
