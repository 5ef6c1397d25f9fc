//! Route definitions for `/admin`. Every handler requires the admin role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /users                       -> create_user
/// GET    /officers/performance        -> officer_performance
/// PUT    /officers/{id}/leave         -> set_officer_leave
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(admin::create_user))
        .route("/officers/performance", get(admin::officer_performance))
        .route("/officers/{id}/leave", put(admin::set_officer_leave))
}
