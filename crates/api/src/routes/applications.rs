//! Route definitions for service applications.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{applications, review};
use crate::state::AppState;

/// Application routes, merged at the `/api/v1` root.
///
/// ```text
/// POST   /{category}/applications                 -> submit
/// POST   /{category}/applications/{id}/approve    -> approve
/// POST   /{category}/applications/{id}/reject     -> reject
/// GET    /applications/mine                       -> list_mine
/// GET    /applications/{id}                       -> get_application
/// POST   /applications/{id}/payment               -> confirm_payment
/// GET    /applications/{id}/certificate           -> get_certificate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{category}/applications", post(applications::submit))
        .route(
            "/{category}/applications/{id}/approve",
            post(review::approve),
        )
        .route("/{category}/applications/{id}/reject", post(review::reject))
        .route("/applications/mine", get(applications::list_mine))
        .route("/applications/{id}", get(applications::get_application))
        .route(
            "/applications/{id}/payment",
            post(applications::confirm_payment),
        )
        .route(
            "/applications/{id}/certificate",
            get(applications::get_certificate),
        )
}
