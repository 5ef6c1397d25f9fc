pub mod admin;
pub mod applications;
pub mod health;
pub mod notification;

use axum::routing::{get, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /{category}/applications                        submit (citizen)
/// /{category}/applications/{id}/approve           approve (officer)
/// /{category}/applications/{id}/reject            reject (officer)
///
/// /applications/mine                              list own (citizen)
/// /applications/{id}                              get
/// /applications/{id}/payment                      confirm payment (citizen)
/// /applications/{id}/certificate                  get certificate
///
/// /officer/applications                           work queue (officer)
/// /officers/{id}/appointments                     bucket occupancy
///
/// /me/id-documents                                record ID documents (citizen)
///
/// /notifications                                  list
/// /notifications/{id}/read                        mark read
///
/// /admin/users                                    create account
/// /admin/officers/performance                     performance report
/// /admin/officers/{id}/leave                      set leave flag
/// ```
///
/// `{category}` is one of `tax-id`, `birth`, `marriage`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(applications::router())
        .route(
            "/officer/applications",
            get(handlers::applications::officer_queue),
        )
        .route(
            "/officers/{id}/appointments",
            get(handlers::officers::list_appointments),
        )
        .route(
            "/me/id-documents",
            put(handlers::identity::set_id_documents),
        )
        .nest("/notifications", notification::router())
        .nest("/admin", admin::router())
}
