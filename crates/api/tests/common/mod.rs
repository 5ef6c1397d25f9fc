#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use civic_core::application::{ApplicationCategory, VitalSubtype};
use civic_core::appointment::{AllocatorConfig, SlotAllocator};
use civic_core::roles::{Department, Role};
use civic_core::types::DbId;
use civic_db::models::application::{Application, CreateApplication};
use civic_db::models::user::{CreateUser, User};
use civic_db::repositories::{ApplicationRepo, UserRepo};
use civic_events::EventBus;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use civic_api::auth::jwt::{generate_access_token, JwtConfig};
use civic_api::config::ServerConfig;
use civic_api::router::build_app_router;
use civic_api::state::AppState;
use civic_api::storage::{DocumentStore, LocalDocumentStore};

pub const TEST_SECRET: &str = "integration-test-secret-long-enough";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(document_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        document_storage_dir: document_dir.to_path_buf(),
        officer_stats_interval_secs: 3600,
        allocator: AllocatorConfig::default(),
        office_utc_offset: chrono::FixedOffset::east_opt(0).unwrap(),
    }
}

/// A running router plus the pieces tests inspect. Keeps the temporary
/// document directory alive for the test's duration.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub documents_dir: tempfile::TempDir,
}

/// Build the full application router over `pool`, writing documents to a
/// fresh temporary directory.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let documents_dir = tempfile::tempdir().expect("tempdir");
    let documents = Arc::new(LocalDocumentStore::new(documents_dir.path()));
    build_test_app_with(pool, documents, documents_dir)
}

/// Like [`build_test_app`] with a caller-supplied document store.
pub fn build_test_app_with(
    pool: PgPool,
    documents: Arc<dyn DocumentStore>,
    documents_dir: tempfile::TempDir,
) -> TestApp {
    let config = test_config(documents_dir.path());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        documents,
        allocator: SlotAllocator::new(config.allocator),
    };
    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        documents_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, serde_json::Value::Null);
    }
    (status, body_json(response).await)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn with_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    with_json(app, "POST", uri, body, Some(token)).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    with_json(app, "PUT", uri, body, Some(token)).await
}

pub async fn post_json_anonymous(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    with_json(app, "POST", uri, body, None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn token_for(user: &User) -> String {
    let config = JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_mins: 15,
    };
    generate_access_token(user.id, &user.role, &config).expect("token generation")
}

pub async fn create_officer(pool: &PgPool, email: &str, subcity: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: format!("Officer {email}"),
            email: email.to_string(),
            role: Role::Officer,
            department: Some(Department::Approver),
            subcity: Some(subcity.to_string()),
        },
    )
    .await
    .expect("officer creation should succeed")
}

pub async fn create_admin(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Admin".to_string(),
            email: email.to_string(),
            role: Role::Admin,
            department: None,
            subcity: None,
        },
    )
    .await
    .expect("admin creation should succeed")
}

/// A citizen with both ID documents on file.
pub async fn create_citizen(pool: &PgPool, email: &str) -> User {
    let citizen = create_citizen_without_id(pool, email).await;
    UserRepo::set_id_documents(pool, citizen.id, Some("id/front.png"), Some("id/back.png"))
        .await
        .expect("id documents should be stored")
        .expect("citizen exists")
}

pub async fn create_citizen_without_id(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: format!("Citizen {email}"),
            email: email.to_string(),
            role: Role::Citizen,
            department: None,
            subcity: None,
        },
    )
    .await
    .expect("citizen creation should succeed")
}

/// Insert an application assigned to `officer_id` and confirm its payment,
/// leaving it `pending`.
pub async fn create_pending_application(
    pool: &PgPool,
    applicant_id: DbId,
    officer_id: DbId,
    category: ApplicationCategory,
    subtype: Option<VitalSubtype>,
) -> Application {
    let created = ApplicationRepo::create(
        pool,
        &CreateApplication {
            applicant_id,
            category,
            subtype,
            form: serde_json::json!({ "subcity": "Bole", "full_name": "Abebe Kebede" }),
            assigned_officer_id: officer_id,
        },
    )
    .await
    .expect("application creation should succeed");

    ApplicationRepo::confirm_payment(pool, created.id, "TX-TEST")
        .await
        .expect("payment update should succeed")
        .expect("application should be awaiting payment")
}

pub async fn create_pending_birth(pool: &PgPool, applicant_id: DbId, officer_id: DbId) -> Application {
    create_pending_application(
        pool,
        applicant_id,
        officer_id,
        ApplicationCategory::VitalRecord,
        Some(VitalSubtype::Birth),
    )
    .await
}
