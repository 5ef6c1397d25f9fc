//! Admin provisioning, leave and performance report.

mod common;

use axum::http::StatusCode;
use civic_db::repositories::PerformanceRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_officer_and_rejects_duplicates(pool: PgPool) {
    let admin = common::create_admin(&pool, "admin@test.com").await;
    let app = common::build_test_app(pool);
    let token = common::token_for(&admin);
    let body = json!({
        "full_name": "Hana Girma",
        "email": "hana@test.com",
        "role": "officer",
        "department": "approver",
        "subcity": "Bole"
    });

    let (status, json) = common::post_json(&app.router, "/api/v1/admin/users", body.clone(), &token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["role"], "officer");
    assert_eq!(json["data"]["workload"], 0);

    let (status, json) = common::post_json(&app.router, "/api/v1/admin/users", body, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);

    let (status, _) = common::post_json(
        &app.router,
        "/api/v1/admin/users",
        json!({ "full_name": "X", "email": "x@test.com", "role": "officer" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admin_is_forbidden(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let app = common::build_test_app(pool);

    let (status, json) = common::get(
        &app.router,
        "/api/v1/admin/officers/performance",
        Some(&common::token_for(&officer)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Admin role required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_leave_removes_officer_from_routing(pool: PgPool) {
    let admin = common::create_admin(&pool, "admin@test.com").await;
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::build_test_app(pool);

    let (status, json) = common::put_json(
        &app.router,
        &format!("/api/v1/admin/officers/{}/leave", officer.id),
        json!({ "on_leave": true }),
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["on_leave"], true);

    let (status, _) = common::post_json(
        &app.router,
        "/api/v1/birth/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &common::token_for(&citizen),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = common::put_json(
        &app.router,
        &format!("/api/v1/admin/officers/{}/leave", citizen.id),
        json!({ "on_leave": true }),
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_performance_report_after_refresh(pool: PgPool) {
    let admin = common::create_admin(&pool, "admin@test.com").await;
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let approved = common::create_pending_birth(&pool, citizen.id, officer.id).await;
    common::create_pending_birth(&pool, citizen.id, officer.id).await;
    let app = common::build_test_app(pool.clone());

    common::post_json(
        &app.router,
        &format!("/api/v1/birth/applications/{}/approve", approved.id),
        json!({}),
        &common::token_for(&officer),
    )
    .await;

    PerformanceRepo::refresh_all(&pool).await.unwrap();

    let (status, json) = common::get(
        &app.router,
        "/api/v1/admin/officers/performance",
        Some(&common::token_for(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = json["data"].as_array().unwrap();
    let row = rows
        .iter()
        .find(|r| r["officer_id"] == officer.id)
        .expect("officer should have a row");
    assert_eq!(row["approved_count"], 1);
    assert_eq!(row["rejected_count"], 0);
    assert_eq!(row["pending_count"], 1);
}
