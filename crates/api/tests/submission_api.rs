//! Integration tests for submission, officer assignment and payment.

mod common;

use axum::http::StatusCode;
use civic_db::repositories::{OfficerRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_assigns_least_loaded_officer(pool: PgPool) {
    let busy = common::create_officer(&pool, "busy@test.com", "Bole").await;
    let idle = common::create_officer(&pool, "idle@test.com", "Bole").await;
    let elsewhere = common::create_officer(&pool, "arada@test.com", "Arada").await;
    OfficerRepo::increment_workload(&pool, busy.id).await.unwrap();
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::build_test_app(pool.clone());

    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/birth/applications",
        json!({ "form": { "subcity": "Bole", "child_name": "Abebe" } }),
        &common::token_for(&citizen),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["status"], "pending_payment");
    assert_eq!(data["category"], "vital_record");
    assert_eq!(data["subtype"], "birth");
    assert_eq!(data["assigned_officer_id"], idle.id);
    assert_ne!(data["assigned_officer_id"], elsewhere.id);

    let idle = UserRepo::find_by_id(&pool, idle.id).await.unwrap().unwrap();
    assert_eq!(idle.workload, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tax_submission_has_no_subtype(pool: PgPool) {
    common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::build_test_app(pool);

    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/tax-id/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &common::token_for(&citizen),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["category"], "tax_id");
    assert!(json["data"]["subtype"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_requires_both_id_documents(pool: PgPool) {
    common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen_without_id(&pool, "c@test.com").await;
    UserRepo::set_id_documents(&pool, citizen.id, Some("front.png"), None)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/birth/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &common::token_for(&citizen),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Please upload both sides of your ID before applying."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_id_documents_endpoint_unlocks_submission(pool: PgPool) {
    common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen_without_id(&pool, "c@test.com").await;
    let token = common::token_for(&citizen);
    let app = common::build_test_app(pool);

    let (status, json) = common::put_json(
        &app.router,
        "/api/v1/me/id-documents",
        json!({ "front": "docs/front.png", "back": "docs/back.png" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id_document_back"], "docs/back.png");

    let (status, _) = common::post_json(
        &app.router,
        "/api/v1/marriage/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_requires_subcity(pool: PgPool) {
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::build_test_app(pool);

    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/birth/applications",
        json!({ "form": { "child_name": "Abebe" } }),
        &common::token_for(&citizen),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Subcity is required.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_eligible_officer_is_503(pool: PgPool) {
    let on_leave = common::create_officer(&pool, "leave@test.com", "Bole").await;
    OfficerRepo::set_on_leave(&pool, on_leave.id, true).await.unwrap();
    common::create_officer(&pool, "arada@test.com", "Arada").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::build_test_app(pool.clone());

    let (status, json) = common::post_json(
        &app.router,
        "/api/v1/birth/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &common::token_for(&citizen),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "No officers are currently available for this subcity"
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no application may be created without an assignee");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_officer_cannot_submit(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let app = common::build_test_app(pool);

    let (status, _) = common::post_json(
        &app.router,
        "/api/v1/birth/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &common::token_for(&officer),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_moves_application_to_pending_once(pool: PgPool) {
    common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let other = common::create_citizen(&pool, "other@test.com").await;
    let token = common::token_for(&citizen);
    let app = common::build_test_app(pool);

    let (_, created) = common::post_json(
        &app.router,
        "/api/v1/tax-id/applications",
        json!({ "form": { "subcity": "Bole" } }),
        &token,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/applications/{id}/payment");

    let (status, _) =
        common::post_json(&app.router, &uri, json!({ "transaction_ref": "  " }), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::post_json(
        &app.router,
        &uri,
        json!({ "transaction_ref": "TX-1" }),
        &common::token_for(&other),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) =
        common::post_json(&app.router, &uri, json!({ "transaction_ref": "TX-1" }), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["payment_reference"], "TX-1");

    let (status, json) =
        common::post_json(&app.router, &uri, json!({ "transaction_ref": "TX-2" }), &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        json["message"],
        "Payment already confirmed for this application"
    );
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_application_visibility(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let stranger_officer = common::create_officer(&pool, "o2@test.com", "Arada").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let other = common::create_citizen(&pool, "other@test.com").await;
    let admin = common::create_admin(&pool, "admin@test.com").await;
    let application = common::create_pending_birth(&pool, citizen.id, officer.id).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/applications/{}", application.id);

    for user in [&citizen, &officer, &admin] {
        let (status, json) = common::get(&app.router, &uri, Some(&common::token_for(user))).await;
        assert_eq!(status, StatusCode::OK, "user {} should see it", user.email);
        assert_eq!(json["data"]["id"], application.id);
    }
    for user in [&other, &stranger_officer] {
        let (status, _) = common::get(&app.router, &uri, Some(&common::token_for(user))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, json) = common::get(
        &app.router,
        "/api/v1/applications/999999",
        Some(&common::token_for(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Application not found");

    let (status, json) = common::get(
        &app.router,
        "/api/v1/applications/mine",
        Some(&common::token_for(&citizen)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_officer_queue_filters_by_status(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    common::create_pending_birth(&pool, citizen.id, officer.id).await;
    common::create_pending_birth(&pool, citizen.id, officer.id).await;
    let app = common::build_test_app(pool);
    let token = common::token_for(&officer);

    let (status, json) = common::get(
        &app.router,
        "/api/v1/officer/applications?status=pending&limit=1",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (_, json) = common::get(
        &app.router,
        "/api/v1/officer/applications?status=approved",
        Some(&token),
    )
    .await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
