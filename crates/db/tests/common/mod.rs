//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use civic_core::application::{ApplicationCategory, VitalSubtype};
use civic_core::roles::{Department, Role};
use civic_core::types::DbId;
use civic_db::models::application::{Application, CreateApplication};
use civic_db::models::user::{CreateUser, User};
use civic_db::repositories::{ApplicationRepo, UserRepo};
use sqlx::PgPool;

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

pub async fn create_citizen(pool: &PgPool, email: &str) -> User {
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

pub async fn create_birth_application(
    pool: &PgPool,
    applicant_id: DbId,
    officer_id: DbId,
) -> Application {
    ApplicationRepo::create(
        pool,
        &CreateApplication {
            applicant_id,
            category: ApplicationCategory::VitalRecord,
            subtype: Some(VitalSubtype::Birth),
            form: serde_json::json!({ "subcity": "Bole", "child_name": "Abebe" }),
            assigned_officer_id: officer_id,
        },
    )
    .await
    .expect("application creation should succeed")
}
