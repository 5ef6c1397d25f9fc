//! Conditional status transitions, one-shot certificate insert and workload
//! bookkeeping.

mod common;

use chrono::NaiveDate;
use civic_core::application::ApplicationStatus;
use civic_core::appointment::{Appointment, Period};
use civic_db::models::certificate::CreateCertificate;
use civic_db::repositories::{ApplicationRepo, CertificateRepo, OfficerRepo, UserRepo};
use sqlx::PgPool;

fn birth_certificate(application_id: i64, applicant_id: i64, officer_id: i64) -> CreateCertificate {
    CreateCertificate {
        application_id,
        applicant_id,
        category: "vital_record".to_string(),
        subtype: Some("birth".to_string()),
        appointment: Some(Appointment::new(
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            Period::Morning,
        )),
        document_ref: "doc.txt".to_string(),
        document_sha256: "0".repeat(64),
        approved_by: officer_id,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_confirms_only_once(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::create_birth_application(&pool, citizen.id, officer.id).await;
    assert_eq!(app.status().unwrap(), ApplicationStatus::PendingPayment);

    let paid = ApplicationRepo::confirm_payment(&pool, app.id, "TX-1")
        .await
        .unwrap()
        .expect("first confirmation should apply");
    assert_eq!(paid.status().unwrap(), ApplicationStatus::Pending);
    assert_eq!(paid.payment_reference.as_deref(), Some("TX-1"));

    let again = ApplicationRepo::confirm_payment(&pool, app.id, "TX-2").await.unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_terminal_transitions_require_pending(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::create_birth_application(&pool, citizen.id, officer.id).await;
    let mut conn = pool.acquire().await.unwrap();

    // Still awaiting payment.
    assert!(ApplicationRepo::mark_approved(&mut conn, app.id).await.unwrap().is_none());

    ApplicationRepo::confirm_payment(&pool, app.id, "TX-1").await.unwrap();
    let rejected = ApplicationRepo::mark_rejected(&mut conn, app.id, "Late submission")
        .await
        .unwrap()
        .expect("pending application should reject");
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Late submission"));
    assert!(rejected.resolved_at.is_some());

    assert!(ApplicationRepo::mark_approved(&mut conn, app.id).await.unwrap().is_none());
    assert!(ApplicationRepo::mark_rejected(&mut conn, app.id, "Again please")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_certificate_is_created_once(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let citizen = common::create_citizen(&pool, "c@test.com").await;
    let app = common::create_birth_application(&pool, citizen.id, officer.id).await;
    let input = birth_certificate(app.id, citizen.id, officer.id);
    let mut conn = pool.acquire().await.unwrap();

    let first = CertificateRepo::create_once(&mut conn, &input).await.unwrap();
    assert!(first.is_some());
    let second = CertificateRepo::create_once(&mut conn, &input).await.unwrap();
    assert!(second.is_none());

    assert_eq!(CertificateRepo::count_for_application(&pool, app.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_workload_never_goes_negative(pool: PgPool) {
    let officer = common::create_officer(&pool, "o@test.com", "Bole").await;
    let mut conn = pool.acquire().await.unwrap();

    OfficerRepo::increment_workload(&pool, officer.id).await.unwrap();
    OfficerRepo::decrement_workload(&mut conn, officer.id).await.unwrap();
    OfficerRepo::decrement_workload(&mut conn, officer.id).await.unwrap();

    let reloaded = UserRepo::find_by_id(&pool, officer.id).await.unwrap().unwrap();
    assert_eq!(reloaded.workload, 0);
}
