//! Officer routing queries over the `users` table.
//!
//! The workload counter is advisory. Increments and decrements are single
//! statements but are not coordinated with the selection read.

use civic_core::assignment::OfficerCandidate;
use civic_core::error::CoreError;
use civic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::User;
use crate::repositories::user_repo::COLUMNS;

/// Provides officer lookup and workload bookkeeping.
pub struct OfficerRepo;

impl OfficerRepo {
    /// Approvers in `subcity` who are not on leave, least loaded first.
    pub async fn list_eligible(
        pool: &PgPool,
        subcity: &str,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE role = 'officer' AND department = 'approver' \
               AND on_leave = FALSE AND subcity = $1 \
             ORDER BY workload ASC, id ASC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(subcity)
            .fetch_all(pool)
            .await
    }

    /// Convert officer rows into assignment candidates.
    pub fn to_candidates(officers: &[User]) -> Result<Vec<OfficerCandidate>, CoreError> {
        officers
            .iter()
            .filter_map(|user| match user.kind() {
                Ok(civic_core::roles::UserKind::Officer(profile)) => Some(Ok(OfficerCandidate {
                    officer_id: user.id,
                    profile,
                })),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    /// Bump an officer's workload after assigning them a request.
    pub async fn increment_workload(pool: &PgPool, officer_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET workload = workload + 1 WHERE id = $1 AND role = 'officer'")
            .bind(officer_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Release one unit of workload when a request reaches a terminal state.
    ///
    /// Never goes below zero.
    pub async fn decrement_workload(
        conn: &mut PgConnection,
        officer_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET workload = GREATEST(workload - 1, 0) \
             WHERE id = $1 AND role = 'officer'",
        )
        .bind(officer_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Toggle an officer's leave flag. Returns `false` if no officer matched.
    pub async fn set_on_leave(
        pool: &PgPool,
        officer_id: DbId,
        on_leave: bool,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET on_leave = $2 WHERE id = $1 AND role = 'officer'")
                .bind(officer_id)
                .bind(on_leave)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
