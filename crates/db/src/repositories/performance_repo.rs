//! Repository for the `officer_performance` reporting snapshot.

use sqlx::PgPool;

use crate::models::performance::OfficerPerformance;

/// Column list for `officer_performance` queries.
const COLUMNS: &str = "officer_id, approved_count, rejected_count, pending_count, \
    avg_resolution_secs, refreshed_at";

/// Provides refresh and read access to officer performance rows.
pub struct PerformanceRepo;

impl PerformanceRepo {
    /// Recompute the snapshot for every officer in one statement.
    ///
    /// Returns the number of officer rows written.
    pub async fn refresh_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO officer_performance \
                (officer_id, approved_count, rejected_count, pending_count, \
                 avg_resolution_secs, refreshed_at) \
             SELECT u.id, \
                    COUNT(a.id) FILTER (WHERE a.status = 'approved'), \
                    COUNT(a.id) FILTER (WHERE a.status = 'rejected'), \
                    COUNT(a.id) FILTER (WHERE a.status IN ('pending_payment', 'pending')), \
                    AVG(EXTRACT(EPOCH FROM a.resolved_at - a.created_at)::DOUBLE PRECISION) \
                        FILTER (WHERE a.resolved_at IS NOT NULL), \
                    NOW() \
             FROM users u \
             LEFT JOIN applications a ON a.assigned_officer_id = u.id \
             WHERE u.role = 'officer' \
             GROUP BY u.id \
             ON CONFLICT (officer_id) DO UPDATE SET \
                approved_count = EXCLUDED.approved_count, \
                rejected_count = EXCLUDED.rejected_count, \
                pending_count = EXCLUDED.pending_count, \
                avg_resolution_secs = EXCLUDED.avg_resolution_secs, \
                refreshed_at = EXCLUDED.refreshed_at",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// All snapshot rows, ordered by officer.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<OfficerPerformance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM officer_performance ORDER BY officer_id ASC");
        sqlx::query_as::<_, OfficerPerformance>(&query)
            .fetch_all(pool)
            .await
    }
}
