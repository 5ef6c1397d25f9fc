//! Periodic refresh of the `officer_performance` report.
//!
//! Reads applications only; it shares no state with request handling.

use std::time::Duration;

use civic_db::repositories::PerformanceRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Recompute per-officer counts every `interval` until `cancel` fires.
///
/// The first refresh runs immediately.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Officer performance refresh started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Officer performance refresh stopping");
                break;
            }
            _ = ticker.tick() => {
                match PerformanceRepo::refresh_all(&pool).await {
                    Ok(officers) => {
                        tracing::debug!(officers, "Officer performance refreshed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Officer performance refresh failed");
                    }
                }
            }
        }
    }
}
