use tokio::time::{interval, Duration};

use crate::repositories::{session::SessionRepository, sqlx_repo::SqlxSessionRepo};

/// Deletes expired session rows once a day. Expiry itself is enforced at
/// lookup time; this only keeps the table from growing without bound.
pub async fn start_session_purge_task(repo: SqlxSessionRepo) {
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match repo.purge_expired().await {
            Ok(count) => tracing::info!("Purged {} expired sessions", count),
            Err(e) => tracing::error!("Session purge failed: {}", e),
        }
    }
}
