//! The append-only set of alert ids that already triggered a notification.

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::error::Result;

/// Record an alert id as notified. Re-adding an id is a no-op, which keeps
/// per-cycle writes idempotent on retry.
pub async fn mark_notified(pool: &SqlitePool, alert_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO notified_alerts (alert_id)
        VALUES (?)
        "#,
    )
    .bind(alert_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Whether an alert id has already triggered a notification.
pub async fn is_notified(pool: &SqlitePool, alert_id: &str) -> Result<bool> {
    let found = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT 1
        FROM notified_alerts
        WHERE alert_id = ?
        "#,
    )
    .bind(alert_id)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// Load the full notified-id set.
pub async fn load_notified_ids(pool: &SqlitePool) -> Result<HashSet<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT alert_id
        FROM notified_alerts
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ids.into_iter().collect())
}
