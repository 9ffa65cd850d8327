//! The ordered log of alerts that triggered a notification.

use alert_core::Alert;
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::Result;

/// Append one alert to the history log.
pub async fn append_history(pool: &SqlitePool, alert: &Alert) -> Result<()> {
    let payload = serde_json::to_string(alert)?;

    sqlx::query(
        r#"
        INSERT INTO notification_history (alert_id, payload)
        VALUES (?, ?)
        "#,
    )
    .bind(&alert.id)
    .bind(payload)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the history log, newest entries first.
///
/// Entries whose payload no longer deserializes (written by an older
/// schema) are skipped with a warning rather than failing the whole load.
pub async fn list_history(pool: &SqlitePool) -> Result<Vec<Alert>> {
    let rows = sqlx::query_scalar::<_, String>(
        r#"
        SELECT payload
        FROM notification_history
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut alerts = Vec::with_capacity(rows.len());
    for payload in rows {
        match serde_json::from_str::<Alert>(&payload) {
            Ok(alert) => alerts.push(alert),
            Err(e) => warn!("Skipping unreadable history entry: {}", e),
        }
    }

    Ok(alerts)
}

/// Clear the history log in bulk.
pub async fn clear_history(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM notification_history
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
