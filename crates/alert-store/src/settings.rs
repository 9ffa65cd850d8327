//! Key-value settings documents: user preferences and adjacent flags.

use alert_core::Preferences;
use sqlx::SqlitePool;

use crate::error::Result;

/// Storage key for the user-preference document.
pub const PREFERENCES_KEY: &str = "userPreferences";

/// Storage key for the one-time notification-prompt gate.
pub const NOTIFICATION_PROMPTED_KEY: &str = "notificationPrompted";

/// Create or replace a settings document.
pub async fn upsert_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a settings document by key.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>(
        r#"
        SELECT value
        FROM settings
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(value)
}

/// Persist the user-preference document as JSON.
pub async fn save_preferences(pool: &SqlitePool, preferences: &Preferences) -> Result<()> {
    let json = serde_json::to_string(preferences)?;
    upsert_setting(pool, PREFERENCES_KEY, &json).await
}

/// Load the user-preference document, if one has been stored.
pub async fn load_preferences(pool: &SqlitePool) -> Result<Option<Preferences>> {
    match get_setting(pool, PREFERENCES_KEY).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Record whether the one-time notification permission prompt was shown.
pub async fn set_notification_prompted(pool: &SqlitePool, prompted: bool) -> Result<()> {
    upsert_setting(
        pool,
        NOTIFICATION_PROMPTED_KEY,
        if prompted { "true" } else { "false" },
    )
    .await
}

/// Whether the one-time notification permission prompt was already shown.
pub async fn was_notification_prompted(pool: &SqlitePool) -> Result<bool> {
    Ok(get_setting(pool, NOTIFICATION_PROMPTED_KEY)
        .await?
        .as_deref()
        == Some("true"))
}
