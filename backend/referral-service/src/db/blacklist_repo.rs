/// Blacklist records - banned values keyed by (kind, normalized value)
use crate::models::{BlacklistEntry, BlacklistKind};
use sqlx::PgPool;

/// Look up the reason for an active banned value. Values are stored
/// normalized, so this is a pure equality probe.
pub async fn find_active_reason(
    pool: &PgPool,
    kind: BlacklistKind,
    value: &str,
) -> Result<Option<Option<String>>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT reason
        FROM blacklist
        WHERE kind = $1 AND value = $2 AND active = TRUE
        LIMIT 1
        "#,
    )
    .bind(kind.as_str())
    .bind(value)
    .fetch_optional(pool)
    .await
}

pub async fn insert_entry(
    pool: &PgPool,
    kind: BlacklistKind,
    value: &str,
    reason: Option<&str>,
) -> Result<BlacklistEntry, sqlx::Error> {
    sqlx::query_as::<_, BlacklistEntry>(
        r#"
        INSERT INTO blacklist (kind, value, reason)
        VALUES ($1, $2, $3)
        RETURNING id, kind, value, reason, active, created_at
        "#,
    )
    .bind(kind.as_str())
    .bind(value)
    .bind(reason)
    .fetch_one(pool)
    .await
}

/// Deactivate an entry. Inactive entries no longer match during screening.
pub async fn deactivate_entry(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query("UPDATE blacklist SET active = FALSE WHERE id = $1 AND active = TRUE")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(updated.rows_affected() > 0)
}

pub async fn list_entries(pool: &PgPool) -> Result<Vec<BlacklistEntry>, sqlx::Error> {
    sqlx::query_as::<_, BlacklistEntry>(
        r#"
        SELECT id, kind, value, reason, active, created_at
        FROM blacklist
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}
