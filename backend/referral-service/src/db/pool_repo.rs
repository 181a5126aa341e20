/// Reserved-account pool - owns the assignment fields of reserved_accounts
use crate::models::ReservedAccount;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

/// Claim the next unassigned reserved account inside the caller's
/// transaction.
///
/// Selection order: oldest unassigned row matching the preferred currency,
/// then oldest unassigned row of any currency. `FOR UPDATE SKIP LOCKED`
/// serializes concurrent claimants: the row stays locked until the caller's
/// transaction commits or rolls back, and racing transactions skip past it
/// to the next candidate instead of blocking.
pub async fn claim_next_unassigned(
    conn: &mut PgConnection,
    preferred_currency: Option<&str>,
) -> Result<Option<ReservedAccount>, sqlx::Error> {
    if let Some(currency) = preferred_currency {
        let claimed = sqlx::query_as::<_, ReservedAccount>(
            r#"
            SELECT id, username, currency, is_assigned, assigned_user_id, assigned_at, notes
            FROM reserved_accounts
            WHERE is_assigned = FALSE AND currency = $1
            ORDER BY id ASC
            FOR UPDATE SKIP LOCKED
            LIMIT 1
            "#,
        )
        .bind(currency)
        .fetch_optional(&mut *conn)
        .await?;

        if claimed.is_some() {
            return Ok(claimed);
        }
    }

    sqlx::query_as::<_, ReservedAccount>(
        r#"
        SELECT id, username, currency, is_assigned, assigned_user_id, assigned_at, notes
        FROM reserved_accounts
        WHERE is_assigned = FALSE
        ORDER BY id ASC
        FOR UPDATE SKIP LOCKED
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

/// Mark a claimed account as assigned to a user. Conditional on the row
/// still being unassigned, so a claim can never fire twice.
pub async fn mark_assigned(
    conn: &mut PgConnection,
    account_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        r#"
        UPDATE reserved_accounts
        SET is_assigned = TRUE, assigned_user_id = $2, assigned_at = $3
        WHERE id = $1 AND is_assigned = FALSE
        "#,
    )
    .bind(account_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(updated.rows_affected() > 0)
}

/// Provision a reserved account (external provisioning surface).
pub async fn insert_account(
    pool: &PgPool,
    username: &str,
    currency: Option<&str>,
    notes: Option<&str>,
) -> Result<ReservedAccount, sqlx::Error> {
    sqlx::query_as::<_, ReservedAccount>(
        r#"
        INSERT INTO reserved_accounts (username, currency, notes)
        VALUES ($1, $2, $3)
        RETURNING id, username, currency, is_assigned, assigned_user_id, assigned_at, notes
        "#,
    )
    .bind(username)
    .bind(currency)
    .bind(notes)
    .fetch_one(pool)
    .await
}

/// List the pool, unassigned first, oldest first within each group.
pub async fn list_accounts(pool: &PgPool) -> Result<Vec<ReservedAccount>, sqlx::Error> {
    sqlx::query_as::<_, ReservedAccount>(
        r#"
        SELECT id, username, currency, is_assigned, assigned_user_id, assigned_at, notes
        FROM reserved_accounts
        ORDER BY is_assigned ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_unassigned(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reserved_accounts WHERE is_assigned = FALSE",
    )
    .fetch_one(pool)
    .await
}
