/// User registry - owns the users relation and the referrer link
use crate::models::{ProfileFields, User};
use sqlx::{PgConnection, PgPool};

/// Cap on search results returned to the adapter.
pub const SEARCH_RESULT_CAP: i64 = 200;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub code: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub messaging_id: Option<&'a str>,
    pub referred_by_user_id: Option<i64>,
}

/// Insert a new user row.
///
/// A code collision returns `None` without erroring (`ON CONFLICT (code)
/// DO NOTHING`), which keeps the enclosing transaction healthy so the
/// orchestrator can retry with a fresh code. A username collision is a
/// different constraint target and still raises `users_username_key`,
/// which is the caller's fault.
pub async fn create_user(
    conn: &mut PgConnection,
    new: NewUser<'_>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, code, first_name, last_name, phone, messaging_id, referred_by_user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (code) DO NOTHING
        RETURNING id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        "#,
    )
    .bind(new.username)
    .bind(new.code)
    .bind(new.first_name)
    .bind(new.last_name)
    .bind(new.phone)
    .bind(new.messaging_id)
    .bind(new.referred_by_user_id)
    .fetch_optional(conn)
    .await
}

/// Insert for bulk import: a username collision is a silent skip, not an error.
///
/// A code collision still surfaces as a unique-violation error; the caller
/// retries with a fresh code. Runs on the pool (one auto-committed
/// statement per entry), matching the batch contract of per-entry
/// independence.
pub async fn insert_ignore_username_conflict(
    pool: &PgPool,
    username: &str,
    code: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, code)
        VALUES ($1, $2)
        ON CONFLICT (username) DO NOTHING
        RETURNING id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        "#,
    )
    .bind(username)
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        FROM users
        WHERE code = $1
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Resolve an identifier that may be either a referral code or a username.
/// Code lookup takes precedence.
pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, sqlx::Error> {
    if let Some(user) = find_by_code(pool, identifier).await? {
        return Ok(Some(user));
    }
    find_by_username(pool, identifier).await
}

/// Update profile fields only. Username, code and referrer are immutable
/// post-creation; absent fields keep their stored value.
pub async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    fields: &ProfileFields,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET first_name   = COALESCE($1, first_name),
            last_name    = COALESCE($2, last_name),
            phone        = COALESCE($3, phone),
            messaging_id = COALESCE($4, messaging_id)
        WHERE id = $5
        RETURNING id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        "#,
    )
    .bind(fields.first_name.as_deref())
    .bind(fields.last_name.as_deref())
    .bind(fields.phone.as_deref())
    .bind(fields.messaging_id.as_deref())
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Substring search across identity columns, most recent first, capped.
pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<User>, sqlx::Error> {
    let pattern = format!("%{}%", query);
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, code, first_name, last_name, phone, messaging_id, referred_by_user_id, created_at
        FROM users
        WHERE username ILIKE $1
           OR code ILIKE $1
           OR first_name ILIKE $1
           OR last_name ILIKE $1
           OR phone ILIKE $1
           OR messaging_id ILIKE $1
        ORDER BY id DESC
        LIMIT $2
        "#,
    )
    .bind(&pattern)
    .bind(SEARCH_RESULT_CAP)
    .fetch_all(pool)
    .await
}
