/// Referral ledger - owns the referrer -> referred edges
use crate::models::{ReferralEdge, User};
use sqlx::{PgConnection, PgPool};

/// Record a referral edge. Idempotent: re-recording an existing
/// (referrer, referred) pair is a no-op, never an error, so a replayed
/// signup confirmation cannot fail here.
pub async fn record(
    conn: &mut PgConnection,
    referrer_user_id: i64,
    referred_user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO referrals (referrer_user_id, referred_user_id)
        VALUES ($1, $2)
        ON CONFLICT (referrer_user_id, referred_user_id) DO NOTHING
        "#,
    )
    .bind(referrer_user_id)
    .bind(referred_user_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Users credited to a referrer, newest edge first.
pub async fn list_referred(pool: &PgPool, referrer_user_id: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.code, u.first_name, u.last_name, u.phone, u.messaging_id, u.referred_by_user_id, u.created_at
        FROM referrals r
        JOIN users u ON u.id = r.referred_user_id
        WHERE r.referrer_user_id = $1
        ORDER BY r.id DESC
        "#,
    )
    .bind(referrer_user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_edge(
    pool: &PgPool,
    referrer_user_id: i64,
    referred_user_id: i64,
) -> Result<Option<ReferralEdge>, sqlx::Error> {
    sqlx::query_as::<_, ReferralEdge>(
        r#"
        SELECT id, referrer_user_id, referred_user_id, created_at
        FROM referrals
        WHERE referrer_user_id = $1 AND referred_user_id = $2
        "#,
    )
    .bind(referrer_user_id)
    .bind(referred_user_id)
    .fetch_optional(pool)
    .await
}
