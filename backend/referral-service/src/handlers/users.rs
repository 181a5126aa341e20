use crate::db::{referral_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{ProfileFields, User, UserSummary, UserView};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

/// GET /api/v1/users/{identifier}
///
/// The identifier may be a referral code or a username; code wins.
pub async fn lookup_user(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let identifier = path.into_inner();
    let user = user_repo::find_by_identifier(pool.get_ref(), &identifier)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no user for identifier {}", identifier)))?;

    let view = build_user_view(pool.get_ref(), user).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// PATCH /api/v1/users/{identifier}
///
/// Mutates profile fields only; username, code and referrer are immutable.
pub async fn update_profile(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    fields: web::Json<ProfileFields>,
) -> Result<HttpResponse> {
    let identifier = path.into_inner();
    let user = user_repo::find_by_identifier(pool.get_ref(), &identifier)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no user for identifier {}", identifier)))?;

    let updated = user_repo::update_profile(pool.get_ref(), user.id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no user for identifier {}", identifier)))?;

    let view = build_user_view(pool.get_ref(), updated).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/v1/search?q=
pub async fn search_users(
    query: web::Query<SearchQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let users = user_repo::search(pool.get_ref(), &query.q).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "results": users, "count": users.len() })))
}

async fn build_user_view(pool: &PgPool, user: User) -> Result<UserView> {
    let referred_by = match user.referred_by_user_id {
        Some(referrer_id) => user_repo::find_by_id(pool, referrer_id)
            .await?
            .as_ref()
            .map(UserSummary::from),
        None => None,
    };

    let referrals = referral_repo::list_referred(pool, user.id)
        .await?
        .iter()
        .map(UserSummary::from)
        .collect();

    Ok(UserView {
        id: user.id,
        username: user.username,
        code: user.code,
        first_name: user.first_name,
        last_name: user.last_name,
        phone: user.phone,
        messaging_id: user.messaging_id,
        referred_by,
        referrals,
        created_at: user.created_at,
    })
}
