/// Provisioning surfaces for the reserved-account pool and the blacklist.
use crate::db::{blacklist_repo, pool_repo};
use crate::error::{AppError, Result};
use crate::models::BlacklistKind;
use crate::services::screening;
use crate::validators::validate_username;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct CreateReservedAccountRequest {
    pub username: String,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/v1/pool/accounts
pub async fn create_reserved_account(
    pool: web::Data<PgPool>,
    req: web::Json<CreateReservedAccountRequest>,
) -> Result<HttpResponse> {
    let username = req.username.trim();
    if !validate_username(username) {
        return Err(AppError::Validation(format!(
            "invalid username: {}",
            username
        )));
    }

    let account = pool_repo::insert_account(
        pool.get_ref(),
        username,
        req.currency.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        req.notes.as_deref(),
    )
    .await
    .map_err(|err| {
        let conflict = matches!(
            &err,
            sqlx::Error::Database(db) if db.constraint() == Some("reserved_accounts_username_key")
        );
        if conflict {
            AppError::DuplicateUsername(username.to_string())
        } else {
            AppError::Database(err)
        }
    })?;

    Ok(HttpResponse::Created().json(account))
}

/// GET /api/v1/pool/accounts
pub async fn list_reserved_accounts(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let accounts = pool_repo::list_accounts(pool.get_ref()).await?;
    let unassigned = accounts.iter().filter(|a| !a.is_assigned).count();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "accounts": accounts,
        "unassigned": unassigned,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AddBlacklistEntryRequest {
    pub kind: String,
    pub value: String,
    pub reason: Option<String>,
}

/// POST /api/v1/blacklist
///
/// The value is normalized before storage so screening stays a pure
/// (kind, value) equality probe.
pub async fn add_blacklist_entry(
    pool: web::Data<PgPool>,
    req: web::Json<AddBlacklistEntryRequest>,
) -> Result<HttpResponse> {
    let kind = BlacklistKind::parse(&req.kind)
        .ok_or_else(|| AppError::Validation(format!("unknown blacklist kind: {}", req.kind)))?;
    let value = screening::normalize(&req.value)
        .ok_or_else(|| AppError::Validation("blacklist value must not be empty".into()))?;

    let entry = blacklist_repo::insert_entry(pool.get_ref(), kind, &value, req.reason.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// GET /api/v1/blacklist
pub async fn list_blacklist(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let entries = blacklist_repo::list_entries(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// DELETE /api/v1/blacklist/{id}
///
/// Deactivates the entry; screening only matches active rows.
pub async fn remove_blacklist_entry(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if blacklist_repo::deactivate_entry(pool.get_ref(), id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("no active blacklist entry {}", id)))
    }
}
