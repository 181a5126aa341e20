use crate::error::{AppError, Result};
use crate::services::SignupService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub usernames: Vec<String>,
}

/// POST /api/v1/users/bulk
pub async fn bulk_create(
    service: web::Data<SignupService>,
    req: web::Json<BulkCreateRequest>,
) -> Result<HttpResponse> {
    if req.usernames.is_empty() {
        return Err(AppError::Validation(
            "at least one username is required".into(),
        ));
    }

    let outcome = service.bulk_create(req.into_inner().usernames).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
