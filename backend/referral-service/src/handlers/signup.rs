use crate::error::Result;
use crate::models::SignupIntake;
use crate::services::SignupService;
use actix_web::{web, HttpResponse};

/// POST /api/v1/signups
pub async fn submit_signup(
    service: web::Data<SignupService>,
    intake: web::Json<SignupIntake>,
) -> Result<HttpResponse> {
    let outcome = service.submit_signup(intake.into_inner()).await?;
    Ok(HttpResponse::Created().json(outcome))
}
