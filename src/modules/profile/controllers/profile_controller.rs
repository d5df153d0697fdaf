use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::OwnerId;
use crate::modules::profile::models::BusinessProfileRequest;
use crate::modules::profile::repositories::ProfileRepository;

pub async fn get_profile(
    repo: web::Data<Arc<ProfileRepository>>,
    owner: OwnerId,
) -> Result<HttpResponse, AppError> {
    let profile = repo
        .get(&owner.0)
        .await?
        .ok_or_else(|| AppError::not_found("Business profile has not been set up"))?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn put_profile(
    repo: web::Data<Arc<ProfileRepository>>,
    owner: OwnerId,
    request: web::Json<BusinessProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    let profile = repo.upsert(&owner.0, &request).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .route("", web::get().to(get_profile))
            .route("", web::put().to(put_profile)),
    );
}
