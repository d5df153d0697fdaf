use std::sync::Arc;

use actix_web::{web, HttpResponse};

use serde::Deserialize;

use crate::core::AppError;
use crate::middleware::OwnerId;
use crate::modules::payments::models::PaymentRequest;
use crate::modules::payments::services::PaymentService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListQuery {
    pub client_id: Option<String>,
}

pub async fn record_payment(
    service: web::Data<Arc<PaymentService>>,
    owner: OwnerId,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service
        .record_payment(&owner.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(payment))
}

pub async fn list_payments(
    service: web::Data<Arc<PaymentService>>,
    owner: OwnerId,
    query: web::Query<PaymentListQuery>,
) -> Result<HttpResponse, AppError> {
    let payments = service
        .list_payments(&owner.0, query.client_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(payments))
}

pub async fn get_payment(
    service: web::Data<Arc<PaymentService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payment = service.get_payment(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

pub async fn update_payment(
    service: web::Data<Arc<PaymentService>>,
    owner: OwnerId,
    path: web::Path<String>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service
        .update_payment(&owner.0, &path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(payment))
}

pub async fn delete_payment(
    service: web::Data<Arc<PaymentService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_payment(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(record_payment))
            .route("", web::get().to(list_payments))
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}", web::put().to(update_payment))
            .route("/{id}", web::delete().to(delete_payment)),
    );
}
