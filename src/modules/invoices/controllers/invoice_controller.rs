use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::OwnerId;
use crate::modules::invoices::models::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::modules::invoices::services::InvoiceService;

pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    owner: OwnerId,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .create_invoice(&owner.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(invoice))
}

pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    owner: OwnerId,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list_invoices(&owner.0).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn update_invoice(
    service: web::Data<Arc<InvoiceService>>,
    owner: OwnerId,
    path: web::Path<String>,
    request: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .update_invoice(&owner.0, &path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub async fn delete_invoice(
    service: web::Data<Arc<InvoiceService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_invoice(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice)),
    );
}
