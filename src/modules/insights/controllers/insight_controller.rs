use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::OwnerId;
use crate::modules::insights::models::{
    DescriptionRequest, DescriptionResponse, InvoiceImageRequest,
};
use crate::modules::insights::services::InsightService;

pub async fn business_report(
    service: web::Data<Arc<InsightService>>,
    owner: OwnerId,
) -> Result<HttpResponse, AppError> {
    let report = service.business_report(&owner.0).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub async fn generate_description(
    service: web::Data<Arc<InsightService>>,
    _owner: OwnerId,
    request: web::Json<DescriptionRequest>,
) -> Result<HttpResponse, AppError> {
    let description = service.generate_description(&request.item_name).await?;
    Ok(HttpResponse::Ok().json(DescriptionResponse { description }))
}

pub async fn extract_invoice_items(
    service: web::Data<Arc<InsightService>>,
    _owner: OwnerId,
    request: web::Json<InvoiceImageRequest>,
) -> Result<HttpResponse, AppError> {
    let items = service.extract_invoice_items(&request).await?;
    Ok(HttpResponse::Ok().json(items))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/insights")
            .route("/report", web::post().to(business_report))
            .route("/description", web::post().to(generate_description))
            .route("/extract-items", web::post().to(extract_invoice_items)),
    );
}
