use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::products::models::CreateProductRequest;
use crate::modules::products::services::ProductService;

/// POST /products
pub async fn create_product(
    service: web::Data<Arc<ProductService>>,
    owner: OwnerId,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = service
        .create_product(&owner.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(product))
}

/// GET /products
pub async fn list_products(
    service: web::Data<Arc<ProductService>>,
    owner: OwnerId,
) -> Result<HttpResponse, AppError> {
    let products = service.list_products(&owner.0).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /products/{id}
pub async fn get_product(
    service: web::Data<Arc<ProductService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product = service.get_product(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// PUT /products/{id}
pub async fn update_product(
    service: web::Data<Arc<ProductService>>,
    owner: OwnerId,
    path: web::Path<String>,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = service
        .update_product(&owner.0, &path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// DELETE /products/{id}
pub async fn delete_product(
    service: web::Data<Arc<ProductService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_product(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /products/import
///
/// Bulk entry point for the invoice scanner: merges extracted products
/// into the catalog by name.
pub async fn import_products(
    service: web::Data<Arc<ProductService>>,
    owner: OwnerId,
    request: web::Json<Vec<CreateProductRequest>>,
) -> Result<HttpResponse, AppError> {
    service.batch_import(&owner.0, request.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create_product))
            .route("", web::get().to(list_products))
            .route("/import", web::post().to(import_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
