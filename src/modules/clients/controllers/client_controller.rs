use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::clients::models::ClientRequest;
use crate::modules::clients::services::ClientService;

/// POST /clients
pub async fn create_client(
    service: web::Data<Arc<ClientService>>,
    owner: OwnerId,
    request: web::Json<ClientRequest>,
) -> Result<HttpResponse, AppError> {
    let client = service.create_client(&owner.0, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(client))
}

/// GET /clients
pub async fn list_clients(
    service: web::Data<Arc<ClientService>>,
    owner: OwnerId,
) -> Result<HttpResponse, AppError> {
    let clients = service.list_clients(&owner.0).await?;
    Ok(HttpResponse::Ok().json(clients))
}

/// GET /clients/{id}
pub async fn get_client(
    service: web::Data<Arc<ClientService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let client = service.get_client(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// PUT /clients/{id}
pub async fn update_client(
    service: web::Data<Arc<ClientService>>,
    owner: OwnerId,
    path: web::Path<String>,
    request: web::Json<ClientRequest>,
) -> Result<HttpResponse, AppError> {
    let client = service
        .update_client(&owner.0, &path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(client))
}

/// DELETE /clients/{id}
pub async fn delete_client(
    service: web::Data<Arc<ClientService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_client(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::post().to(create_client))
            .route("", web::get().to(list_clients))
            .route("/{id}", web::get().to(get_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
