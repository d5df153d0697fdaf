use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::OwnerId;
use crate::modules::expenses::models::ExpenseRequest;
use crate::modules::expenses::services::ExpenseService;

pub async fn create_expense(
    service: web::Data<Arc<ExpenseService>>,
    owner: OwnerId,
    request: web::Json<ExpenseRequest>,
) -> Result<HttpResponse, AppError> {
    let expense = service
        .create_expense(&owner.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(expense))
}

pub async fn list_expenses(
    service: web::Data<Arc<ExpenseService>>,
    owner: OwnerId,
) -> Result<HttpResponse, AppError> {
    let expenses = service.list_expenses(&owner.0).await?;
    Ok(HttpResponse::Ok().json(expenses))
}

pub async fn get_expense(
    service: web::Data<Arc<ExpenseService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let expense = service.get_expense(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(expense))
}

pub async fn update_expense(
    service: web::Data<Arc<ExpenseService>>,
    owner: OwnerId,
    path: web::Path<String>,
    request: web::Json<ExpenseRequest>,
) -> Result<HttpResponse, AppError> {
    let expense = service
        .update_expense(&owner.0, &path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expense))
}

pub async fn delete_expense(
    service: web::Data<Arc<ExpenseService>>,
    owner: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_expense(&owner.0, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/expenses")
            .route("", web::post().to(create_expense))
            .route("", web::get().to(list_expenses))
            .route("/{id}", web::get().to(get_expense))
            .route("/{id}", web::put().to(update_expense))
            .route("/{id}", web::delete().to(delete_expense)),
    );
}
