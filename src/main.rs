use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bahikhata::config::Config;
use bahikhata::middleware::ApiKeyAuth;
use bahikhata::modules::clients::controllers::client_controller;
use bahikhata::modules::clients::repositories::ClientRepository;
use bahikhata::modules::clients::services::ClientService;
use bahikhata::modules::expenses::controllers::expense_controller;
use bahikhata::modules::expenses::repositories::ExpenseRepository;
use bahikhata::modules::expenses::services::ExpenseService;
use bahikhata::modules::health::controllers::health_controller;
use bahikhata::modules::insights::controllers::insight_controller;
use bahikhata::modules::insights::services::{GeminiClient, GenAiClient, InsightService};
use bahikhata::modules::invoices::controllers::invoice_controller;
use bahikhata::modules::invoices::repositories::InvoiceRepository;
use bahikhata::modules::invoices::services::{InvoiceService, StatusReconciler};
use bahikhata::modules::payments::controllers::payment_controller;
use bahikhata::modules::payments::repositories::PaymentRepository;
use bahikhata::modules::payments::services::PaymentService;
use bahikhata::modules::products::controllers::product_controller;
use bahikhata::modules::products::repositories::ProductRepository;
use bahikhata::modules::products::services::ProductService;
use bahikhata::modules::profile::controllers::profile_controller;
use bahikhata::modules::profile::repositories::ProfileRepository;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bahikhata=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting Bahikhata invoicing backend");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Repositories
    let client_repo = Arc::new(ClientRepository::new(db_pool.clone()));
    let product_repo = Arc::new(ProductRepository::new(db_pool.clone()));
    let invoice_repo = Arc::new(InvoiceRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(PaymentRepository::new(db_pool.clone()));
    let expense_repo = Arc::new(ExpenseRepository::new(db_pool.clone()));
    let profile_repo = Arc::new(ProfileRepository::new(db_pool.clone()));

    // Services
    let expense_service = Arc::new(ExpenseService::new(expense_repo.clone()));
    let reconciler = Arc::new(StatusReconciler::new(
        invoice_repo.clone(),
        payment_repo.clone(),
    ));
    let client_service = Arc::new(ClientService::new(
        client_repo.clone(),
        invoice_repo.clone(),
    ));
    let product_service = Arc::new(ProductService::new(
        product_repo.clone(),
        invoice_repo.clone(),
        expense_service.clone(),
    ));
    let invoice_service = Arc::new(InvoiceService::new(
        invoice_repo.clone(),
        client_repo.clone(),
        product_repo.clone(),
        profile_repo.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(
        payment_repo.clone(),
        invoice_repo.clone(),
        reconciler.clone(),
    ));
    let genai: Arc<dyn GenAiClient> = Arc::new(GeminiClient::new(&config.genai));
    let insight_service = Arc::new(InsightService::new(
        genai,
        product_repo.clone(),
        invoice_repo.clone(),
        expense_repo.clone(),
    ));

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let auth_pool = db_pool.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .wrap(ApiKeyAuth::new(auth_pool.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(client_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(expense_service.clone()))
            .app_data(web::Data::new(insight_service.clone()))
            .app_data(web::Data::new(profile_repo.clone()))
            .route("/", web::get().to(index))
            .configure(health_controller::configure)
            .service(
                web::scope("/api/v1")
                    .configure(client_controller::configure)
                    .configure(product_controller::configure)
                    .configure(invoice_controller::configure)
                    .configure(payment_controller::configure)
                    .configure(expense_controller::configure)
                    .configure(profile_controller::configure)
                    .configure(insight_controller::configure),
            )
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Bahikhata Invoicing Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
