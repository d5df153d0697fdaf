use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;

/// The opaque owner identity every query and write is scoped by.
///
/// Resolved by [`ApiKeyAuth`] from the `X-API-Key` header and threaded
/// explicitly into repositories; handlers receive it as an extractor.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

impl FromRequest for OwnerId {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let owner = req.extensions().get::<OwnerId>().cloned();
        ready(owner.ok_or_else(|| {
            Error::from(AppError::unauthorized("Request is not authenticated"))
        }))
    }
}

/// API-key authentication middleware
///
/// Looks the key up in the `accounts` table and stores the resolved
/// [`OwnerId`] in the request extensions.
pub struct ApiKeyAuth {
    pool: MySqlPool,
}

impl ApiKeyAuth {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            pool: self.pool.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    pool: MySqlPool,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            // Liveness endpoints stay public
            let path = req.path();
            if path == "/health" || path == "/ready" || path == "/" {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            let owner_id = resolve_owner(&pool, api_key).await.map_err(Error::from)?;
            req.extensions_mut().insert(OwnerId(owner_id));

            svc.call(req).await
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    is_active: bool,
}

async fn resolve_owner(pool: &MySqlPool, api_key: &str) -> crate::core::Result<String> {
    let account = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, is_active
        FROM accounts
        WHERE api_key = ?
        LIMIT 1
        "#,
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Database)?
    .ok_or_else(|| AppError::unauthorized("Invalid API key"))?;

    if !account.is_active {
        return Err(AppError::unauthorized("Account is disabled"));
    }

    Ok(account.id)
}
