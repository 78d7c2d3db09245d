//! Router configuration for the API.
//!
//! Registers every handler under `/api`, serves the generated OpenAPI
//! document with Swagger UI and installs the middleware stack.

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Creates the application router.
///
/// # Middleware Order
/// Layers added last run first, so a request passes through:
/// 1. CORS
/// 2. Request ID, so everything below can see it
/// 3. Compression
/// 4. Error envelope, which stamps the request ID into error bodies
/// 5. Logging
/// 6. Request timeout
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(handlers::accounts::account_routes())
        .merge(handlers::courses::course_routes())
        .merge(handlers::enrollments::enrollment_routes())
        .merge(handlers::health::health_routes())
}
