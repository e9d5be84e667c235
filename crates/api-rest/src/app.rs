//! Application builder.
//!
//! Assembles routes, middleware, OpenAPI documentation and state into an
//! Axum router.

use crate::{
    error::ErrorResponse,
    middleware::{logging_middleware, request_id_middleware},
    responses::{AnalysisResponse, DataRow, DetailResponse, MessageResponse, TestKindResponse},
    routes::{
        self,
        analyses::UploadForm,
        health::{HealthResponse, ReadinessChecks, ReadinessResponse},
    },
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the upload API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hypothesis Testing API",
        description = "Upload group/value CSV files and run hypothesis tests on them",
        license(name = "MIT"),
    ),
    paths(
        routes::health::root,
        routes::health::health,
        routes::health::ready,
        routes::analyses::upload,
        routes::analyses::history,
        routes::analyses::rerun,
        routes::analyses::remove,
        routes::test_kinds::list_test_kinds,
    ),
    components(schemas(
        AnalysisResponse,
        DataRow,
        DetailResponse,
        ErrorResponse,
        HealthResponse,
        MessageResponse,
        ReadinessChecks,
        ReadinessResponse,
        TestKindResponse,
        UploadForm,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "analyses", description = "Uploads, history, re-runs and deletion"),
        (name = "tests", description = "Supported hypothesis tests"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let request_timeout = state.config.request_timeout();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::routes())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn(logging_middleware)),
        )
}
