//! Hypothesis Lab REST API
//!
//! Axum front end for the hypothesis-test engine. Clients upload a CSV of
//! `group`/`value` rows with a test name and confidence level, and get the
//! stored analysis back as JSON.
//!
//! ## Architecture
//!
//! - **app**: Router assembly, middleware and OpenAPI documentation
//! - **routes**: HTTP route handlers
//! - **middleware**: Request ID propagation and request logging
//! - **responses**: Response bodies
//! - **error**: HTTP error handling and conversion
//! - **state**: Shared state and the type-erased service seams
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hypothesis_lab_api_rest::{create_app, AppState};
//! use hypothesis_lab_common::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let addr = format!("{}:{}", config.server.host, config.server.port);
//!     let app = create_app(AppState::from_config(config).await?);
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod app;
pub mod error;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::{create_app, ApiDoc};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::{AnalysisServiceTrait, AppState, InfrastructureProbe, ReadinessProbe};
