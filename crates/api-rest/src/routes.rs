//! HTTP route handlers.
//!
//! Paths match the original upload API: `/`, `/upload`, `/history`,
//! `/rerun/:id`, `/delete/:id` and `/health`.

pub mod analyses;
pub mod health;
pub mod test_kinds;

use crate::state::AppState;
use axum::Router;

/// All API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(analyses::routes())
        .merge(test_kinds::routes())
}
