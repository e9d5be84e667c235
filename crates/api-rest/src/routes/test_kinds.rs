//! Supported test listing.

use crate::{responses::TestKindResponse, state::AppState};
use axum::{routing::get, Json, Router};
use hypothesis_lab_domain::TestKind;

/// Test kind routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/test-kinds", get(list_test_kinds))
}

/// List the supported tests
#[utoipa::path(
    get,
    path = "/test-kinds",
    tag = "tests",
    responses(
        (status = 200, description = "Supported hypothesis tests", body = [TestKindResponse])
    )
)]
pub async fn list_test_kinds() -> Json<Vec<TestKindResponse>> {
    Json(TestKind::ALL.into_iter().map(TestKindResponse::from).collect())
}
