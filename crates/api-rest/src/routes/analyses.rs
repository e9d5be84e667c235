//! Analysis endpoints: upload, history, re-run and delete.

use crate::{
    error::{ApiError, ApiResult, ErrorResponse},
    middleware::RequestId,
    responses::{AnalysisResponse, DetailResponse},
    state::AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use hypothesis_lab_application::{ServiceContext, UploadRequest};
use hypothesis_lab_domain::AnalysisId;
use tracing::debug;
use utoipa::ToSchema;

/// Multipart form accepted by `/upload`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// CSV file with `group` and `value` columns
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Test to run, e.g. `t-test` or `Mann-Whitney U`
    test_type: String,
    /// Confidence level in (0, 1); the configured default when omitted
    confidence_level: Option<f64>,
}

/// Analysis routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/history", get(history))
        .route("/rerun/:id", post(rerun))
        .route("/delete/:id", delete(remove))
}

fn service_context(request_id: Option<Extension<RequestId>>) -> ServiceContext {
    match request_id {
        Some(Extension(id)) => ServiceContext::new(id.0),
        None => ServiceContext::generate(),
    }
}

/// Read the upload form fields
async fn read_upload_form(mut multipart: Multipart) -> ApiResult<UploadRequest> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut test_type: Option<String> = None;
    let mut confidence_level: Option<f64> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.csv").to_string();
                let bytes = field.bytes().await?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("test_type") => {
                test_type = Some(field.text().await?.trim().to_string());
            }
            Some("confidence_level") => {
                let text = field.text().await?;
                let text = text.trim();
                if !text.is_empty() {
                    let value = text.parse::<f64>().map_err(|_| {
                        ApiError::BadRequest(format!(
                            "confidence_level must be a number, got '{text}'"
                        ))
                    })?;
                    confidence_level = Some(value);
                }
            }
            other => debug!(field = ?other, "Ignoring unknown form field"),
        }
    }

    let (filename, content) =
        file.ok_or_else(|| ApiError::BadRequest("Missing form field 'file'".to_string()))?;
    let test_type = test_type
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing form field 'test_type'".to_string()))?;

    Ok(UploadRequest {
        filename,
        content,
        test_type,
        confidence_level,
    })
}

/// Upload a CSV and run a test on it
#[utoipa::path(
    post,
    path = "/upload",
    tag = "analyses",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis stored", body = AnalysisResponse),
        (status = 400, description = "Unknown test, bad confidence level, unreadable CSV or degenerate data", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    multipart: Multipart,
) -> ApiResult<Json<AnalysisResponse>> {
    let ctx = service_context(request_id);
    let request = read_upload_form(multipart).await?;

    let analysis = state.analysis_service.upload(&ctx, request).await?;
    Ok(Json(analysis.into()))
}

/// All stored analyses, newest first
#[utoipa::path(
    get,
    path = "/history",
    tag = "analyses",
    responses(
        (status = 200, description = "Stored analyses", body = [AnalysisResponse])
    )
)]
pub async fn history(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
) -> ApiResult<Json<Vec<AnalysisResponse>>> {
    let ctx = service_context(request_id);
    let analyses = state.analysis_service.history(&ctx).await?;
    Ok(Json(analyses.into_iter().map(Into::into).collect()))
}

/// Re-run a stored analysis against its original CSV
#[utoipa::path(
    post,
    path = "/rerun/{id}",
    tag = "analyses",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Fresh results under the stored identity", body = AnalysisResponse),
        (status = 404, description = "Analysis or its CSV not found", body = ErrorResponse)
    )
)]
pub async fn rerun(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AnalysisResponse>> {
    let ctx = service_context(request_id);
    let analysis = state
        .analysis_service
        .rerun(&ctx, AnalysisId::new(id))
        .await?;
    Ok(Json(analysis.into()))
}

/// Delete an analysis and its stored CSV
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    tag = "analyses",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Deleted", body = DetailResponse),
        (status = 404, description = "Analysis not found", body = ErrorResponse)
    )
)]
pub async fn remove(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DetailResponse>> {
    let ctx = service_context(request_id);
    state
        .analysis_service
        .delete(&ctx, AnalysisId::new(id))
        .await?;
    Ok(Json(DetailResponse {
        detail: "Deleted".to_string(),
    }))
}
