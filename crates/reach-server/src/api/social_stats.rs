use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use reach_core::{SocialHandles, SocialStatsReport};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// `POST /api/v1/social-stats`
///
/// Extracts every handle present in the body. Extraction failures never
/// surface as HTTP errors: a platform that could not be read comes back as
/// fallback stats with `error` set, and absent platforms come back `null`.
/// Only a body that is not a handles record is rejected.
pub(super) async fn collect_social_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SocialHandles>, JsonRejection>,
) -> Result<Json<ApiResponse<SocialStatsReport>>, ApiError> {
    let Json(handles) =
        payload.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let requested: Vec<String> = handles
        .requested()
        .map(|(platform, _)| platform.to_string())
        .collect();
    tracing::info!(request_id = %req_id.0, platforms = ?requested, "collecting social stats");

    let report = state.coordinator.collect(&handles).await;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
