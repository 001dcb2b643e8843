//! # Directory Handlers

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::json;
use talentfilter::DirectoryStatus;

/// Reports the cached directory without refreshing it.
pub async fn directory_status_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<DirectoryStatus>>, AppError> {
    let status = app_state.filter_client.directory_snapshot().status();
    let debug_info = Some(json!({ "ttlSecs": app_state.config.directory.ttl_secs }));
    Ok(wrap_response(status, debug_params, debug_info))
}

/// Forces a directory refetch and reports the result.
///
/// A failed refetch still answers 200 with the stale (or empty) directory.
pub async fn refresh_directory_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<DirectoryStatus>>, AppError> {
    let client = &app_state.filter_client;
    client.invalidate_directory();
    let status = client.refresh_directory().await.status();
    Ok(wrap_response(status, debug_params, None))
}
