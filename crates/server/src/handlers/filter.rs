//! # Filter Handlers
//!
//! Translation of recruiter prompts into filters, explanation of filters, and
//! prompt cache control.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::types::{
    CacheClearedResponse, ExplainRequest, ExplainResponse, FilterRequest, FilterResponse,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::json;
use talentfilter::{constants::NO_FILTER_EXPLANATION, normalize_prompt};
use tracing::info;

/// Translates a prompt. A prompt that cannot be translated yields `"filter": null`.
pub async fn filter_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<FilterRequest>,
) -> Result<Json<ApiResponse<FilterResponse>>, AppError> {
    if payload.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty.".to_string()));
    }
    info!("Received filter prompt: '{}'", payload.prompt);

    let client = &app_state.filter_client;
    let filter = client.generate_filter_from_prompt(&payload.prompt).await;
    let explanation = filter
        .as_ref()
        .map(|f| client.explain(f))
        .unwrap_or_else(|| NO_FILTER_EXPLANATION.to_string());

    let debug_info = Some(json!({
        "normalizedPrompt": normalize_prompt(&payload.prompt),
        "cachedPrompts": client.cached_prompts(),
    }));

    Ok(wrap_response(
        FilterResponse {
            filter,
            explanation,
        },
        debug_params,
        debug_info,
    ))
}

/// Explains a filter supplied by the caller.
pub async fn explain_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<ExplainRequest>,
) -> Result<Json<ApiResponse<ExplainResponse>>, AppError> {
    let text = app_state.filter_client.explain(&payload.filter);
    Ok(wrap_response(ExplainResponse { text }, debug_params, None))
}

/// Empties the prompt cache.
pub async fn clear_cache_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<CacheClearedResponse>>, AppError> {
    app_state.filter_client.clear_prompt_cache();
    Ok(wrap_response(
        CacheClearedResponse { cleared: true },
        debug_params,
        None,
    ))
}
