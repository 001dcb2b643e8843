//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `talentfilter-server`.
//! The handlers are split into sub-modules by the resource they serve.

pub mod directory;
pub mod filter;
pub mod general;

// Re-export all handlers so the router reaches them under a single `handlers::` path.
pub use directory::*;
pub use filter::*;
pub use general::*;

// Shared items used by multiple handler modules.
use super::{
    errors::AppError,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{extract::Query, Json};
use serde_json::Value;

/// A shared helper function to wrap a successful result in the standard `ApiResponse`
/// format, optionally including debug information if requested.
pub(crate) fn wrap_response<T>(
    result: T,
    debug_params: Query<DebugParams>,
    debug_info: Option<Value>,
) -> Json<ApiResponse<T>> {
    let debug = if debug_params.debug.unwrap_or(false) {
        debug_info
    } else {
        None
    };
    Json(ApiResponse { debug, result })
}
