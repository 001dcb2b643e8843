use serde::{Deserialize, Serialize};
use serde_json::Value;
use talentfilter::QueryFilter;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}

// --- API Payloads ---

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterResponse {
    /// `null` when the prompt could not be translated.
    pub filter: Option<QueryFilter>,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub filter: QueryFilter,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheClearedResponse {
    pub cleared: bool,
}
