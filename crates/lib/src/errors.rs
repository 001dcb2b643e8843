use thiserror::Error;

/// Custom error types for the filter translation pipeline.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),
    #[error("Failed to send request to directory service: {0}")]
    DirectoryRequest(reqwest::Error),
    #[error("Failed to deserialize directory service response: {0}")]
    DirectoryDeserialization(String),
    #[error("Directory service returned an error: {0}")]
    DirectoryApi(String),
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("No JSON object found in AI response: {0}")]
    NoJsonFound(String),
    #[error("JSON error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
