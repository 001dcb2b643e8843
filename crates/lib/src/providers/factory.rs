//! # AI Provider Factory
//!
//! Builds an `AiProvider` from plain configuration values so the server and the
//! CLI construct providers the same way.

use crate::{
    constants::DEFAULT_GEMINI_MODEL,
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
};
use tracing::info;

/// The `generateContent` endpoint for a Gemini model.
pub fn gemini_api_url(model_name: &str) -> String {
    format!("https://generativelanguage.googleapis.com/v1beta/models/{model_name}:generateContent")
}

/// Creates an AI provider by name (`gemini` or `local`).
///
/// - `gemini` requires an API key. The URL defaults to the public endpoint for
///   `model_name` (or `gemini-1.5-pro-latest`).
/// - `local` requires an API URL pointing at an OpenAI-compatible chat endpoint.
pub fn create_ai_provider(
    provider: &str,
    api_url: Option<String>,
    api_key: Option<String>,
    model_name: Option<String>,
) -> Result<Box<dyn AiProvider>, PromptError> {
    match provider.trim().to_lowercase().as_str() {
        "gemini" => {
            let api_key = api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                PromptError::MissingAiProvider("an API key is required for Gemini".to_string())
            })?;
            let model = model_name.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
            let api_url = api_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| gemini_api_url(&model));
            info!("Configuring Gemini provider with URL: {api_url}");
            Ok(Box::new(GeminiProvider::new(api_url, api_key)?))
        }
        "local" => {
            let api_url = api_url.filter(|u| !u.is_empty()).ok_or_else(|| {
                PromptError::MissingAiProvider(
                    "an API URL is required for the local provider".to_string(),
                )
            })?;
            info!("Configuring Local AI provider with URL: {api_url}");
            Ok(Box::new(LocalAiProvider::new(
                api_url,
                api_key.filter(|k| !k.is_empty()),
                model_name,
            )?))
        }
        other => Err(PromptError::UnsupportedProvider(other.to_string())),
    }
}
