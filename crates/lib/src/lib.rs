//! # Natural Language to Candidate Filter
//!
//! This crate provides a client that turns a recruiter's free-text request
//! ("candidates in Germany earning above 2000 EUR/month") into the structured
//! filter the talent-pool backend understands. It asks a configurable AI provider
//! for filter JSON, repairs and normalizes it, resolves entity names to backend
//! IDs through a cached directory, and memoizes results per normalized prompt.

pub mod cache;
pub mod constants;
pub mod directory;
pub mod errors;
pub mod explain;
pub mod extract;
pub mod normalize;
pub mod prompts;
pub mod providers;
pub mod resolver;
pub mod types;

pub use directory::{
    graphql::GraphqlDirectoryProvider, static_provider::StaticDirectoryProvider, DirectoryCache,
    DirectoryEntry, DirectoryPage, DirectoryProvider, DirectoryStatus,
};
pub use errors::PromptError;
pub use explain::{explain_filter, explain_filter_with_directory};
pub use normalize::normalize_prompt;
pub use providers::{ai::AiProvider, factory::create_ai_provider};
pub use types::{
    EntityKind, FilterClient, FilterClientBuilder, FilterField, FilterOperator, FilterParameter,
    LogicalOperator, QueryFilter,
};

use crate::{cache::LruCache, extract::parse_raw_filter, prompts::render_user_prompt};
use std::sync::{Arc, MutexGuard, PoisonError};
use tracing::{debug, error, info};

impl FilterClient {
    /// Translates a prompt into a resolved filter, or `None` when no filter could be produced.
    ///
    /// Failures are logged, never raised: an empty prompt, a failing model call or a
    /// response without JSON all yield `None`. See [`FilterClient::try_generate_filter`]
    /// for the error-returning variant.
    pub async fn generate_filter_from_prompt(&self, prompt: &str) -> Option<QueryFilter> {
        match self.try_generate_filter(prompt).await {
            Ok(filter) => Some(filter),
            Err(PromptError::EmptyPrompt) => {
                debug!("[generate_filter] Empty prompt, nothing to translate.");
                None
            }
            Err(e) => {
                error!("[generate_filter] Failed to translate prompt: {e}");
                None
            }
        }
    }

    /// Translates a prompt into a resolved filter.
    ///
    /// Steps run strictly in order: cache lookup, model call, JSON extraction,
    /// normalization and entity resolution, cache store. A cache hit is returned
    /// verbatim without re-resolving.
    pub async fn try_generate_filter(&self, prompt: &str) -> Result<QueryFilter, PromptError> {
        let key = normalize_prompt(prompt);
        if key.is_empty() {
            return Err(PromptError::EmptyPrompt);
        }

        let cached = self.cache().get(&key).cloned();
        if let Some(cached) = cached {
            info!("[generate_filter] Cache hit for prompt: '{key}'");
            return Ok(cached);
        }

        let user_prompt = render_user_prompt(&self.user_prompt_template, prompt.trim());
        debug!("--> Sending prompt to AI provider: '{key}'");
        let response = self
            .ai_provider
            .generate(&self.system_prompt, &user_prompt)
            .await?;
        debug!("<-- Raw response from AI: {response}");

        let raw = parse_raw_filter(&response)?;
        let filter = self.resolver.resolve(raw).await;
        info!(
            "[generate_filter] Resolved {} parameter(s), query: '{}'",
            filter.filter_parameters.len(),
            filter.query
        );

        self.cache().set(key, filter.clone());
        Ok(filter)
    }

    /// Empties the prompt cache.
    pub fn clear_prompt_cache(&self) {
        self.cache().clear();
        info!("Prompt cache cleared.");
    }

    /// Marks the directory stale so the next entity resolution refetches it.
    pub fn invalidate_directory(&self) {
        self.resolver.directory().invalidate();
    }

    /// Refreshes the directory if it is stale and returns the current snapshot.
    pub async fn refresh_directory(&self) -> Arc<DirectoryCache> {
        self.resolver.directory().fetch().await
    }

    /// The directory as currently cached, without refreshing it.
    pub fn directory_snapshot(&self) -> Arc<DirectoryCache> {
        self.resolver.directory().snapshot()
    }

    /// Explains a filter, naming entities from the cached directory when possible.
    pub fn explain(&self, filter: &QueryFilter) -> String {
        let directory = self.directory_snapshot();
        explain_filter_with_directory(filter, Some(&directory))
    }

    /// Number of prompts currently memoized.
    pub fn cached_prompts(&self) -> usize {
        self.cache().len()
    }

    fn cache(&self) -> MutexGuard<'_, LruCache<String, QueryFilter>> {
        self.prompt_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
