//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the configuration and the
//! process-wide `FilterClient`, whose prompt cache and directory cache are shared
//! by every request.

use crate::config::{non_empty, AppConfig, DirectoryConfig};
use std::{collections::HashMap, sync::Arc, time::Duration};
use talentfilter::{
    create_ai_provider, types::EntityKind, DirectoryProvider, FilterClient, FilterClientBuilder,
    GraphqlDirectoryProvider, StaticDirectoryProvider,
};
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The filter translation client.
    pub filter_client: Arc<FilterClient>,
}

/// Builds the directory provider named in the configuration.
pub fn build_directory_provider(
    config: &DirectoryConfig,
) -> anyhow::Result<Box<dyn DirectoryProvider>> {
    match config.provider.trim().to_lowercase().as_str() {
        "graphql" => {
            let api_url = non_empty(&config.api_url).ok_or_else(|| {
                anyhow::anyhow!("directory.api_url is required for the graphql directory provider")
            })?;
            info!("Using GraphQL directory at {api_url}");
            Ok(Box::new(GraphqlDirectoryProvider::new(
                api_url,
                non_empty(&config.api_token),
            )?))
        }
        "static" => {
            let mut maps = HashMap::new();
            for (kind_name, names) in &config.entities {
                match EntityKind::parse(kind_name) {
                    Some(kind) => {
                        maps.insert(kind, names.clone());
                    }
                    None => warn!("Ignoring unknown directory entity kind '{kind_name}'"),
                }
            }
            info!("Using static directory with {} entity kind(s)", maps.len());
            Ok(Box::new(StaticDirectoryProvider::from_names(maps)))
        }
        other => Err(anyhow::anyhow!("Unsupported directory provider: {other}")),
    }
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = create_ai_provider(
        &config.ai.provider,
        non_empty(&config.ai.api_url),
        non_empty(&config.ai.api_key),
        non_empty(&config.ai.model_name),
    )?;
    let directory_provider = build_directory_provider(&config.directory)?;

    let mut builder = FilterClientBuilder::new()
        .ai_provider(ai_provider)
        .directory_provider(directory_provider)
        .cache_capacity(config.cache.capacity)
        .directory_ttl(Duration::from_secs(config.directory.ttl_secs))
        .max_university_pages(config.directory.max_university_pages)
        .university_page_size(config.directory.university_page_size);
    if let Some(system_prompt) = non_empty(&config.prompts.system_prompt) {
        builder = builder.system_prompt(system_prompt);
    }
    if let Some(user_prompt) = non_empty(&config.prompts.user_prompt) {
        builder = builder.user_prompt(user_prompt);
    }

    Ok(AppState {
        config: Arc::new(config),
        filter_client: Arc::new(builder.build()?),
    })
}
