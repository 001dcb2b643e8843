//! # Application Configuration
//!
//! This module defines the configuration structure for the `talentfilter-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use talentfilter::constants::{
    DEFAULT_DIRECTORY_TTL_SECS, DEFAULT_MAX_UNIVERSITY_PAGES, DEFAULT_PROMPT_CACHE_CAPACITY,
    DEFAULT_UNIVERSITY_PAGE_SIZE,
};
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The model that translates prompts into filters.
    pub ai: AiConfig,
    /// Where entity names are resolved to IDs.
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Optional overrides for the built-in prompt templates.
    #[serde(default)]
    pub prompts: PromptsConfig,
}

fn default_port() -> u16 {
    9090
}

/// Configuration for the AI provider.
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// The type of provider ("gemini" or "local").
    pub provider: String,
    /// The API URL. Optional for Gemini, where it is derived from the model name.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Configuration for the directory service.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    /// "graphql" or "static".
    #[serde(default = "default_directory_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_university_pages")]
    pub max_university_pages: u32,
    #[serde(default = "default_university_page_size")]
    pub university_page_size: u32,
    /// Static entries, `kind -> (name -> id)`. Used by the "static" provider.
    #[serde(default)]
    pub entities: HashMap<String, HashMap<String, String>>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            provider: default_directory_provider(),
            api_url: None,
            api_token: None,
            ttl_secs: default_ttl_secs(),
            max_university_pages: default_max_university_pages(),
            university_page_size: default_university_page_size(),
            entities: HashMap::new(),
        }
    }
}

fn default_directory_provider() -> String {
    "static".to_string()
}

fn default_ttl_secs() -> u64 {
    DEFAULT_DIRECTORY_TTL_SECS
}

fn default_max_university_pages() -> u32 {
    DEFAULT_MAX_UNIVERSITY_PAGES
}

fn default_university_page_size() -> u32 {
    DEFAULT_UNIVERSITY_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_PROMPT_CACHE_CAPACITY
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PromptsConfig {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

/// Treats a blank string (e.g. an unset `${VAR}`) as absent.
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// Reads a file and substitutes `${VAR}` placeholders from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - The file is `config_path_override`, else `config.yml` next to the crate manifest,
///   else the `config.<AI_PROVIDER>.yml` template (`AI_PROVIDER` defaults to `gemini`).
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `TALENTFILTER_...` variables
///   (e.g., `TALENTFILTER_CACHE__CAPACITY`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");

    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if std::path::Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or your AI_PROVIDER is set to load a valid template ('local' or 'gemini')."
        ))
    })?;

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&main_content, FileFormat::Yaml))
        // Top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed variables for nested overrides.
        .add_source(
            Environment::with_prefix("TALENTFILTER")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
