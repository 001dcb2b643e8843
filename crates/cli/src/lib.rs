//! # `talentfilter-cli` Library Crate
//!
//! The logic behind the `talentfilter` command: translate a recruiter's prompt
//! into a filter, or explain an existing filter.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};
use talentfilter::{
    create_ai_provider, explain_filter, DirectoryProvider, FilterClientBuilder,
    GraphqlDirectoryProvider, QueryFilter, StaticDirectoryProvider,
};
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a natural-language prompt into a candidate filter
    Translate(TranslateArgs),
    /// Explain a filter read from a file or stdin
    Explain(ExplainArgs),
}

#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// The recruiter's request, e.g. "candidates in the hired stage".
    pub prompt: String,
    /// The AI provider: "gemini" or "local".
    #[arg(long, env = "AI_PROVIDER", default_value = "gemini")]
    pub provider: String,
    #[arg(long, env = "AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Required for the local provider. Derived from the model for Gemini.
    #[arg(long, env = "AI_API_URL")]
    pub api_url: Option<String>,
    #[arg(long, env = "AI_MODEL")]
    pub model: Option<String>,
    /// GraphQL directory endpoint. Without it no entity names can be resolved.
    #[arg(long, env = "DIRECTORY_API_URL")]
    pub directory_url: Option<String>,
    #[arg(long, env = "DIRECTORY_API_TOKEN", hide_env_values = true)]
    pub directory_token: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ExplainArgs {
    /// A file holding the filter JSON. Reads stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

// --- Public Entrypoint ---

/// The main entry point for the `talentfilter` command.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Translate(args) => handle_translate(args).await,
        Commands::Explain(args) => handle_explain(args),
    }
}

// --- Command Handlers ---

async fn handle_translate(args: TranslateArgs) -> Result<()> {
    info!(provider = %args.provider, "Starting 'translate' command");

    let ai_provider = create_ai_provider(
        &args.provider,
        args.api_url.filter(|v| !v.trim().is_empty()),
        args.api_key.filter(|v| !v.trim().is_empty()),
        args.model,
    )?;

    let directory: Box<dyn DirectoryProvider> =
        match args.directory_url.filter(|v| !v.trim().is_empty()) {
            Some(url) => Box::new(GraphqlDirectoryProvider::new(url, args.directory_token)?),
            None => Box::new(StaticDirectoryProvider::new()),
        };

    let client = FilterClientBuilder::new()
        .ai_provider(ai_provider)
        .directory_provider(directory)
        .build()?;

    let filter = client
        .try_generate_filter(&args.prompt)
        .await
        .context("Failed to translate prompt")?;

    println!("{}", serde_json::to_string_pretty(&filter)?);
    println!("{}", client.explain(&filter));
    Ok(())
}

fn handle_explain(args: ExplainArgs) -> Result<()> {
    let raw = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter file '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read filter from stdin")?;
            buffer
        }
    };

    let filter = parse_filter(&raw)?;
    println!("{}", explain_filter(&filter));
    Ok(())
}

/// Parses a `QueryFilter` from JSON text.
pub fn parse_filter(raw: &str) -> Result<QueryFilter> {
    serde_json::from_str(raw).context("Failed to parse filter JSON")
}
