//! Translates one prompt end to end against a real model.
//!
//! ```sh
//! AI_PROVIDER=gemini AI_API_KEY=... cargo run -p talentfilter --example translate -- "hired candidates in germany"
//! ```
//!
//! Stage names resolve through a small static directory, so the output shows the
//! stage ID and the explanation shows its name.

use std::env;
use talentfilter::{
    create_ai_provider, types::EntityKind, FilterClientBuilder, StaticDirectoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let Some(prompt) = env::args().nth(1) else {
        eprintln!("Usage: translate '<prompt>'");
        return Ok(());
    };

    let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
    let ai_provider = create_ai_provider(
        &provider,
        env::var("AI_API_URL").ok(),
        env::var("AI_API_KEY").ok(),
        env::var("AI_MODEL").ok(),
    )?;

    let directory = StaticDirectoryProvider::new()
        .with_entry(EntityKind::Stage, "clnvoqb87044mmq3wke7woqqq", "Hired")
        .with_entry(EntityKind::Stage, "stage-interview", "Interview");

    let client = FilterClientBuilder::new()
        .ai_provider(ai_provider)
        .directory_provider(Box::new(directory))
        .build()?;

    match client.try_generate_filter(&prompt).await {
        Ok(filter) => {
            println!("--- Filter ---");
            println!("{}", serde_json::to_string_pretty(&filter)?);
            println!("\n--- Explanation ---");
            println!("{}", client.explain(&filter));
        }
        Err(e) => eprintln!("Error: {e}"),
    }

    Ok(())
}
