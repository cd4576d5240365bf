//! Gift suggestion CLI
//!
//! Runs one request through the live providers and prints the resulting
//! suggestion set as JSON on stdout. Logs go to stderr.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gift_ideas::{Config, GiftContext, GiftRequest};
use paapi_client::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "suggest")]
#[command(about = "Suggest gift ideas with matching products")]
struct Cli {
    /// Free-text description, e.g. "gift for dad who loves golf"
    #[arg(default_value = "")]
    query: String,

    /// Who the gift is for
    #[arg(long)]
    recipient: Option<String>,

    /// What the gift is for
    #[arg(long)]
    occasion: Option<String>,

    /// Budget, e.g. "under £50"
    #[arg(long)]
    budget: Option<String>,

    /// Recipient interests (repeatable or comma separated)
    #[arg(long = "interest", value_delimiter = ',')]
    interests: Vec<String>,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gift_ideas=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.gemini_api_key.expose_secret().is_empty() {
        tracing::warn!("GEMINI_API_KEY not set, suggestions will use fallback ideas");
    }

    let context = GiftContext {
        recipient: cli.recipient,
        occasion: cli.occasion,
        budget: cli.budget,
        interests: cli.interests,
    };
    let request = GiftRequest::new(cli.query, context).context("Invalid request")?;

    let advisor = config.advisor()?;
    let set = tokio::time::timeout(Duration::from_secs(cli.timeout_secs), advisor.suggest(&request))
        .await
        .context("Timed out waiting for suggestions")?
        .context("Failed to suggest gifts")?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&set)?
    } else {
        serde_json::to_string(&set)?
    };
    println!("{}", json);

    Ok(())
}
