use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use collab_sentry::Sentry;
use collab_sentry::config::{ConfigResolver, Settings};
use collab_sentry::platform::github::GitHubClient;

#[derive(Parser)]
#[command(name = "collab-sentry")]
#[command(version, about = "Enforce the outside collaborator policy for one webhook delivery")]
struct Cli {
    /// Webhook event name (the X-GitHub-Event header)
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the JSON webhook payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    payload: PathBuf,

    /// Delivery GUID (the X-GitHub-Delivery header); generated when absent
    #[arg(long, env = "GITHUB_DELIVERY")]
    delivery: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("loading settings")?;
    if settings.token.is_none() {
        warn!("GITHUB_TOKEN is not set; API calls will be unauthenticated");
    }

    let body = std::fs::read_to_string(&cli.payload)
        .with_context(|| format!("reading payload {}", cli.payload.display()))?;
    let delivery = cli
        .delivery
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

    let platform = GitHubClient::from_settings(&settings).context("building GitHub client")?;
    let sentry = Sentry::new(ConfigResolver::new(settings.location), Arc::new(platform));

    if let Some(report) = sentry
        .handle_delivery(&delivery, &cli.event_name, &body)
        .await
        .context("handling delivery")?
    {
        info!(
            action = ?report.action,
            issue = ?report.issue,
            revoked = report.revoked,
            "delivery handled"
        );
    }

    Ok(())
}
