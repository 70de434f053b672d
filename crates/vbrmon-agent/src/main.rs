mod config;
mod poll;

use anyhow::Result;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vbrmon=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/agent.toml".to_string());

    let config = config::AgentConfig::load(&config_path)?;
    tracing::info!(host = %config.connection.host, "vbrmon-agent starting poll cycle");

    let outcomes = poll::run_cycle(&config).await?;
    tracing::info!(outcomes = outcomes.len(), "poll cycle complete");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for outcome in &outcomes {
        serde_json::to_writer(&mut out, outcome)?;
        writeln!(out)?;
    }

    Ok(())
}
