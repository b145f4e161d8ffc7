mod harness;
mod processor;
mod settings;
mod stripe;
mod transport;

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::harness::{Harness, Verdict};
use crate::processor::ProcessorConnection;
use crate::stripe::StripeConnection;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logging goes to stderr so the test banners stay readable on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration from config.toml and environment
    let cfg = settings::Config::load()?;

    if cfg.stripe.api_key.is_empty() {
        tracing::error!("STRIPE_API_KEY not set; exiting");
        return Ok(ExitCode::FAILURE);
    }

    let conn = StripeConnection::new(&cfg.stripe)?;
    tracing::info!(
        processor = conn.name(),
        website = conn.website(),
        api_base = %cfg.stripe.api_base,
        "Starting sandbox run"
    );

    let stdout = std::io::stdout();
    let mut harness = Harness::new(&conn, &cfg.harness, stdout.lock());
    match harness.run().await {
        Ok(report) if report.all_passed() => Ok(ExitCode::SUCCESS),
        Ok(report) => {
            let failed: Vec<&str> = report
                .results
                .iter()
                .filter(|(_, v)| *v == Verdict::Failed)
                .map(|(name, _)| *name)
                .collect();
            tracing::warn!(failed = ?failed, "sandbox run finished with failures");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            tracing::error!("sandbox run aborted: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}
