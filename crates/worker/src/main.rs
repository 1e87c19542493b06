//! One-shot status poller.
//!
//! Runs a single pass over in-flight video jobs and prints the summary as
//! JSON on stdout, for cron-style scheduling outside the API process. Uses
//! the same `POLL_*`, database and generator settings as the API server.

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidgen_core::lifecycle::poller::{
    recency_window_minutes, DEFAULT_CONCURRENCY, DEFAULT_RECENCY_WINDOW_MINS,
    MAX_RECENCY_WINDOW_MINS,
};
use vidgen_core::lifecycle::{poll_once, PollOptions};
use vidgen_db::{DbConfig, PgVideoStore};
use vidgen_veo::{GeneratorConfig, VeoApi};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn poll_options() -> anyhow::Result<PollOptions> {
    let window_mins: i64 = env_or("POLL_RECENCY_WINDOW_MINS", DEFAULT_RECENCY_WINDOW_MINS)?;
    let concurrency: usize = env_or("POLL_CONCURRENCY", DEFAULT_CONCURRENCY)?;
    let recency_window = recency_window_minutes(window_mins).with_context(|| {
        format!(
            "POLL_RECENCY_WINDOW_MINS must be between 1 and {MAX_RECENCY_WINDOW_MINS}, \
             got {window_mins}"
        )
    })?;
    Ok(PollOptions {
        recency_window,
        concurrency,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the summary.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidgen_worker=info,vidgen_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = poll_options()?;
    let generator_config = GeneratorConfig::from_env();
    tracing::info!(
        model = %generator_config.model,
        api_key = %vidgen_veo::mask_secret(&generator_config.api_key),
        "Loaded generator configuration"
    );

    let db_config = DbConfig::from_env();
    let pool = vidgen_db::connect(&db_config)
        .await
        .context("Failed to connect to database")?;

    let store = PgVideoStore::new(pool);
    let generator = VeoApi::new(&generator_config).context("Failed to build generator client")?;

    let summary = poll_once(&store, &generator, options, Utc::now())
        .await
        .context("Status poll pass failed")?;

    tracing::info!(
        checked = summary.checked,
        completed = summary.completed,
        failed = summary.failed,
        processing = summary.processing,
        check_errors = summary.check_errors,
        "Status poll pass finished"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
