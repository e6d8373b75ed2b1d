use anpscraper::{
    config::Config,
    decode::decode_response,
    fetch,
    output::{write_records, RunSummary},
};
use anyhow::Result;
use chrono::Local;
use reqwest::Client;
use std::env;
use tokio::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(log_level.parse().unwrap_or(Level::INFO.into()))
    });
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    if let Err(e) = run().await {
        error!("scrape failed: {:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let start = Instant::now();

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env()?;
    info!(output = %config.output.display(), historical = config.historical, "startup");

    // ─── 3) acquire the response tree ────────────────────────────────
    let response = match &config.input {
        Some(path) => {
            info!("decoding saved response {}", path.display());
            fetch::read_response(path).await?
        }
        None => {
            let range = config.date_range(Local::now().date_naive());
            info!(start = %range.start, end = %range.end, "querying production table");
            let client = Client::builder().cookie_store(true).gzip(true).build()?;
            let response = fetch::query_data(&client, &config.endpoint, range).await?;
            fetch::save_then_check(&config.debug_response, &response).await?;
            response
        }
    };

    // ─── 4) decode, then write only once the whole batch decoded ─────
    let batch = decode_response(&response)?;
    let written = write_records(&config.output, &batch.records)?;

    let summary = RunSummary {
        rows_located: batch.rows_decoded,
        records_written: written,
        rows_rejected: batch.rows_rejected,
        output: config.output.clone(),
    };
    info!(?summary, elapsed = ?start.elapsed(), "all done");
    Ok(())
}
