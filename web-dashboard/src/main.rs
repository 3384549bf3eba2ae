use std::sync::Arc;

use tracing::info;

use web_dashboard::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_args()?;

    // Setup tracing with optional file output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt().with_env_filter(env_filter);

    if let Some(log_file) = &config.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| format!("Failed to open log file {}: {}", log_file, e))?;
        fmt_layer.with_writer(std::sync::Arc::new(file)).init();
    } else {
        fmt_layer.init();
    }

    info!("Starting hashprice web dashboard");
    info!("Listen address: {}", config.listen_address);
    info!("Series source: {}", config.series_url);
    info!(
        "Price sources: {}",
        config
            .price_sources
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("Page refresh interval: {} seconds", config.refresh_interval_secs);

    let state = Arc::new(AppState::new(config)?);
    web_dashboard::web::run_http_server(state).await?;

    Ok(())
}
