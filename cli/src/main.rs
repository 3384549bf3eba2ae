use tracing::info;

use hashprice_cli::config::Config;
use hashprice_cli::render_report;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = Config::from_args()?;
    info!("Series source: {}", config.series_url);

    let client = reqwest::Client::builder().build()?;
    let snapshot = hashprice_engine::calculate(&client, &config.engine_config()).await?;

    print!("{}", render_report(&snapshot));
    Ok(())
}
