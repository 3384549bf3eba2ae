use std::env;
use std::fs;

use serde::Deserialize;

use hashprice_engine::{EngineConfig, PriceSource, SeriesSource};

/// CLI configuration. Reads the `[engine]` section of the same TOML the web
/// dashboard uses; everything else in the file is ignored here.
#[derive(Debug, Clone)]
pub struct Config {
    pub series_url: String,
    pub price_sources: Vec<PriceSource>,
    pub trend_days: usize,
}

#[derive(Debug, Deserialize, Default)]
struct CliFileConfig {
    #[serde(default)]
    engine: EngineSection,
}

#[derive(Debug, Deserialize, Default)]
struct EngineSection {
    series_url: Option<String>,
    trend_days: Option<usize>,
    price_sources: Option<Vec<PriceSource>>,
}

impl Config {
    pub fn from_args() -> Result<Self, Box<dyn std::error::Error>> {
        let args: Vec<String> = env::args().collect();
        Self::from_arg_list(&args)
    }

    pub fn from_arg_list(args: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = args
            .iter()
            .position(|arg| arg == "--config" || arg == "-c")
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_str())
            .unwrap_or("config/web-dashboard.config.toml");

        let config_str = fs::read_to_string(config_path).unwrap_or_default();
        let file_config: CliFileConfig = if config_str.is_empty() {
            CliFileConfig::default()
        } else {
            toml::from_str(&config_str)?
        };

        let series_url = args
            .iter()
            .position(|arg| arg == "--series-url" || arg == "-s")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .or(file_config.engine.series_url)
            .unwrap_or_else(|| SeriesSource::default().url);

        Ok(Config {
            series_url,
            price_sources: file_config
                .engine
                .price_sources
                .unwrap_or_else(hashprice_engine::default_sources),
            trend_days: file_config.engine.trend_days.unwrap_or(14),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            series: SeriesSource {
                url: self.series_url.clone(),
            },
            price_sources: self.price_sources.clone(),
            trend_days: self.trend_days,
        }
    }
}
