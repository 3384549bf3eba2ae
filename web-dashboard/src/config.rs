use std::env;
use std::fs;

use serde::Deserialize;

use hashprice_engine::{EngineConfig, PriceSource, SeriesSource};

/// A named accent color selectable via `?theme=<name>`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Theme {
    pub name: String,
    pub accent: String,
}

fn default_themes() -> Vec<Theme> {
    vec![
        Theme {
            name: "orange".to_string(),
            accent: "#F7931A".to_string(),
        },
        Theme {
            name: "green".to_string(),
            accent: "#00FF88".to_string(),
        },
        Theme {
            name: "blue".to_string(),
            accent: "#4FC3F7".to_string(),
        },
        Theme {
            name: "white".to_string(),
            accent: "#FFFFFF".to_string(),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: String,
    pub series_url: String,
    pub price_sources: Vec<PriceSource>,
    pub trend_days: usize,
    pub refresh_interval_secs: u64,
    pub themes: Vec<Theme>,
    pub default_theme: String,
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DashboardConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    engine: EngineSection,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    listen_address: Option<String>,
    log_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: Some("127.0.0.1:8080".to_string()),
            log_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct EngineSection {
    series_url: Option<String>,
    trend_days: Option<usize>,
    price_sources: Option<Vec<PriceSource>>,
}

#[derive(Debug, Deserialize)]
struct DisplayConfig {
    refresh_interval_secs: Option<u64>,
    default_theme: Option<String>,
    themes: Option<Vec<Theme>>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: Some(60),
            default_theme: Some("orange".to_string()),
            themes: None,
        }
    }
}

impl Config {
    pub fn from_args() -> Result<Self, Box<dyn std::error::Error>> {
        let args: Vec<String> = env::args().collect();
        Self::from_arg_list(&args)
    }

    /// Parse from an explicit argument list. CLI flags override file values;
    /// a missing config file falls back to defaults entirely.
    pub fn from_arg_list(args: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = args
            .iter()
            .position(|arg| arg == "--config" || arg == "-c")
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_str())
            .unwrap_or("config/web-dashboard.config.toml");

        let config_str = fs::read_to_string(config_path).unwrap_or_default();
        let file_config: DashboardConfig = if config_str.is_empty() {
            DashboardConfig::default()
        } else {
            toml::from_str(&config_str)?
        };

        let listen_address = args
            .iter()
            .position(|arg| arg == "--listen" || arg == "-l")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .or(file_config.server.listen_address)
            .ok_or("Missing required config: server.listen_address")?;

        let series_url = args
            .iter()
            .position(|arg| arg == "--series-url" || arg == "-s")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .or(file_config.engine.series_url)
            .unwrap_or_else(|| SeriesSource::default().url);

        let price_sources = file_config
            .engine
            .price_sources
            .unwrap_or_else(hashprice_engine::default_sources);

        let themes = file_config.display.themes.unwrap_or_else(default_themes);
        let default_theme = file_config
            .display
            .default_theme
            .unwrap_or_else(|| "orange".to_string());
        if !themes.iter().any(|t| t.name == default_theme) {
            return Err(format!("Default theme {} is not in the theme table", default_theme).into());
        }

        Ok(Config {
            listen_address,
            series_url,
            price_sources,
            trend_days: file_config.engine.trend_days.unwrap_or(14),
            refresh_interval_secs: file_config.display.refresh_interval_secs.unwrap_or(60),
            themes,
            default_theme,
            log_file: file_config.server.log_file,
        })
    }

    /// Resolve a requested theme name; unknown or absent names fall back to
    /// the configured default.
    pub fn theme(&self, requested: Option<&str>) -> &Theme {
        requested
            .and_then(|name| self.themes.iter().find(|t| t.name == name))
            .unwrap_or_else(|| {
                self.themes
                    .iter()
                    .find(|t| t.name == self.default_theme)
                    .expect("default theme validated at load")
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
