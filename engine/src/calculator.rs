//! Composes the series loader and the live price fetcher into one snapshot.

use chrono::Utc;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::price::{self, PriceSource};
use crate::series::{self, SeriesSource};
use crate::types::{DailyRate, HashpriceSnapshot, TrendPoint};

/// Everything the calculation needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub series: SeriesSource,
    pub price_sources: Vec<PriceSource>,
    pub trend_days: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            series: SeriesSource::default(),
            price_sources: price::default_sources(),
            trend_days: 14,
        }
    }
}

/// Run the full pipeline: fetch the historical series, fetch the live spot
/// price, combine. Every call re-fetches both inputs; nothing is cached.
pub async fn calculate(
    client: &reqwest::Client,
    config: &EngineConfig,
) -> Result<HashpriceSnapshot> {
    let rates = series::fetch_series(client, &config.series).await?;
    let spot = price::fetch_live_price(client, &config.price_sources).await?;
    let snapshot = build_snapshot(&rates, spot, config.trend_days)?;
    info!(
        "Hashprice snapshot: spot ${:.2}, realtime ${:.2} ({:+.2}% vs 7d)",
        snapshot.spot_usd, snapshot.hashprice_realtime, snapshot.pct_vs_7d
    );
    Ok(snapshot)
}

/// Combine an already-derived series with a live spot price.
///
/// The realtime rate revalues the latest day's BTC revenue at the live
/// price and divides by that day's raw hash rate. The raw denominator is
/// deliberate: the smoothed figure lags the network by days, and the whole
/// point of the realtime number is to react.
pub fn build_snapshot(
    rates: &[DailyRate],
    spot_usd: f64,
    trend_days: usize,
) -> Result<HashpriceSnapshot> {
    let latest = rates
        .last()
        .ok_or_else(|| EngineError::SeriesUnavailable("derived series is empty".to_string()))?;

    let realtime = (latest.btc_revenue * spot_usd) / latest.hashrate_ph;
    let pct_vs_7d = (realtime / latest.hashprice_7d - 1.0) * 100.0;

    let trend: Vec<TrendPoint> = rates
        .iter()
        .rev()
        .take(trend_days)
        .rev()
        .map(|r| TrendPoint {
            date: r.date,
            hashprice_1d: r.hashprice_1d,
        })
        .collect();

    Ok(HashpriceSnapshot {
        generated_at: Utc::now(),
        spot_usd,
        hashprice_realtime: realtime,
        hashprice_1d: latest.hashprice_1d,
        hashprice_7d: latest.hashprice_7d,
        pct_vs_7d,
        trend,
    })
}
