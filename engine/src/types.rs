use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One cleaned row of the historical network dataset.
/// Hash rate is already rescaled to PH/s; revenue fields are in BTC.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub price_usd: f64,
    pub hashrate_ph: f64,
    pub issuance_btc: f64,
    pub fees_btc: f64,
}

/// Per-day derived economics. Rows lacking a full 7-day trailing window
/// never make it into this type.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRate {
    pub date: NaiveDate,
    pub btc_revenue: f64,
    pub usd_revenue: f64,
    pub hashrate_ph: f64,
    pub hashrate_ph_7d: f64,
    pub hashprice_1d: f64,
    pub hashprice_7d: f64,
}

/// A (date, 1-day rate) pair for the trend display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub hashprice_1d: f64,
}

/// Result of one full calculation. Built fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashpriceSnapshot {
    pub generated_at: DateTime<Utc>,
    pub spot_usd: f64,
    pub hashprice_realtime: f64,
    pub hashprice_1d: f64,
    pub hashprice_7d: f64,
    pub pct_vs_7d: f64,
    pub trend: Vec<TrendPoint>,
}

impl HashpriceSnapshot {
    /// Maximum 1-day rate across the trend window. Anchors the relative
    /// bar-length scaling in both dashboards.
    pub fn trend_max(&self) -> f64 {
        self.trend
            .iter()
            .map(|p| p.hashprice_1d)
            .fold(f64::MIN, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, value: f64) -> TrendPoint {
        TrendPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            hashprice_1d: value,
        }
    }

    #[test]
    fn test_trend_max() {
        let snapshot = HashpriceSnapshot {
            generated_at: Utc::now(),
            spot_usd: 60_000.0,
            hashprice_realtime: 48.0,
            hashprice_1d: 50.0,
            hashprice_7d: 40.0,
            pct_vs_7d: 20.0,
            trend: vec![point(1, 42.0), point(2, 55.5), point(3, 39.0)],
        };
        assert_eq!(snapshot.trend_max(), 55.5);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = HashpriceSnapshot {
            generated_at: Utc::now(),
            spot_usd: 61_234.56,
            hashprice_realtime: 44.0,
            hashprice_1d: 50.0,
            hashprice_7d: 40.0,
            pct_vs_7d: 10.0,
            trend: vec![point(5, 47.25)],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: HashpriceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.spot_usd, 61_234.56);
        assert_eq!(back.trend, snapshot.trend);
    }
}
