//! Historical daily network series: fetch, clean, derive hashprice rates.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::types::{DailyRate, DailyRecord};

/// Rolling window, in days, of the smoothed rate.
pub const SMOOTHING_WINDOW: usize = 7;

/// Columns the loader requires from the dataset. A row missing any of these
/// is dropped on its own; neighboring rows are unaffected.
const REQUIRED_COLUMNS: [&str; 5] = ["time", "PriceUSD", "HashRate", "IssTotNtv", "FeeTotNtv"];

/// Where the daily network dataset lives. Passed in explicitly so callers
/// can point at a mirror; the default is the CoinMetrics community CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesSource {
    pub url: String,
}

impl Default for SeriesSource {
    fn default() -> Self {
        Self {
            url: "https://raw.githubusercontent.com/coinmetrics/data/master/csv/btc.csv"
                .to_string(),
        }
    }
}

/// Fetch the dataset and return the derived rate series, ascending by date.
///
/// No timeout is set here: the dataset is large and the shared client is
/// built without a global deadline. Any transport failure, non-success
/// status, or a series too short to derive a single smoothed row fails the
/// whole call.
pub async fn fetch_series(
    client: &reqwest::Client,
    source: &SeriesSource,
) -> Result<Vec<DailyRate>> {
    info!("Fetching historical series from {}", source.url);
    let response = client.get(&source.url).send().await?;
    if !response.status().is_success() {
        return Err(EngineError::SeriesUnavailable(format!(
            "{} returned HTTP {}",
            source.url,
            response.status().as_u16()
        )));
    }
    let body = response.text().await?;

    let records = parse_csv(&body)?;
    debug!("Parsed {} clean daily records", records.len());

    let rates = derive_rates(records);
    if rates.is_empty() {
        return Err(EngineError::SeriesUnavailable(
            "series too short to derive a smoothed rate".to_string(),
        ));
    }
    Ok(rates)
}

/// Parse the raw CSV body into cleaned records. Rows with a missing or
/// unparseable required field are skipped individually.
pub fn parse_csv(body: &str) -> Result<Vec<DailyRecord>> {
    let mut lines = body.lines();
    let header = lines
        .next()
        .ok_or_else(|| EngineError::SeriesUnavailable("empty dataset body".to_string()))?;

    let columns: Vec<&str> = header.split(',').collect();
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = columns.iter().position(|c| *c == name).ok_or_else(|| {
            EngineError::SeriesUnavailable(format!("dataset missing column {}", name))
        })?;
    }
    let [time_idx, price_idx, hashrate_idx, issuance_idx, fees_idx] = indices;

    let mut records = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();

        let date = match fields.get(time_idx).and_then(|f| parse_date(f)) {
            Some(d) => d,
            None => continue,
        };
        let price_usd = match fields.get(price_idx).and_then(|f| f.parse::<f64>().ok()) {
            Some(v) => v,
            None => continue,
        };
        let hashrate = match fields.get(hashrate_idx).and_then(|f| f.parse::<f64>().ok()) {
            Some(v) => v,
            None => continue,
        };
        let issuance_btc = match fields.get(issuance_idx).and_then(|f| f.parse::<f64>().ok()) {
            Some(v) => v,
            None => continue,
        };
        let fees_btc = match fields.get(fees_idx).and_then(|f| f.parse::<f64>().ok()) {
            Some(v) => v,
            None => continue,
        };

        records.push(DailyRecord {
            date,
            price_usd,
            // Dataset reports TH/s; the rate is quoted per PH/s.
            hashrate_ph: hashrate / 1000.0,
            issuance_btc,
            fees_btc,
        });
    }
    Ok(records)
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    // The time column is either a bare date or a full timestamp; the first
    // ten characters are the date either way.
    let prefix = field.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Derive per-day rates from cleaned records. Sorts ascending by date, then
/// attaches the 1-day raw rate and the 7-day smoothed rate. The first six
/// rows lack a full smoothing window and are dropped.
pub fn derive_rates(mut records: Vec<DailyRecord>) -> Vec<DailyRate> {
    records.sort_by_key(|r| r.date);

    let usd_revenue: Vec<f64> = records
        .iter()
        .map(|r| (r.issuance_btc + r.fees_btc) * r.price_usd)
        .collect();

    let mut rates = Vec::with_capacity(records.len().saturating_sub(SMOOTHING_WINDOW - 1));
    for (i, record) in records.iter().enumerate() {
        if i + 1 < SMOOTHING_WINDOW {
            continue;
        }
        let window = i + 1 - SMOOTHING_WINDOW..=i;
        let revenue_7d: f64 =
            usd_revenue[window.clone()].iter().sum::<f64>() / SMOOTHING_WINDOW as f64;
        let hashrate_7d: f64 = records[window].iter().map(|r| r.hashrate_ph).sum::<f64>()
            / SMOOTHING_WINDOW as f64;

        let btc_revenue = record.issuance_btc + record.fees_btc;
        rates.push(DailyRate {
            date: record.date,
            btc_revenue,
            usd_revenue: usd_revenue[i],
            hashrate_ph: record.hashrate_ph,
            hashrate_ph_7d: hashrate_7d,
            hashprice_1d: usd_revenue[i] / record.hashrate_ph,
            hashprice_7d: revenue_7d / hashrate_7d,
        });
    }
    rates
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "time,PriceUSD,HashRate,IssTotNtv,FeeTotNtv";

    fn record(day: u32, price: f64, hashrate_ph: f64, issuance: f64, fees: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            price_usd: price,
            hashrate_ph,
            issuance_btc: issuance,
            fees_btc: fees,
        }
    }

    #[test]
    fn test_parse_csv_rescales_hashrate() {
        let body = format!("{}\n2024-03-01,60000.0,600000.0,450.0,30.0\n", HEADER);
        let records = parse_csv(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hashrate_ph, 600.0);
        assert_eq!(records[0].price_usd, 60000.0);
    }

    #[test]
    fn test_parse_csv_handles_reordered_columns() {
        let body = "FeeTotNtv,time,IssTotNtv,HashRate,PriceUSD\n\
                    25.0,2024-03-02,451.5,610000.0,61000.0\n";
        let records = parse_csv(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fees_btc, 25.0);
        assert_eq!(records[0].issuance_btc, 451.5);
    }

    #[test]
    fn test_missing_field_drops_only_that_row() {
        let body = format!(
            "{}\n\
             2024-03-01,60000.0,600000.0,450.0,30.0\n\
             2024-03-02,,610000.0,450.0,30.0\n\
             2024-03-03,62000.0,620000.0,450.0,30.0\n",
            HEADER
        );
        let records = parse_csv(&body).unwrap();
        let dates: Vec<u32> = records
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(dates, vec![1, 3]);
    }

    #[test]
    fn test_parse_csv_rejects_missing_column() {
        let body = "time,PriceUSD,HashRate,IssTotNtv\n2024-03-01,1.0,2.0,3.0\n";
        assert!(matches!(
            parse_csv(body),
            Err(EngineError::SeriesUnavailable(_))
        ));
    }

    #[test]
    fn test_derive_drops_incomplete_window() {
        let records: Vec<DailyRecord> = (1..=10)
            .map(|d| record(d, 60000.0, 600.0, 450.0, 30.0))
            .collect();
        let rates = derive_rates(records);
        // 10 input days, first 6 lack a full window
        assert_eq!(rates.len(), 4);
        assert_eq!(rates[0].date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn test_smoothed_rate_matches_window_sums() {
        // Vary every input so the smoothed rate differs from the raw one.
        let records: Vec<DailyRecord> = (1..=12)
            .map(|d| {
                record(
                    d,
                    50000.0 + d as f64 * 500.0,
                    500.0 + d as f64 * 10.0,
                    400.0 + d as f64,
                    10.0 + d as f64 * 0.5,
                )
            })
            .collect();
        let rates = derive_rates(records.clone());

        for rate in &rates {
            let pos = records.iter().position(|r| r.date == rate.date).unwrap();
            let window = &records[pos + 1 - SMOOTHING_WINDOW..=pos];
            let revenue_sum: f64 = window
                .iter()
                .map(|r| (r.issuance_btc + r.fees_btc) * r.price_usd)
                .sum();
            let hashrate_sum: f64 = window.iter().map(|r| r.hashrate_ph).sum();
            let expected = (revenue_sum / 7.0) / (hashrate_sum / 7.0);
            assert!((rate.hashprice_7d - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_derive_sorts_unordered_input() {
        let mut records: Vec<DailyRecord> = (1..=8)
            .map(|d| record(d, 60000.0, 600.0, 450.0, 30.0))
            .collect();
        records.reverse();
        let rates = derive_rates(records);
        assert_eq!(rates.len(), 2);
        assert!(rates[0].date < rates[1].date);
    }

    #[test]
    fn test_constant_series_rates_agree() {
        let records: Vec<DailyRecord> = (1..=9)
            .map(|d| record(d, 60000.0, 600.0, 450.0, 30.0))
            .collect();
        let rates = derive_rates(records);
        for rate in rates {
            assert!((rate.hashprice_1d - rate.hashprice_7d).abs() < 1e-9);
            // (450 + 30) * 60000 / 600
            assert!((rate.hashprice_1d - 48000.0).abs() < 1e-9);
        }
    }
}
