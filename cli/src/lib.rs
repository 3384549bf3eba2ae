//! Terminal report for the hashprice snapshot.

pub mod config;

use hashprice_engine::HashpriceSnapshot;
use web_assets::formatting::{format_signed_pct, format_usd, trend_bar};

const RULE_WIDTH: usize = 60;

/// Render the full text report. Pure so the layout is testable.
pub fn render_report(snapshot: &HashpriceSnapshot) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let max = snapshot.trend_max();
    let timestamp = snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC");

    let mut out = String::new();
    out.push('\n');
    out.push_str("BITCOIN HASHPRICE DASHBOARD\n");
    out.push_str(&format!("Last Updated: {}\n", timestamp));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "BTC Spot Price     : {}\n",
        format_usd(snapshot.spot_usd)
    ));
    out.push_str(&format!(
        "Realtime Hashprice : {}   {} {} vs 7D\n",
        format_usd(snapshot.hashprice_realtime),
        deviation_arrow(snapshot.pct_vs_7d),
        format_signed_pct(snapshot.pct_vs_7d)
    ));
    out.push('\n');
    out.push_str(&format!(
        "1-Day Raw          : {}\n",
        format_usd(snapshot.hashprice_1d)
    ));
    out.push_str(&format!(
        "7-Day Smoothed     : {}\n",
        format_usd(snapshot.hashprice_7d)
    ));
    out.push_str(&rule);
    out.push('\n');
    out.push_str("Recent Trend (1-Day Raw + Realtime Today):\n");

    for point in &snapshot.trend {
        out.push_str(&format!(
            "{} | {} {}\n",
            point.date,
            trend_bar(point.hashprice_1d, max),
            format_usd(point.hashprice_1d)
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "{} | {} {}\n",
        snapshot.generated_at.format("%Y-%m-%d"),
        trend_bar(snapshot.hashprice_realtime, max),
        format_usd(snapshot.hashprice_realtime)
    ));
    out
}

fn deviation_arrow(pct: f64) -> &'static str {
    if pct < 0.0 {
        "▼"
    } else {
        "▲"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use hashprice_engine::TrendPoint;

    fn test_snapshot() -> HashpriceSnapshot {
        HashpriceSnapshot {
            generated_at: Utc::now(),
            spot_usd: 61234.5,
            hashprice_realtime: 44.0,
            hashprice_1d: 50.0,
            hashprice_7d: 40.0,
            pct_vs_7d: 10.0,
            trend: vec![
                TrendPoint {
                    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    hashprice_1d: 50.0,
                },
                TrendPoint {
                    date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                    hashprice_1d: 25.0,
                },
            ],
        }
    }

    #[test]
    fn test_report_shows_all_figures() {
        let report = render_report(&test_snapshot());
        assert!(report.contains("BTC Spot Price     : $61,234.50"));
        assert!(report.contains("Realtime Hashprice : $44.00   ▲ +10.00% vs 7D"));
        assert!(report.contains("1-Day Raw          : $50.00"));
        assert!(report.contains("7-Day Smoothed     : $40.00"));
    }

    #[test]
    fn test_report_has_one_bar_line_per_trend_day() {
        let report = render_report(&test_snapshot());
        assert!(report.contains("2024-05-01 | "));
        assert!(report.contains("2024-05-02 | "));
        // Window max fills the bar width
        assert!(report.contains(&"░".repeat(40)));
    }

    #[test]
    fn test_reparsing_report_recovers_values() {
        let snapshot = test_snapshot();
        let report = render_report(&snapshot);
        let spot_line = report
            .lines()
            .find(|l| l.starts_with("BTC Spot Price"))
            .unwrap();
        let shown = spot_line.split('$').nth(1).unwrap().trim();
        let reparsed: f64 = shown.replace(',', "").parse().unwrap();
        assert!((reparsed - (snapshot.spot_usd * 100.0).round() / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_deviation_arrow() {
        let mut snapshot = test_snapshot();
        snapshot.pct_vs_7d = -2.5;
        let report = render_report(&snapshot);
        assert!(report.contains("▼ -2.50% vs 7D"));
    }
}
