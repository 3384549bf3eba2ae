/// Display width of a full trend bar.
pub const BAR_WIDTH: usize = 40;

/// Format a dollar amount with thousands separators and 2 decimal places.
/// Used by both the web dashboard and the CLI report.
pub fn format_usd(value: f64) -> String {
    let raw = format!("{:.2}", value.abs());
    let (whole, cents) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Format a percentage with an explicit sign, 2 decimal places.
pub fn format_signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Render a trend bar scaled so the window maximum fills the full width.
pub fn trend_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let length = ((value / max) * BAR_WIDTH as f64) as usize;
    "░".repeat(length.min(BAR_WIDTH))
}

/// Same bar, right-padded with spaces to the full width for column layout.
pub fn trend_bar_padded(value: f64, max: f64) -> String {
    let bar = trend_bar(value, max);
    let fill = BAR_WIDTH.saturating_sub(bar.chars().count());
    format!("{}{}", bar, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_groups_thousands() {
        assert_eq!(format_usd(61234.5), "$61,234.50");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.0), "$999.00");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn test_format_usd_negative() {
        assert_eq!(format_usd(-1234.5), "-$1,234.50");
    }

    #[test]
    fn test_format_signed_pct() {
        assert_eq!(format_signed_pct(10.0), "+10.00%");
        assert_eq!(format_signed_pct(-3.456), "-3.46%");
        assert_eq!(format_signed_pct(0.0), "+0.00%");
    }

    #[test]
    fn test_trend_bar_scaling() {
        assert_eq!(trend_bar(50.0, 50.0).chars().count(), BAR_WIDTH);
        assert_eq!(trend_bar(25.0, 50.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(trend_bar(0.0, 50.0), "");
    }

    #[test]
    fn test_trend_bar_never_overflows() {
        // A realtime value above the historical window max clamps.
        assert_eq!(trend_bar(75.0, 50.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_trend_bar_degenerate_max() {
        assert_eq!(trend_bar(10.0, 0.0), "");
        assert_eq!(trend_bar(10.0, -1.0), "");
    }

    #[test]
    fn test_trend_bar_padded_width() {
        for value in [0.0, 12.5, 50.0] {
            assert_eq!(trend_bar_padded(value, 50.0).chars().count(), BAR_WIDTH);
        }
    }

    #[test]
    fn test_display_round_trip_to_two_decimals() {
        let spot = 61234.5678_f64;
        let displayed = format_usd(spot);
        let reparsed: f64 = displayed
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .unwrap();
        assert!((reparsed - (spot * 100.0).round() / 100.0).abs() < 1e-9);
    }
}
