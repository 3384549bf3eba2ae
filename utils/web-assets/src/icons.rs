use std::sync::OnceLock;

pub const CHART_ICON_INLINE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="#f7931a"><path stroke-linecap="round" stroke-linejoin="round" d="M4 19.5h16M6 16.5v-5M10 16.5v-9M14 16.5v-6.5M18 16.5V4.5"/></svg>"##;
pub const CHART_FAVICON_INLINE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="#f7931a"><circle cx="12" cy="12" r="11" fill="#111111"/><path stroke-linecap="round" stroke-linejoin="round" d="M4 19.5h16M6 16.5v-5M10 16.5v-9M14 16.5v-6.5M18 16.5V4.5"/></svg>"##;

fn encode_for_data_uri(svg: &str) -> String {
    svg.replace('#', "%23")
        .replace('<', "%3C")
        .replace('>', "%3E")
        .replace('"', "%22")
        .replace(' ', "%20")
}

static CHART_ICON_DATA_URI: OnceLock<String> = OnceLock::new();
static NAV_ICON_CSS: OnceLock<String> = OnceLock::new();

pub fn chart_favicon_inline_svg() -> &'static str {
    CHART_FAVICON_INLINE_SVG
}

pub fn chart_icon_data_uri() -> &'static str {
    CHART_ICON_DATA_URI
        .get_or_init(|| {
            format!(
                "data:image/svg+xml;charset=utf8,{}",
                encode_for_data_uri(CHART_ICON_INLINE_SVG)
            )
        })
        .as_str()
}

pub fn nav_icon_css() -> &'static str {
    NAV_ICON_CSS
        .get_or_init(|| {
            format!(
                r#"
        .chart-icon::before {{
            content: "";
            display: inline-block;
            width: 1em;
            height: 1em;
            margin-right: 0.4em;
            vertical-align: -0.15em;
            background-image: url("{}");
            background-size: contain;
            background-repeat: no-repeat;
        }}
"#,
                chart_icon_data_uri()
            )
        })
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_has_no_raw_svg_delimiters() {
        let uri = chart_icon_data_uri();
        assert!(uri.starts_with("data:image/svg+xml;charset=utf8,"));
        assert!(!uri.contains('<'));
        assert!(!uri.contains('"'));
    }

    #[test]
    fn test_nav_css_embeds_icon() {
        assert!(nav_icon_css().contains("data:image/svg+xml"));
    }
}
