use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    body::Incoming, server::conn::http1, service::service_fn, Method, Request, Response,
    StatusCode,
};
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::{convert::Infallible, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use hashprice_engine::{calculate, HashpriceSnapshot};
use web_assets::formatting::{format_signed_pct, format_usd, trend_bar_padded};
use web_assets::icons::{chart_favicon_inline_svg, nav_icon_css};

use crate::config::Config;

const DASHBOARD_PAGE_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// Shared request context. Holds no snapshot state: every page view
/// recomputes from the remote sources.
pub struct AppState {
    pub config: Config,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        // No global timeout: the historical CSV is large and only the price
        // sources carry a per-request deadline.
        let client = reqwest::Client::builder().build()?;
        Ok(Self { config, client })
    }
}

pub async fn run_http_server(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&state.config.listen_address).await?;
    info!(
        "🌐 Hashprice dashboard listening on http://{}",
        state.config.listen_address
    );

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_request(req, state).await }
            });

            if let Err(err) = http1::Builder::new()
                .keep_alive(true)
                .serve_connection(io, service)
                .await
            {
                error!("Error serving connection: {:?}", err);
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    let response = match (req.method(), path.as_str()) {
        (&Method::GET, "/") => serve_dashboard(state, &query).await,
        (&Method::GET, "/api/hashprice") => serve_snapshot_json(state).await,
        (&Method::GET, "/health") => {
            let body = json!({ "healthy": true }).to_string();
            json_response(StatusCode::OK, body)
        }
        (&Method::GET, "/favicon.svg") | (&Method::GET, "/favicon.ico") => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "image/svg+xml")
            .body(Full::new(Bytes::from(chart_favicon_inline_svg())))
            .unwrap(),
        _ => {
            let mut response = Response::new(Full::new(Bytes::from("Not Found")));
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    };

    Ok(response)
}

async fn serve_dashboard(state: Arc<AppState>, query: &str) -> Response<Full<Bytes>> {
    let requested_theme = query_param(query, "theme");
    match calculate(&state.client, &state.config.engine_config()).await {
        Ok(snapshot) => {
            let html = render_page(&snapshot, &state.config, requested_theme.as_deref());
            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(Full::new(Bytes::from(html)))
                .unwrap()
        }
        Err(e) => {
            error!("Hashprice calculation failed: {}", e);
            Response::builder()
                .status(StatusCode::BAD_GATEWAY)
                .header("Content-Type", "text/plain; charset=utf-8")
                .body(Full::new(Bytes::from(format!(
                    "Hashprice unavailable: {}",
                    e
                ))))
                .unwrap()
        }
    }
}

async fn serve_snapshot_json(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match calculate(&state.client, &state.config.engine_config()).await {
        Ok(snapshot) => {
            let body = serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string());
            json_response(StatusCode::OK, body)
        }
        Err(e) => {
            error!("Hashprice calculation failed: {}", e);
            let body = json!({ "error": e.to_string() }).to_string();
            json_response(StatusCode::BAD_GATEWAY, body)
        }
    }
}

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Pull one key out of a raw query string.
fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key && !v.is_empty()).then(|| v.to_string())
    })
}

/// Render the dashboard page from a snapshot. Pure string assembly so the
/// layout is testable without a server.
pub fn render_page(snapshot: &HashpriceSnapshot, config: &Config, theme: Option<&str>) -> String {
    let theme = config.theme(theme);
    let max = snapshot.trend_max();

    let mut bars = String::new();
    for point in &snapshot.trend {
        bars.push_str(&format!(
            "<div class='barline'>{} | {} {}</div>\n",
            point.date,
            trend_bar_padded(point.hashprice_1d, max),
            format_usd(point.hashprice_1d)
        ));
    }
    bars.push_str("<div class='separator'></div>\n");
    bars.push_str(&format!(
        "<div class='barline'>{} | {} {} {} {} vs 7D</div>",
        snapshot.generated_at.format("%Y-%m-%d"),
        trend_bar_padded(snapshot.hashprice_realtime, max),
        format_usd(snapshot.hashprice_realtime),
        deviation_arrow(snapshot.pct_vs_7d),
        format_signed_pct(snapshot.pct_vs_7d)
    ));

    let theme_links: String = config
        .themes
        .iter()
        .map(|t| {
            format!(
                "<a href=\"/?theme={}\">{}</a>",
                t.name,
                capitalize(&t.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ");

    DASHBOARD_PAGE_TEMPLATE
        .replace("/* {{NAV_ICON_CSS}} */", nav_icon_css())
        .replace("{{ACCENT}}", &theme.accent)
        .replace(
            "{{REFRESH_SECS}}",
            &config.refresh_interval_secs.to_string(),
        )
        .replace(
            "{{TIMESTAMP}}",
            &snapshot
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        )
        .replace("{{SPOT}}", &format_usd(snapshot.spot_usd))
        .replace("{{REALTIME}}", &format_usd(snapshot.hashprice_realtime))
        .replace(
            "{{REALTIME_RAW}}",
            &format!("{:.2}", snapshot.hashprice_realtime),
        )
        .replace("{{ARROW}}", deviation_arrow(snapshot.pct_vs_7d))
        .replace("{{PCT_VS_7D}}", &format_signed_pct(snapshot.pct_vs_7d))
        .replace("{{HASHPRICE_1D}}", &format_usd(snapshot.hashprice_1d))
        .replace("{{HASHPRICE_7D}}", &format_usd(snapshot.hashprice_7d))
        .replace("{{THEME_LINKS}}", &theme_links)
        .replace("{{BARS}}", &bars)
}

fn deviation_arrow(pct: f64) -> &'static str {
    if pct < 0.0 {
        "▼"
    } else {
        "▲"
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
