//! Live spot-price fallback scan across an ordered list of quote sources.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{EngineError, FailureReason, Result, SourceFailure};

/// Per-source request deadline. The fallback happens across sources, not
/// within one, so a slow source only costs this much.
const SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// One quote endpoint, tried in list order.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceSource {
    pub name: String,
    pub url: String,
}

/// The hardcoded fallback order of the public quote APIs.
pub fn default_sources() -> Vec<PriceSource> {
    vec![
        PriceSource {
            name: "coingecko".to_string(),
            url: "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
                .to_string(),
        },
        PriceSource {
            name: "coinbase".to_string(),
            url: "https://api.coinbase.com/v2/prices/spot?currency=USD".to_string(),
        },
    ]
}

// The two provider shapes we recognize. CoinGecko nests a symbol-to-currency
// map; Coinbase nests a decimal string under "data".
#[derive(Deserialize)]
struct CoinGeckoQuote {
    bitcoin: CoinGeckoCurrencies,
}

#[derive(Deserialize)]
struct CoinGeckoCurrencies {
    usd: f64,
}

#[derive(Deserialize)]
struct CoinbaseQuote {
    data: CoinbaseAmount,
}

#[derive(Deserialize)]
struct CoinbaseAmount {
    amount: String,
}

/// Probe a response body against the known provider shapes.
pub fn parse_quote(body: &str) -> Option<f64> {
    if let Ok(quote) = serde_json::from_str::<CoinGeckoQuote>(body) {
        return Some(quote.bitcoin.usd);
    }
    if let Ok(quote) = serde_json::from_str::<CoinbaseQuote>(body) {
        return quote.data.amount.parse::<f64>().ok();
    }
    None
}

/// Walk the source list in order, returning the first quote that parses.
///
/// A transport error, an error status, and an unrecognized body all skip to
/// the next source without retrying; the tagged reason is kept so the final
/// exhaustion error can say what went wrong where.
pub async fn fetch_live_price(
    client: &reqwest::Client,
    sources: &[PriceSource],
) -> Result<f64> {
    let mut failures = Vec::with_capacity(sources.len());

    for source in sources {
        let response = match client.get(&source.url).timeout(SOURCE_TIMEOUT).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Price source {} unreachable: {}", source.name, e);
                failures.push(SourceFailure {
                    source: source.name.clone(),
                    reason: FailureReason::Transport(e.to_string()),
                });
                continue;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Price source {} returned HTTP {}", source.name, status);
            failures.push(SourceFailure {
                source: source.name.clone(),
                reason: FailureReason::Status(status.as_u16()),
            });
            continue;
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                failures.push(SourceFailure {
                    source: source.name.clone(),
                    reason: FailureReason::Transport(e.to_string()),
                });
                continue;
            }
        };

        match parse_quote(&body) {
            Some(price) => {
                debug!("Price source {} quoted {}", source.name, price);
                return Ok(price);
            }
            None => {
                warn!("Price source {} returned an unrecognized body", source.name);
                failures.push(SourceFailure {
                    source: source.name.clone(),
                    reason: FailureReason::UnrecognizedSchema,
                });
            }
        }
    }

    Err(EngineError::PriceSourcesExhausted(failures))
}
