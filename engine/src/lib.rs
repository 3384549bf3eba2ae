//! Bitcoin hashprice engine: expected daily USD revenue per PH/s of mining
//! capacity, derived from public chain data and a live spot quote.
//!
//! The pipeline is deliberately stateless. Every calculation fetches the
//! historical series and the live price from scratch; there is no cache,
//! no retry, and no degraded output.

pub mod calculator;
pub mod error;
pub mod price;
pub mod series;
pub mod types;

pub use calculator::{build_snapshot, calculate, EngineConfig};
pub use error::{EngineError, FailureReason, Result, SourceFailure};
pub use price::{default_sources, fetch_live_price, PriceSource};
pub use series::{derive_rates, fetch_series, SeriesSource};
pub use types::{DailyRate, DailyRecord, HashpriceSnapshot, TrendPoint};
