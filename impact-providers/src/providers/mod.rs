//! Clients for the external data sources.
//!
//! Each client owns a blocking HTTP client with its provider's timeout and
//! routes every call through [`fetch_with_fallback`](crate::fetcher::fetch_with_fallback)
//! or [`fetch_with_tiers`](crate::fetcher::fetch_with_tiers). Only the NEO
//! feed is cached.

mod elevation;
mod generative;
mod geocode;
mod neo_feed;
mod seismic;
mod weather;

pub use elevation::{ElevationClient, ElevationTier};
pub use generative::GenerativeClient;
pub use geocode::GeocodeClient;
pub use neo_feed::{parse_feed, NeoFeed, NeoFeedClient, NeoSummary, FEED_WINDOW_DAYS};
pub use seismic::{SeismicClient, SeismicQuery};
pub use weather::{WeatherClient, WeatherSummary};

use serde_json::Value;

/// Reads a number that may be encoded as a JSON number or a numeric string.
fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decimal rounding of the exact binary value, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(f64::NAN)
}
