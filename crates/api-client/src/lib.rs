use async_trait::async_trait;
use core_types::{Period, PriceSeries};

pub mod error;
pub mod responses;
pub mod static_provider;
pub mod yahoo;

// --- Public API ---
pub use error::ApiError;
pub use static_provider::StaticSeriesProvider;
pub use yahoo::YahooClient;

/// The abstract interface for a historical price source.
///
/// The comparison layer only ever talks to this trait, so the live chart API
/// can be swapped for an in-memory provider in tests or offline runs.
/// Implementations may be slow or fail per request; a failure for one symbol
/// must not affect requests for others.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetches daily closing prices for `symbol` over the lookback `period`.
    async fn fetch_series(&self, symbol: &str, period: Period) -> Result<PriceSeries, ApiError>;
}
