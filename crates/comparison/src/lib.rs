//! # ETF Comparison Sessions
//!
//! Orchestrates a comparison: validates the user's ETF selection, downloads
//! the benchmark once per session and every selected ETF concurrently, and
//! runs the risk/return calculator for each ETF in isolation.

pub mod error;
pub mod outcome;
pub mod session;

pub use error::ComparisonError;
pub use outcome::{simulate_final_value, AssetComparison, ComparisonReport, SeriesSpan};
pub use session::{unavailable_reason, ComparisonRequest, ComparisonSession, FetchObserver};
