//! # Risk/Return Analytics
//!
//! This crate turns closing-price series into the five comparison metrics:
//! total return, annualised volatility, beta against a benchmark, maximum
//! drawdown and CAPM alpha.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O. It depends only on `core-types`; fetching prices is
//!   somebody else's job.
//! - **Stateless Calculation:** The `RiskReturnCalculator` holds no state. Each
//!   call reads its own inputs and returns a fresh `MetricResult`, so assets can
//!   be evaluated in any order or in parallel.
//! - **Explicit Unavailability:** A metric that cannot be computed is an
//!   `Err(AnalyticsError)`, never a placeholder number.
//!
//! ## Public API
//!
//! - `RiskReturnCalculator`: the calculation entry point.
//! - `MetricResult` / `MetricValue`: the per-asset output.
//! - `AnalyticsError` / `FailureKind`: why a metric is unavailable.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{RiskReturnCalculator, TRADING_DAYS_PER_YEAR};
pub use error::{AnalyticsError, FailureKind};
pub use report::{MetricResult, MetricValue};
