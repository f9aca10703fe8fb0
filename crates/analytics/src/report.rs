use crate::error::AnalyticsError;
use rust_decimal::Decimal;

/// A single metric: either a value or the reason it is unavailable.
pub type MetricValue = Result<Decimal, AnalyticsError>;

/// The five risk/return metrics for one asset.
///
/// Each field is independent: a result may carry a valid return, volatility
/// and drawdown while beta and alpha are unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    /// Total return over the supplied series, in percent.
    pub return_pct: MetricValue,
    /// Sample standard deviation of daily returns scaled by sqrt(252), as a fraction.
    pub volatility_annualized: MetricValue,
    /// Sensitivity to the benchmark: cov(asset, benchmark) / var(benchmark).
    pub beta: MetricValue,
    /// Worst decline from a running peak, in percent (always <= 0).
    pub max_drawdown_pct: MetricValue,
    /// Single-period CAPM alpha, in percentage points.
    pub alpha: MetricValue,
}

impl MetricResult {
    /// A result in which every metric is unavailable for the same reason.
    pub fn unavailable(reason: AnalyticsError) -> Self {
        Self {
            return_pct: Err(reason.clone()),
            volatility_annualized: Err(reason.clone()),
            beta: Err(reason.clone()),
            max_drawdown_pct: Err(reason.clone()),
            alpha: Err(reason),
        }
    }

    /// True if at least one metric carries a value.
    pub fn has_any_value(&self) -> bool {
        self.metrics().iter().any(|(_, m)| m.is_ok())
    }

    /// All metrics with their display names, in reporting order.
    pub fn metrics(&self) -> [(&'static str, &MetricValue); 5] {
        [
            ("return_pct", &self.return_pct),
            ("volatility_annualized", &self.volatility_annualized),
            ("beta", &self.beta),
            ("max_drawdown_pct", &self.max_drawdown_pct),
            ("alpha", &self.alpha),
        ]
    }
}
