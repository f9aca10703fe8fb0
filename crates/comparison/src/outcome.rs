use analytics::{AnalyticsError, MetricResult, MetricValue};
use chrono::NaiveDate;
use configuration::{BenchmarkWindow, EtfEntry};
use core_types::{Period, PriceSeries};
use rust_decimal::Decimal;

/// The trading dates a series actually covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSpan {
    pub observations: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl SeriesSpan {
    pub fn of(series: &PriceSeries) -> Self {
        Self {
            observations: series.len(),
            first_date: series.first_date(),
            last_date: series.last_date(),
        }
    }
}

/// The outcome for one selected ETF.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetComparison {
    pub name: String,
    pub symbol: String,
    /// `None` when no prices could be obtained.
    pub span: Option<SeriesSpan>,
    pub metrics: MetricResult,
    /// The simulated value of the initial investment at the end of the period.
    pub final_value: MetricValue,
}

impl AssetComparison {
    /// A row for an ETF whose prices could not be used at all.
    pub fn unavailable(etf: &EtfEntry, reason: AnalyticsError) -> Self {
        Self {
            name: etf.name.clone(),
            symbol: etf.symbol.clone(),
            span: None,
            metrics: MetricResult::unavailable(reason.clone()),
            final_value: Err(reason),
        }
    }
}

/// Everything produced by one comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub period: Period,
    pub initial_investment: Decimal,
    pub risk_free_rate_pct: Decimal,
    pub benchmark_symbol: String,
    pub benchmark_window: BenchmarkWindow,
    /// The full benchmark download, or why it is missing.
    pub benchmark: Result<SeriesSpan, AnalyticsError>,
    /// One entry per selected ETF, in selection order.
    pub assets: Vec<AssetComparison>,
}

impl ComparisonReport {
    /// True when at least one ETF produced a usable metric.
    pub fn has_any_data(&self) -> bool {
        self.assets.iter().any(|a| a.metrics.has_any_value())
    }
}

/// Value of `amount` after growing by `return_pct` percent.
pub fn simulate_final_value(amount: Decimal, return_pct: &MetricValue) -> MetricValue {
    let r = return_pct.clone()?;
    r.checked_div(Decimal::ONE_HUNDRED)
        .and_then(|growth| (Decimal::ONE + growth).checked_mul(amount))
        .ok_or_else(|| AnalyticsError::Calculation("final value".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn final_value_follows_total_return() {
        assert_eq!(simulate_final_value(dec!(1000), &Ok(dec!(10))), Ok(dec!(1100)));
        assert_eq!(simulate_final_value(dec!(250), &Ok(dec!(-20))), Ok(dec!(200)));
    }

    #[test]
    fn final_value_overflow_is_a_calculation_error() {
        assert_eq!(
            simulate_final_value(Decimal::MAX, &Ok(dec!(500))),
            Err(AnalyticsError::Calculation("final value".to_string()))
        );
    }

    #[test]
    fn final_value_is_unavailable_with_the_return() {
        let reason = AnalyticsError::DataUnavailable("EWZ".to_string());
        assert_eq!(simulate_final_value(dec!(1000), &Err(reason.clone())), Err(reason));
    }
}
