use crate::error::AnalyticsError;
use crate::report::{MetricResult, MetricValue};
use crate::returns::{
    align, daily_returns, max_drawdown_pct, sample_covariance, sample_std_dev, sample_variance,
    total_return_pct,
};
use core_types::PriceSeries;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Trading sessions per year used to annualise daily volatility.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// A stateless calculator turning price series into risk/return metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskReturnCalculator {}

impl RiskReturnCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the five comparison metrics.
    ///
    /// # Arguments
    ///
    /// * `asset` - The asset's closing prices over the window being compared.
    /// * `benchmark` - The benchmark's closing prices. Its calendar window may
    ///   differ from the asset's; returns are aligned on date internally.
    /// * `risk_free_rate_pct` - The risk-free rate for the whole period, in percent.
    ///
    /// Fewer than two asset prices make every metric unavailable. Otherwise
    /// each metric group fails independently.
    pub fn compute(
        &self,
        asset: &PriceSeries,
        benchmark: &PriceSeries,
        risk_free_rate_pct: Decimal,
    ) -> MetricResult {
        self.compute_with(asset, Ok(benchmark), risk_free_rate_pct)
    }

    /// Computes the asset-only metrics when no benchmark series could be
    /// obtained; beta and alpha carry `reason`.
    pub fn compute_without_benchmark(&self, asset: &PriceSeries, reason: AnalyticsError) -> MetricResult {
        self.compute_with(asset, Err(reason), Decimal::ZERO)
    }

    fn compute_with(
        &self,
        asset: &PriceSeries,
        benchmark: Result<&PriceSeries, AnalyticsError>,
        risk_free_rate_pct: Decimal,
    ) -> MetricResult {
        if asset.len() < 2 {
            tracing::debug!(symbol = asset.symbol(), points = asset.len(), "Not enough prices for any metric.");
            return MetricResult::unavailable(AnalyticsError::NotEnoughData {
                metric: "return",
                required: 2,
                actual: asset.len(),
            });
        }

        let return_pct = total_return_pct(asset);
        let volatility_annualized = self.annualized_volatility(asset);
        let max_drawdown = max_drawdown_pct(asset);

        let (beta, alpha) = match benchmark {
            Ok(benchmark) => {
                let beta = self.beta(asset, benchmark);
                let alpha = beta.clone().and_then(|beta| {
                    let asset_return = return_pct.clone()?;
                    let benchmark_return = total_return_pct(benchmark)?;
                    capm_alpha(asset_return, benchmark_return, beta, risk_free_rate_pct)
                        .ok_or_else(|| AnalyticsError::Calculation("alpha".to_string()))
                });
                (beta, alpha)
            }
            Err(reason) => (Err(reason.clone()), Err(reason)),
        };

        MetricResult {
            return_pct,
            volatility_annualized,
            beta,
            max_drawdown_pct: Ok(max_drawdown),
            alpha,
        }
    }

    fn annualized_volatility(&self, asset: &PriceSeries) -> MetricValue {
        let values: Vec<Decimal> = daily_returns(asset, "volatility")?
            .iter()
            .map(|r| r.value)
            .collect();
        let daily = sample_std_dev(&values, "volatility")?;
        Decimal::from(TRADING_DAYS_PER_YEAR)
            .sqrt()
            .and_then(|scale| daily.checked_mul(scale))
            .ok_or_else(|| AnalyticsError::Calculation("volatility".to_string()))
    }

    fn beta(&self, asset: &PriceSeries, benchmark: &PriceSeries) -> MetricValue {
        let asset_returns = daily_returns(asset, "beta")?;
        let benchmark_returns = daily_returns(benchmark, "beta")?;
        let aligned = align(&asset_returns, &benchmark_returns);
        tracing::debug!(
            symbol = benchmark.symbol(),
            asset_returns = asset_returns.len(),
            benchmark_returns = benchmark_returns.len(),
            aligned = aligned.len(),
            "Aligned daily returns."
        );

        let covariance = sample_covariance(&aligned, "beta")?;
        let bench_values: Vec<Decimal> = aligned.iter().map(|(_, b)| *b).collect();
        let variance = sample_variance(&bench_values, "beta")?;

        if variance.is_zero() {
            return Err(AnalyticsError::Degenerate {
                metric: "beta",
                reason: "benchmark returns have zero variance".to_string(),
            });
        }

        covariance
            .checked_div(variance)
            .ok_or_else(|| AnalyticsError::Calculation("beta".to_string()))
    }
}

/// Single-period CAPM alpha: `r_a - (r_f + beta * (r_m - r_f))`.
///
/// `None` when an intermediate value overflows.
pub fn capm_alpha(asset_return_pct: Decimal, benchmark_return_pct: Decimal, beta: Decimal, risk_free_rate_pct: Decimal) -> Option<Decimal> {
    let excess = benchmark_return_pct.checked_sub(risk_free_rate_pct)?;
    let expected = risk_free_rate_pct.checked_add(beta.checked_mul(excess)?)?;
    asset_return_pct.checked_sub(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use chrono::NaiveDate;
    use core_types::PricePoint;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn series(symbol: &str, prices: &[(u32, Decimal)]) -> PriceSeries {
        let points = prices
            .iter()
            .map(|&(day, close)| PricePoint::new(date(day), close))
            .collect();
        PriceSeries::new(symbol, points).unwrap()
    }

    fn consecutive(symbol: &str, prices: &[Decimal]) -> PriceSeries {
        let dated: Vec<(u32, Decimal)> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| (i as u32 + 1, *p))
            .collect();
        series(symbol, &dated)
    }

    fn close_to(actual: &MetricValue, expected: Decimal) -> bool {
        match actual {
            Ok(v) => (*v - expected).abs() < dec!(0.000001),
            Err(_) => false,
        }
    }

    #[test]
    fn single_price_makes_everything_unavailable() {
        let asset = consecutive("ETF", &[dec!(100)]);
        let bench = consecutive("IDX", &[dec!(100), dec!(101), dec!(99)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        for (name, metric) in result.metrics() {
            assert!(metric.is_err(), "{name} should be unavailable");
        }
        assert!(!result.has_any_value());
    }

    #[test]
    fn two_point_total_return_is_exact() {
        let asset = consecutive("ETF", &[dec!(80), dec!(92)]);
        let bench = consecutive("IDX", &[dec!(100), dec!(101)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert_eq!(result.return_pct, Ok(dec!(15)));
        // One daily return is not enough for a sample deviation.
        assert!(matches!(
            result.volatility_annualized,
            Err(AnalyticsError::NotEnoughData { metric: "volatility", .. })
        ));
    }

    #[test]
    fn constant_prices_have_zero_volatility_and_drawdown() {
        let asset = consecutive("ETF", &[dec!(50), dec!(50), dec!(50), dec!(50)]);
        let bench = consecutive("IDX", &[dec!(100), dec!(102), dec!(101), dec!(104)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert_eq!(result.volatility_annualized, Ok(Decimal::ZERO));
        assert_eq!(result.max_drawdown_pct, Ok(Decimal::ZERO));
        assert_eq!(result.beta, Ok(Decimal::ZERO));
    }

    #[test]
    fn rising_prices_have_no_drawdown() {
        let asset = consecutive("ETF", &[dec!(10), dec!(11), dec!(12.5), dec!(13)]);
        let bench = consecutive("IDX", &[dec!(10), dec!(10), dec!(10), dec!(10)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert_eq!(result.max_drawdown_pct, Ok(Decimal::ZERO));
    }

    #[test]
    fn constant_benchmark_leaves_beta_and_alpha_unavailable() {
        let asset = consecutive("ETF", &[dec!(100), dec!(103), dec!(99), dec!(104)]);
        let bench = consecutive("IDX", &[dec!(200), dec!(200), dec!(200), dec!(200)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert!(matches!(result.beta, Err(AnalyticsError::Degenerate { metric: "beta", .. })));
        assert_eq!(result.beta.as_ref().unwrap_err().kind(), FailureKind::Degenerate);
        assert!(result.alpha.is_err());
        assert_eq!(result.return_pct, Ok(dec!(4)));
        assert!(result.volatility_annualized.is_ok());
        assert!(result.max_drawdown_pct.is_ok());
    }

    #[test]
    fn beta_of_scaled_returns() {
        // Asset daily returns are exactly twice the benchmark's.
        let bench = consecutive("IDX", &[dec!(100), dec!(101), dec!(99.99), dec!(101.9898)]);
        let asset = consecutive("ETF", &[dec!(100), dec!(102), dec!(99.96), dec!(103.9584)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert!(close_to(&result.beta, dec!(2)));

        // alpha = r_a - (r_f + beta * (r_m - r_f))
        let r_a = dec!(3.9584);
        let r_m = dec!(1.9898);
        let expected = r_a - (dec!(2) + dec!(2) * (r_m - dec!(2)));
        assert!(close_to(&result.alpha, expected));
    }

    #[test]
    fn beta_uses_only_dates_in_both_series() {
        // Benchmark misses the 3rd and 5th; the asset's moves on those days
        // must not enter the regression.
        let asset = series(
            "ETF",
            &[(1, dec!(100)), (2, dec!(110)), (3, dec!(55)), (4, dec!(60.5)), (5, dec!(500)), (6, dec!(550)), (7, dec!(605))],
        );
        let bench = series(
            "IDX",
            &[(1, dec!(100)), (2, dec!(105)), (4, dec!(105)), (6, dec!(110.25)), (7, dec!(100))],
        );
        // Aligned pairs: d2 (0.10, 0.05), d4 (0.10, 0.00), d6 (0.10, 0.05), d7 (0.10, ~-0.093)
        // The asset return is constant across aligned dates, so beta is zero.
        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert!(close_to(&result.beta, Decimal::ZERO));
    }

    #[test]
    fn too_few_aligned_points_only_affects_beta_and_alpha() {
        let asset = series("ETF", &[(1, dec!(100)), (2, dec!(101)), (3, dec!(102))]);
        let bench = series("IDX", &[(10, dec!(100)), (11, dec!(101)), (12, dec!(103))]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert!(matches!(
            result.beta,
            Err(AnalyticsError::NotEnoughData { metric: "beta", actual: 0, .. })
        ));
        assert!(result.alpha.is_err());
        assert_eq!(result.return_pct, Ok(dec!(2)));
        assert!(result.volatility_annualized.is_ok());
    }

    #[test]
    fn volatility_is_annualized_sample_deviation() {
        // Daily returns +10% and -10%: sample std dev is sqrt(0.02).
        let asset = consecutive("ETF", &[dec!(100), dec!(110), dec!(99)]);
        let bench = consecutive("IDX", &[dec!(100), dec!(101), dec!(102)]);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        let expected = (dec!(0.02) * dec!(252)).sqrt().unwrap();
        assert!(close_to(&result.volatility_annualized, expected));
    }

    #[test]
    fn missing_benchmark_keeps_asset_metrics() {
        let asset = consecutive("ETF", &[dec!(100), dec!(90), dec!(95)]);
        let reason = AnalyticsError::DataUnavailable("benchmark".to_string());

        let result = RiskReturnCalculator::new().compute_without_benchmark(&asset, reason.clone());
        assert_eq!(result.beta, Err(reason.clone()));
        assert_eq!(result.alpha, Err(reason));
        assert_eq!(result.return_pct, Ok(dec!(-5)));
        assert_eq!(result.max_drawdown_pct, Ok(dec!(-10)));
    }

    #[test]
    fn extreme_price_swings_are_calculation_errors() {
        let prices = [dec!(0.00000001), dec!(1000000000), dec!(1000000000)];
        let asset = consecutive("ETF", &prices);
        let bench = consecutive("IDX", &prices);

        let result = RiskReturnCalculator::new().compute(&asset, &bench, dec!(2));
        assert!(matches!(
            result.volatility_annualized,
            Err(AnalyticsError::Calculation(ref metric)) if metric == "volatility"
        ));
        assert!(matches!(
            result.beta,
            Err(AnalyticsError::Calculation(ref metric)) if metric == "beta"
        ));
        assert!(result.alpha.is_err());
        assert!(result.return_pct.is_ok());
        assert_eq!(result.max_drawdown_pct, Ok(Decimal::ZERO));
    }

    #[test]
    fn capm_alpha_matches_formula() {
        assert_eq!(capm_alpha(dec!(12), dec!(8), dec!(1.5), dec!(2)), Some(dec!(1)));
        assert_eq!(capm_alpha(dec!(1), dec!(2), Decimal::MAX, Decimal::ZERO), None);
    }
}
