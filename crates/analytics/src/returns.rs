//! Return series and the sample statistics computed over them.

use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::PriceSeries;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// The fractional price change from the previous session to `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub value: Decimal,
}

fn overflow(metric: &'static str) -> AnalyticsError {
    AnalyticsError::Calculation(metric.to_string())
}

/// Percentage change between each pair of consecutive closes.
///
/// A series of `n` prices yields `n - 1` returns, each dated on the later
/// session. Gaps in the calendar are not filled. A change that does not fit
/// in a `Decimal` fails `metric`.
pub fn daily_returns(series: &PriceSeries, metric: &'static str) -> Result<Vec<DailyReturn>, AnalyticsError> {
    series
        .points()
        .windows(2)
        .map(|w| {
            w[1].close
                .checked_sub(w[0].close)
                .and_then(|change| change.checked_div(w[0].close))
                .map(|value| DailyReturn { date: w[1].date, value })
                .ok_or_else(|| overflow(metric))
        })
        .collect()
}

/// Inner-joins two return series on date.
///
/// Only dates present in both series survive, returned as
/// `(asset, benchmark)` pairs in date order. Both inputs must be ascending.
pub fn align(asset: &[DailyReturn], benchmark: &[DailyReturn]) -> Vec<(Decimal, Decimal)> {
    let mut aligned = Vec::with_capacity(asset.len().min(benchmark.len()));
    let (mut i, mut j) = (0, 0);

    while i < asset.len() && j < benchmark.len() {
        match asset[i].date.cmp(&benchmark[j].date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                aligned.push((asset[i].value, benchmark[j].value));
                i += 1;
                j += 1;
            }
        }
    }

    aligned
}

/// Total return over a price series, in percent.
pub fn total_return_pct(series: &PriceSeries) -> Result<Decimal, AnalyticsError> {
    let first = series.first().close;
    let last = series.last().close;
    last.checked_sub(first)
        .and_then(|change| change.checked_div(first))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("return"))
}

/// Most negative drawdown from the running peak, in percent.
pub fn max_drawdown_pct(series: &PriceSeries) -> Decimal {
    let mut peak = series.first().close;
    let mut worst = Decimal::ZERO;

    for point in series.points() {
        if point.close > peak {
            peak = point.close;
        }
        let drawdown = (point.close - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    worst * Decimal::ONE_HUNDRED
}

/// Sample covariance (divides by n - 1).
pub fn sample_covariance(pairs: &[(Decimal, Decimal)], metric: &'static str) -> Result<Decimal, AnalyticsError> {
    if pairs.len() < 2 {
        return Err(AnalyticsError::NotEnoughData {
            metric,
            required: 2,
            actual: pairs.len(),
        });
    }

    let n = Decimal::from(pairs.len());
    let mean_x = pairs
        .iter()
        .try_fold(Decimal::ZERO, |acc, (x, _)| acc.checked_add(*x))
        .and_then(|sum| sum.checked_div(n))
        .ok_or_else(|| overflow(metric))?;
    let mean_y = pairs
        .iter()
        .try_fold(Decimal::ZERO, |acc, (_, y)| acc.checked_add(*y))
        .and_then(|sum| sum.checked_div(n))
        .ok_or_else(|| overflow(metric))?;

    pairs
        .iter()
        .try_fold(Decimal::ZERO, |acc, (x, y)| {
            let product = x.checked_sub(mean_x)?.checked_mul(y.checked_sub(mean_y)?)?;
            acc.checked_add(product)
        })
        .and_then(|sum| sum.checked_div(n - Decimal::ONE))
        .ok_or_else(|| overflow(metric))
}

/// Sample variance (divides by n - 1).
pub fn sample_variance(values: &[Decimal], metric: &'static str) -> Result<Decimal, AnalyticsError> {
    let pairs: Vec<(Decimal, Decimal)> = values.iter().map(|v| (*v, *v)).collect();
    sample_covariance(&pairs, metric)
}

/// Sample standard deviation (square root of the sample variance).
pub fn sample_std_dev(values: &[Decimal], metric: &'static str) -> Result<Decimal, AnalyticsError> {
    let variance = sample_variance(values, metric)?;
    variance.sqrt().ok_or_else(|| overflow(metric))
}
