use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single trading session's closing price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// A validated, date-ordered series of closing prices for one symbol.
///
/// Construction guarantees at least one point, strictly ascending dates (so no
/// duplicates) and strictly positive prices. A `PriceSeries` is never mutated
/// after it has been built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if points.is_empty() {
            return Err(CoreError::EmptySeries(symbol));
        }

        for (i, point) in points.iter().enumerate() {
            if point.close <= Decimal::ZERO {
                return Err(CoreError::InvalidPrice {
                    symbol,
                    date: point.date,
                    price: point.close.to_string(),
                });
            }
            if i > 0 && point.date <= points[i - 1].date {
                return Err(CoreError::OutOfOrder {
                    symbol,
                    date: point.date,
                });
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first().date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last().date
    }

    /// Returns the sub-series whose dates fall within `from..=to`.
    pub fn window(&self, from: NaiveDate, to: NaiveDate) -> Result<PriceSeries, CoreError> {
        let points: Vec<PricePoint> = self
            .points
            .iter()
            .filter(|p| p.date >= from && p.date <= to)
            .copied()
            .collect();

        if points.is_empty() {
            return Err(CoreError::EmptySeries(self.symbol.clone()));
        }

        Ok(Self {
            symbol: self.symbol.clone(),
            points,
        })
    }
}
