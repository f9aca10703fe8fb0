use crate::error::ApiError;
use crate::SeriesProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{CoreError, Period, PriceSeries};
use std::collections::{HashMap, HashSet};

/// An in-memory `SeriesProvider`.
///
/// Each stored series is windowed to the requested period, ending at the
/// configured `as_of` date (or the series' own last date when unset).
#[derive(Debug, Clone, Default)]
pub struct StaticSeriesProvider {
    series: HashMap<String, PriceSeries>,
    malformed: HashSet<String>,
    as_of: Option<NaiveDate>,
}

impl StaticSeriesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol().to_string(), series);
        self
    }

    /// Makes every request for `symbol` fail as if the close field were missing.
    pub fn with_malformed(mut self, symbol: impl Into<String>) -> Self {
        self.malformed.insert(symbol.into());
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

#[async_trait]
impl SeriesProvider for StaticSeriesProvider {
    async fn fetch_series(&self, symbol: &str, period: Period) -> Result<PriceSeries, ApiError> {
        if self.malformed.contains(symbol) {
            return Err(ApiError::MissingField {
                symbol: symbol.to_string(),
                field: "close".to_string(),
            });
        }

        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| ApiError::DataUnavailable(symbol.to_string()))?;

        let as_of = self.as_of.unwrap_or_else(|| series.last_date());
        series
            .window(period.start_date(as_of), as_of)
            .map_err(|e| match e {
                CoreError::EmptySeries(s) => ApiError::DataUnavailable(s),
                other => ApiError::InvalidData(other),
            })
    }
}
