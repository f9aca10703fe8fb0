use crate::error::ApiError;
use chrono::{TimeZone, Utc};
use core_types::{CoreError, PricePoint, PriceSeries};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The envelope of a `GET /v8/finance/chart/{symbol}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Represents an error payload from the chart API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    // Absent when the symbol exists but has no sessions in the range.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    /// Seconds east of UTC for the listing exchange.
    #[serde(default)]
    pub gmtoffset: i64,
    pub exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    // There are open/high/low/volume arrays too, but only closes are used.
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

impl ChartResponse {
    /// Converts the response into a validated daily closing-price series.
    pub fn into_price_series(self, symbol: &str) -> Result<PriceSeries, ApiError> {
        if let Some(error) = self.chart.error {
            if error.code.eq_ignore_ascii_case("Not Found") {
                return Err(ApiError::DataUnavailable(format!(
                    "{}: {}",
                    symbol, error.description
                )));
            }
            return Err(ApiError::Provider {
                symbol: symbol.to_string(),
                code: error.code,
                description: error.description,
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ApiError::DataUnavailable(symbol.to_string()))?;

        result.into_price_series(symbol)
    }
}

impl ChartResult {
    fn into_price_series(self, symbol: &str) -> Result<PriceSeries, ApiError> {
        let timestamps = match self.timestamp {
            Some(ts) if !ts.is_empty() => ts,
            _ => return Err(ApiError::DataUnavailable(symbol.to_string())),
        };

        let quote = self
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::MissingField {
                symbol: symbol.to_string(),
                field: "quote".to_string(),
            })?;

        let closes = quote.close.ok_or_else(|| ApiError::MissingField {
            symbol: symbol.to_string(),
            field: "close".to_string(),
        })?;

        let offset = self.meta.gmtoffset;
        let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for (ts, close) in timestamps.iter().zip(closes) {
            // Null closes are dropped rather than filled.
            let Some(raw) = close else {
                skipped += 1;
                continue;
            };

            let date = Utc
                .timestamp_opt(ts + offset, 0)
                .single()
                .ok_or_else(|| ApiError::Deserialization(format!("Invalid timestamp: {}", ts)))?
                .date_naive();

            let close = Decimal::from_f64(raw).ok_or_else(|| CoreError::InvalidPrice {
                symbol: symbol.to_string(),
                date,
                price: raw.to_string(),
            })?;

            // The live session can appear twice; the later row wins.
            match points.last_mut() {
                Some(last) if last.date == date => last.close = close,
                _ => points.push(PricePoint::new(date, close)),
            }
        }

        if skipped > 0 {
            tracing::debug!(symbol, skipped, "Dropped rows without a closing price.");
        }

        if points.is_empty() {
            return Err(ApiError::DataUnavailable(symbol.to_string()));
        }

        Ok(PriceSeries::new(symbol, points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    // 2024-01-02, 2024-01-03 and 2024-01-04 at 14:30 UTC (09:30 New York).
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "IWM",
                    "gmtoffset": -18000,
                    "exchangeTimezoneName": "America/New_York"
                },
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [200.0, 199.5, 197.0],
                        "close": [199.5, null, 196.25],
                        "volume": [100, 200, 300]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn builds_series_and_skips_null_closes() {
        let series = parse(BODY).into_price_series("IWM").unwrap();
        assert_eq!(series.symbol(), "IWM");
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.first().close, dec!(199.5));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(series.last().close, dec!(196.25));
    }

    #[test]
    fn duplicate_session_keeps_latest_close() {
        let body = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": 0},
            "timestamp": [1704205800, 1704225600],
            "indicators": {"quote": [{"close": [10.0, 10.5]}]}
        }], "error": null}}"#;

        let series = parse(body).into_price_series("X").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.last().close, dec!(10.5));
    }

    #[test]
    fn missing_close_array_is_a_missing_field() {
        let body = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": 0},
            "timestamp": [1704205800],
            "indicators": {"quote": [{"open": [1.0]}]}
        }], "error": null}}"#;

        let err = parse(body).into_price_series("X").unwrap_err();
        assert!(matches!(err, ApiError::MissingField { field, .. } if field == "close"));
    }

    #[test]
    fn empty_range_is_data_unavailable() {
        let body = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": 0},
            "indicators": {"quote": [{}]}
        }], "error": null}}"#;

        let err = parse(body).into_price_series("X").unwrap_err();
        assert!(matches!(err, ApiError::DataUnavailable(_)));

        let all_null = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": 0},
            "timestamp": [1704205800],
            "indicators": {"quote": [{"close": [null]}]}
        }], "error": null}}"#;
        let err = parse(all_null).into_price_series("X").unwrap_err();
        assert!(matches!(err, ApiError::DataUnavailable(_)));
    }

    #[test]
    fn provider_errors_are_classified() {
        let not_found = r#"{"chart": {"result": null, "error": {
            "code": "Not Found", "description": "No data found, symbol may be delisted"
        }}}"#;
        let err = parse(not_found).into_price_series("NOPE").unwrap_err();
        assert!(matches!(err, ApiError::DataUnavailable(_)));

        let bad_request = r#"{"chart": {"result": null, "error": {
            "code": "Bad Request", "description": "Invalid input - interval=1d is not supported"
        }}}"#;
        let err = parse(bad_request).into_price_series("X").unwrap_err();
        assert!(matches!(err, ApiError::Provider { code, .. } if code == "Bad Request"));
    }

    #[test]
    fn unrepresentable_close_is_invalid_data() {
        let body = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": 0},
            "timestamp": [1704205800, 1704292200],
            "indicators": {"quote": [{"close": [10.0, 1e300]}]}
        }], "error": null}}"#;

        let err = parse(body).into_price_series("X").unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidData(CoreError::InvalidPrice { ref symbol, .. }) if symbol == "X"
        ));
    }

    #[test]
    fn non_positive_prices_are_invalid_data() {
        let body = r#"{"chart": {"result": [{
            "meta": {"gmtoffset": 0},
            "timestamp": [1704205800, 1704292200],
            "indicators": {"quote": [{"close": [1.0, 0.0]}]}
        }], "error": null}}"#;

        let err = parse(body).into_price_series("X").unwrap_err();
        assert!(matches!(err, ApiError::InvalidData(_)));
    }
}
