use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Price series for '{0}' contains no data")]
    EmptySeries(String),

    #[error("Price series for '{symbol}' is missing the '{field}' field")]
    MissingField { symbol: String, field: String },

    #[error("Invalid price {price} for '{symbol}' on {date}")]
    InvalidPrice {
        symbol: String,
        date: NaiveDate,
        price: String,
    },

    #[error("Price series for '{symbol}' is not strictly ascending at {date}")]
    OutOfOrder { symbol: String, date: NaiveDate },

    #[error("Unknown period code '{0}' (expected one of 1mo, 3mo, 6mo, 1y, ytd, 5y, 10y)")]
    InvalidPeriod(String),
}
