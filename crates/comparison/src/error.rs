use rust_decimal::Decimal;
use thiserror::Error;

/// Problems with the comparison request itself.
///
/// Data problems for a single ETF never surface here; they become
/// unavailable metrics on that ETF's row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Select between 1 and {max} ETFs to compare (got {actual})")]
    SelectionSize { max: usize, actual: usize },

    #[error("Unknown ETF '{0}'")]
    UnknownEtf(String),

    #[error("ETF '{0}' was selected more than once")]
    DuplicateSelection(String),

    #[error("Initial investment {amount} is below the minimum of {minimum}")]
    InvestmentTooSmall { amount: Decimal, minimum: Decimal },
}
