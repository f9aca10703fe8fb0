use crate::error::CoreError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A lookback period selectable for a comparison.
///
/// The codes match the `range` values understood by the chart provider, so a
/// period can be passed straight through to a data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Period {
    /// Every selectable period, in display order.
    pub const ALL: [Period; 7] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::YearToDate,
        Period::FiveYears,
        Period::TenYears,
    ];

    /// The short code for this period (e.g. "3mo").
    pub fn code(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::YearToDate => "ytd",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }

    /// A human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneMonth => "1 month",
            Period::ThreeMonths => "3 months",
            Period::SixMonths => "6 months",
            Period::OneYear => "1 year",
            Period::YearToDate => "year to date",
            Period::FiveYears => "5 years",
            Period::TenYears => "10 years",
        }
    }

    /// The first calendar date covered by this period when it ends on `as_of`.
    pub fn start_date(&self, as_of: NaiveDate) -> NaiveDate {
        let months = match self {
            Period::YearToDate => {
                return NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of);
            }
            Period::OneMonth => 1,
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::OneYear => 12,
            Period::FiveYears => 60,
            Period::TenYears => 120,
        };
        as_of
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| CoreError::InvalidPeriod(s.to_string()))
    }
}
