use crate::error::ConfigError;
use core_types::Period;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections fall back to the
/// defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub comparison: ComparisonSettings,
    pub provider: ProviderSettings,
    pub logging: LoggingSettings,
    /// The catalog of ETFs a user may pick from.
    pub etfs: Vec<EtfEntry>,
}

/// A selectable ETF: the display name and its ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EtfEntry {
    pub name: String,
    pub symbol: String,
}

impl EtfEntry {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Which slice of the benchmark series is used when computing alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum BenchmarkWindow {
    /// Trim the benchmark to the asset's first..last trading date.
    MatchAsset,
    /// Use the whole benchmark lookback regardless of the asset period.
    FullLookback,
}

/// Parameters of a comparison run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    /// The index every ETF is measured against (e.g., "^GSPC").
    pub benchmark_symbol: String,
    /// The lookback used when downloading the benchmark, once per session.
    pub benchmark_period: Period,
    /// The period used when the user does not pick one.
    pub default_period: Period,
    /// Risk-free rate for the comparison period, in percent (2.0 = 2%).
    pub risk_free_rate_pct: Decimal,
    /// The default simulated investment amount.
    pub initial_investment: Decimal,
    /// The smallest investment amount accepted.
    pub min_investment: Decimal,
    /// The maximum number of ETFs compared at once.
    pub max_selections: usize,
    pub benchmark_window: BenchmarkWindow,
}

/// Settings for the historical price provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// How many times a transient failure is retried before giving up.
    pub max_retries: u32,
    /// Delay before the first retry; grows linearly with each attempt.
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comparison: ComparisonSettings::default(),
            provider: ProviderSettings::default(),
            logging: LoggingSettings::default(),
            etfs: vec![
                EtfEntry::new("AZ China", "ASHR"),
                EtfEntry::new("AZ MSCI TAIWAN INDEX FD", "EWT"),
                EtfEntry::new("AZ RUSSELL 2000", "IWM"),
                EtfEntry::new("AZ Brasil", "EWZ"),
                EtfEntry::new("AZ MSCI UNITED KINGDOM", "EWU"),
            ],
        }
    }
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            benchmark_symbol: "^GSPC".to_string(),
            benchmark_period: Period::TenYears,
            default_period: Period::OneMonth,
            risk_free_rate_pct: dec!(2.0),
            initial_investment: dec!(1000),
            min_investment: dec!(100),
            max_selections: 3,
            benchmark_window: BenchmarkWindow::MatchAsset,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "etf-compare.log".to_string(),
        }
    }
}

impl Config {
    /// Checks the cross-field rules that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.etfs.is_empty() {
            return Err(ConfigError::ValidationError(
                "the ETF catalog is empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        let mut symbols = HashSet::new();
        for etf in &self.etfs {
            if etf.name.trim().is_empty() || etf.symbol.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "ETF entry {:?} needs both a name and a symbol",
                    etf
                )));
            }
            if !names.insert(etf.name.to_lowercase()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate ETF name '{}'",
                    etf.name
                )));
            }
            if !symbols.insert(etf.symbol.to_uppercase()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate ETF symbol '{}'",
                    etf.symbol
                )));
            }
        }

        let c = &self.comparison;
        if c.benchmark_symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "benchmark_symbol must not be empty".to_string(),
            ));
        }
        if c.max_selections == 0 {
            return Err(ConfigError::ValidationError(
                "max_selections must be at least 1".to_string(),
            ));
        }
        if c.min_investment <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "min_investment must be positive".to_string(),
            ));
        }
        if c.initial_investment < c.min_investment {
            return Err(ConfigError::ValidationError(format!(
                "initial_investment {} is below min_investment {}",
                c.initial_investment, c.min_investment
            )));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
