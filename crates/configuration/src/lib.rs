use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    BenchmarkWindow, ComparisonSettings, Config, EtfEntry, LoggingSettings, ProviderSettings,
};

/// Prefix for environment variable overrides, e.g.
/// `ETF_COMPARE__COMPARISON__RISK_FREE_RATE_PCT=3.5`.
pub const ENV_PREFIX: &str = "ETF_COMPARE";

/// Loads the application configuration.
///
/// Reads the TOML file at `path` if it exists, layers environment variable
/// overrides on top, deserializes into our strongly-typed `Config` struct and
/// validates it. A missing file is not an error: the defaults apply.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

fn finish(raw: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = raw.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Period;
    use rust_decimal_macros::dec;

    fn from_toml(text: &str) -> Result<Config, ConfigError> {
        let raw = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        finish(raw)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.comparison.benchmark_symbol, "^GSPC");
        assert_eq!(config.comparison.benchmark_period, Period::TenYears);
        assert_eq!(config.comparison.risk_free_rate_pct, dec!(2));
        assert_eq!(config.comparison.max_selections, 3);
        assert_eq!(config.comparison.benchmark_window, BenchmarkWindow::MatchAsset);
        assert_eq!(config.etfs.len(), 5);
        assert_eq!(config.etfs[0], EtfEntry::new("AZ China", "ASHR"));
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml(
            r#"
            [comparison]
            default_period = "ytd"
            risk_free_rate_pct = 3.5
            benchmark_window = "full_lookback"

            [provider]
            max_retries = 5

            [[etfs]]
            name = "World"
            symbol = "URTH"
            "#,
        )
        .unwrap();

        assert_eq!(config.comparison.default_period, Period::YearToDate);
        assert_eq!(config.comparison.risk_free_rate_pct, dec!(3.5));
        assert_eq!(config.comparison.benchmark_window, BenchmarkWindow::FullLookback);
        assert_eq!(config.comparison.benchmark_symbol, "^GSPC");
        assert_eq!(config.provider.max_retries, 5);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.etfs, vec![EtfEntry::new("World", "URTH")]);
    }

    #[test]
    fn rejects_unknown_period_code() {
        let err = from_toml("[comparison]\ndefault_period = \"2w\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let err = from_toml(
            r#"
            [[etfs]]
            name = "A"
            symbol = "SPY"

            [[etfs]]
            name = "B"
            symbol = "spy"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("duplicate ETF symbol")));
    }

    #[test]
    fn rejects_zero_selections_and_small_investment() {
        let err = from_toml("[comparison]\nmax_selections = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = from_toml("[comparison]\ninitial_investment = 50\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("below min_investment")));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = load_config("definitely-not-here.toml").unwrap();
        assert_eq!(config.comparison.min_investment, dec!(100));
    }
}
