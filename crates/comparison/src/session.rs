use crate::error::ComparisonError;
use crate::outcome::{simulate_final_value, AssetComparison, ComparisonReport, SeriesSpan};
use analytics::{AnalyticsError, MetricResult, RiskReturnCalculator};
use api_client::{ApiError, SeriesProvider};
use configuration::{BenchmarkWindow, ComparisonSettings, Config, EtfEntry};
use core_types::{Period, PriceSeries};
use futures::future::{join, join_all};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::collections::HashSet;
use tokio::sync::OnceCell;

/// The caller-held parameters of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    /// ETF names or symbols, as typed by the user.
    pub selections: Vec<String>,
    pub period: Period,
    pub initial_investment: Decimal,
    pub risk_free_rate_pct: Decimal,
    pub benchmark_window: BenchmarkWindow,
}

impl ComparisonRequest {
    /// A request for `selections` using the configured defaults.
    pub fn with_defaults(selections: Vec<String>, settings: &ComparisonSettings) -> Self {
        Self {
            selections,
            period: settings.default_period,
            initial_investment: settings.initial_investment,
            risk_free_rate_pct: settings.risk_free_rate_pct,
            benchmark_window: settings.benchmark_window,
        }
    }
}

/// Receives download progress, one call per selected ETF.
pub trait FetchObserver: Send + Sync {
    fn on_fetched(&self, _symbol: &str, _succeeded: bool) {}
}

impl FetchObserver for () {}

/// A comparison session.
///
/// The benchmark is downloaded once, on first use, over the configured
/// benchmark lookback, and reused by every run of the session. Everything
/// else is request-scoped.
pub struct ComparisonSession<P> {
    provider: P,
    settings: ComparisonSettings,
    catalog: Vec<EtfEntry>,
    calculator: RiskReturnCalculator,
    benchmark: OnceCell<Result<PriceSeries, AnalyticsError>>,
}

impl<P: SeriesProvider> ComparisonSession<P> {
    pub fn new(provider: P, config: &Config) -> Self {
        Self {
            provider,
            settings: config.comparison.clone(),
            catalog: config.etfs.clone(),
            calculator: RiskReturnCalculator::new(),
            benchmark: OnceCell::new(),
        }
    }

    pub fn catalog(&self) -> &[EtfEntry] {
        &self.catalog
    }

    pub fn settings(&self) -> &ComparisonSettings {
        &self.settings
    }

    /// Maps user selections onto catalog entries, by name or by symbol.
    pub fn resolve_selection(&self, selections: &[String]) -> Result<Vec<EtfEntry>, ComparisonError> {
        let max = self.settings.max_selections;
        if selections.is_empty() || selections.len() > max {
            return Err(ComparisonError::SelectionSize {
                max,
                actual: selections.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(selections.len());
        for selection in selections {
            let wanted = selection.trim();
            let etf = self
                .catalog
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(wanted) || e.symbol.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| ComparisonError::UnknownEtf(selection.clone()))?;

            if !seen.insert(etf.symbol.as_str()) {
                return Err(ComparisonError::DuplicateSelection(etf.name.clone()));
            }
            resolved.push(etf.clone());
        }

        Ok(resolved)
    }

    /// The session's benchmark series, downloaded on first call.
    pub async fn benchmark(&self) -> Result<&PriceSeries, AnalyticsError> {
        let cached = self
            .benchmark
            .get_or_init(|| async {
                let symbol = &self.settings.benchmark_symbol;
                tracing::info!(symbol = %symbol, period = %self.settings.benchmark_period, "Downloading benchmark.");
                self.provider
                    .fetch_series(symbol, self.settings.benchmark_period)
                    .await
                    .map_err(|e| {
                        tracing::error!(symbol = %symbol, error = %e, "Benchmark data unavailable; beta and alpha will be missing.");
                        unavailable_reason(&e)
                    })
            })
            .await;

        cached.as_ref().map_err(Clone::clone)
    }

    /// Runs one comparison.
    ///
    /// Only an invalid request is an error. A failed download or a
    /// degenerate series shows up as unavailable metrics on that ETF alone.
    pub async fn run(
        &self,
        request: &ComparisonRequest,
        observer: &dyn FetchObserver,
    ) -> Result<ComparisonReport, ComparisonError> {
        if request.initial_investment < self.settings.min_investment {
            return Err(ComparisonError::InvestmentTooSmall {
                amount: request.initial_investment,
                minimum: self.settings.min_investment,
            });
        }
        let selected = self.resolve_selection(&request.selections)?;

        tracing::info!(
            etfs = ?selected.iter().map(|e| e.symbol.as_str()).collect::<Vec<_>>(),
            period = %request.period,
            "Starting comparison."
        );

        let downloads = selected.iter().map(|etf| async move {
            let result = self.provider.fetch_series(&etf.symbol, request.period).await;
            if let Err(e) = &result {
                tracing::warn!(etf = %etf.name, symbol = %etf.symbol, error = %e, "Could not obtain prices.");
            }
            observer.on_fetched(&etf.symbol, result.is_ok());
            result
        });

        let (benchmark, fetched) = join(self.benchmark(), join_all(downloads)).await;

        let assets: Vec<AssetComparison> = selected
            .iter()
            .zip(fetched)
            .map(|(etf, fetched)| self.evaluate(etf, fetched, &benchmark, request))
            .collect();

        if !assets.iter().any(|a| a.metrics.has_any_value()) {
            tracing::error!("No valid data found for the selected ETFs.");
        }

        Ok(ComparisonReport {
            period: request.period,
            initial_investment: request.initial_investment,
            risk_free_rate_pct: request.risk_free_rate_pct,
            benchmark_symbol: self.settings.benchmark_symbol.clone(),
            benchmark_window: request.benchmark_window,
            benchmark: benchmark.map(SeriesSpan::of),
            assets,
        })
    }

    fn evaluate(
        &self,
        etf: &EtfEntry,
        fetched: Result<PriceSeries, ApiError>,
        benchmark: &Result<&PriceSeries, AnalyticsError>,
        request: &ComparisonRequest,
    ) -> AssetComparison {
        let asset = match fetched {
            Ok(series) => series,
            Err(e) => return AssetComparison::unavailable(etf, unavailable_reason(&e)),
        };

        let metrics = match benchmark {
            Ok(benchmark) => match benchmark_for(&asset, benchmark, request.benchmark_window) {
                Ok(window) => self.calculator.compute(&asset, &window, request.risk_free_rate_pct),
                Err(reason) => self.calculator.compute_without_benchmark(&asset, reason),
            },
            Err(reason) => self.calculator.compute_without_benchmark(&asset, reason.clone()),
        };
        log_unavailable(etf, &metrics);

        AssetComparison {
            name: etf.name.clone(),
            symbol: etf.symbol.clone(),
            span: Some(SeriesSpan::of(&asset)),
            final_value: simulate_final_value(request.initial_investment, &metrics.return_pct),
            metrics,
        }
    }
}

/// The slice of the benchmark used against `asset`.
fn benchmark_for<'a>(
    asset: &PriceSeries,
    benchmark: &'a PriceSeries,
    window: BenchmarkWindow,
) -> Result<Cow<'a, PriceSeries>, AnalyticsError> {
    match window {
        BenchmarkWindow::FullLookback => Ok(Cow::Borrowed(benchmark)),
        BenchmarkWindow::MatchAsset => benchmark
            .window(asset.first_date(), asset.last_date())
            .map(Cow::Owned)
            .map_err(AnalyticsError::from),
    }
}

/// Classifies a provider failure for the metrics it prevents.
pub fn unavailable_reason(err: &ApiError) -> AnalyticsError {
    match err {
        ApiError::MissingField { .. } | ApiError::InvalidData(_) | ApiError::Deserialization(_) => {
            AnalyticsError::MalformedInput(err.to_string())
        }
        _ => AnalyticsError::DataUnavailable(err.to_string()),
    }
}

fn log_unavailable(etf: &EtfEntry, metrics: &MetricResult) {
    for (metric, value) in metrics.metrics() {
        if let Err(reason) = value {
            tracing::debug!(symbol = %etf.symbol, metric, kind = ?reason.kind(), %reason, "Metric unavailable.");
        }
    }
}
