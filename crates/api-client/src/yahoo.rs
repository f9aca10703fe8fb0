use crate::error::ApiError;
use crate::responses::ChartResponse;
use crate::SeriesProvider;
use async_trait::async_trait;
use configuration::ProviderSettings;
use core_types::{Period, PriceSeries};
use std::time::Duration;

/// How many leading rows of a download are echoed at debug level.
const PREVIEW_ROWS: usize = 5;

/// A `SeriesProvider` backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl YahooClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
            retry_backoff: Duration::from_millis(settings.retry_backoff_ms),
        })
    }

    /// A single request, without retries.
    async fn fetch_once(&self, symbol: &str, period: Period) -> Result<PriceSeries, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("interval", "1d"),
                ("range", period.code()),
                ("includePrePost", "false"),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_server_error() || status.as_u16() == 429 {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        // Unknown symbols come back as 404 with a regular chart error payload.
        match serde_json::from_str::<ChartResponse>(&text) {
            Ok(chart) => chart.into_price_series(symbol),
            Err(e) if status.is_success() => Err(ApiError::Deserialization(e.to_string())),
            Err(_) => Err(ApiError::Http {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

#[async_trait]
impl SeriesProvider for YahooClient {
    async fn fetch_series(&self, symbol: &str, period: Period) -> Result<PriceSeries, ApiError> {
        let mut attempt = 0u32;
        loop {
            match self.fetch_once(symbol, period).await {
                Ok(series) => {
                    tracing::info!(symbol, %period, points = series.len(), "Downloaded price series.");
                    for point in series.points().iter().take(PREVIEW_ROWS) {
                        tracing::debug!(symbol, date = %point.date, close = %point.close, "Price row.");
                    }
                    return Ok(series);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff * attempt;
                    tracing::warn!(
                        symbol,
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "Transient provider failure, retrying in {:?}.",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
