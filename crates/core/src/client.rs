//! The rate gateway: a thin client for the Frankfurter API.
//!
//! Every operation is one HTTP GET, a 2xx check, and a JSON parse. The
//! upstream body is passed through as an opaque [`Value`] (key order
//! preserved) so callers see exactly what upstream returned; conversion is
//! the single operation that augments the response.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::Settings;
use crate::error::{FxError, FxResult};

const USER_AGENT: &str = concat!("fxgate/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sentinel accepted as `end_date` in time-series queries, meaning "latest
/// available date".
pub const LATEST_END_DATE: &str = "..";

/// Stateless client for the upstream rate API. Cheap to clone; all clones
/// share one connection pool.
#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    http: reqwest::Client,
    api_base: Url,
}

impl FrankfurterClient {
    pub fn new(settings: &Settings) -> FxResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: settings.api_base.clone(),
        })
    }

    /// List the currencies upstream knows about, as a code-to-name mapping.
    pub async fn currencies(&self) -> FxResult<Value> {
        info!("fetching available currencies");
        let value = self.fetch("available_currencies", "currencies").await?;
        let count = value.as_object().map_or(0, |map| map.len());
        info!(count, "fetched available currencies");
        Ok(value)
    }

    /// Today's rates for `base` against every quoted currency (or the
    /// `symbols` subset).
    pub async fn latest(&self, base: &str, symbols: Option<&str>) -> FxResult<Value> {
        info!(base, symbols, "fetching today's rates");
        let value = self.fetch("today_rates", &latest_path(base, symbols)).await?;
        info!(base, "fetched today's rates");
        Ok(value)
    }

    /// Convert `amount` from one currency to another at today's rate.
    ///
    /// When upstream quotes the target currency, the response gains
    /// `amount` and `converted_amount` (rounded to 2 decimals); otherwise
    /// the upstream body is returned untouched.
    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> FxResult<Value> {
        info!(from, to, amount, "converting currency");
        let mut data = self
            .fetch("convert_currency", &latest_path(from, Some(to)))
            .await?;

        let rate = data
            .get("rates")
            .and_then(|rates| rates.get(to))
            .and_then(Value::as_f64);
        if let (Some(rate), Some(object)) = (rate, data.as_object_mut()) {
            let converted = round2(amount * rate);
            object.insert("amount".to_string(), Value::from(amount));
            object.insert("converted_amount".to_string(), Value::from(converted));
            info!(from, to, amount, converted, "converted currency");
        }

        Ok(data)
    }

    /// Rates on a specific `YYYY-MM-DD` date. Dates are not validated
    /// locally; upstream rejects malformed ones.
    pub async fn historical(&self, date: &str, base: &str, symbols: Option<&str>) -> FxResult<Value> {
        info!(date, base, symbols, "fetching historical rates");
        let value = self
            .fetch("historical_rates", &historical_path(date, base, symbols))
            .await?;
        info!(date, "fetched historical rates");
        Ok(value)
    }

    /// Rates for every day between `start` and `end`. `end` may be
    /// [`LATEST_END_DATE`] to mean the latest available date.
    pub async fn time_series(
        &self,
        start: &str,
        end: &str,
        base: &str,
        symbols: Option<&str>,
    ) -> FxResult<Value> {
        info!(start, end, base, symbols, "fetching time series rates");
        let value = self
            .fetch("time_series_rates", &time_series_path(start, end, base, symbols))
            .await?;
        info!(start, end, "fetched time series rates");
        Ok(value)
    }

    async fn fetch(&self, operation: &'static str, path: &str) -> FxResult<Value> {
        match self.get_json(path).await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(operation, error = %err, "upstream request failed");
                Err(err)
            }
        }
    }

    async fn get_json(&self, path: &str) -> FxResult<Value> {
        let url = format!("{}/{}", self.api_base.as_str().trim_end_matches('/'), path);
        debug!(url = %url, "GET upstream");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FxError::from_response(status.as_u16(), &body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Request paths are built by pure functions so the exact wire format stays
// unit-testable without a live upstream.

pub fn latest_path(base: &str, symbols: Option<&str>) -> String {
    match symbols {
        Some(symbols) => format!("latest?base={base}&symbols={symbols}"),
        None => format!("latest?base={base}"),
    }
}

pub fn historical_path(date: &str, base: &str, symbols: Option<&str>) -> String {
    match symbols {
        Some(symbols) => format!("{date}?base={base}&symbols={symbols}"),
        None => format!("{date}?base={base}"),
    }
}

pub fn time_series_path(start: &str, end: &str, base: &str, symbols: Option<&str>) -> String {
    let end = if end == LATEST_END_DATE { "" } else { end };
    match symbols {
        Some(symbols) => format!("{start}..{end}?base={base}&symbols={symbols}"),
        None => format!("{start}..{end}?base={base}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_path_with_and_without_symbols() {
        assert_eq!(latest_path("USD", None), "latest?base=USD");
        assert_eq!(latest_path("EUR", Some("USD")), "latest?base=EUR&symbols=USD");
    }

    #[test]
    fn historical_path_matches_upstream_contract() {
        assert_eq!(
            historical_path("2024-01-15", "EUR", Some("USD,GBP")),
            "2024-01-15?base=EUR&symbols=USD,GBP"
        );
        assert_eq!(historical_path("2024-01-15", "EUR", None), "2024-01-15?base=EUR");
    }

    #[test]
    fn time_series_path_spans_two_dates() {
        assert_eq!(
            time_series_path("2024-01-01", "2024-02-01", "EUR", None),
            "2024-01-01..2024-02-01?base=EUR"
        );
        assert_eq!(
            time_series_path("2024-01-01", "2024-02-01", "EUR", Some("USD")),
            "2024-01-01..2024-02-01?base=EUR&symbols=USD"
        );
    }

    #[test]
    fn time_series_path_treats_dotdot_as_open_ended() {
        assert_eq!(
            time_series_path("2024-01-01", LATEST_END_DATE, "USD", None),
            "2024-01-01..?base=USD"
        );
    }

    #[test]
    fn round2_is_half_away_from_zero() {
        // 0.125 is exactly representable, so this really exercises the tie.
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.004), 0.0);
    }
}
