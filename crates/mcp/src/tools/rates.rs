// Currency rate tools, each a thin adapter over one gateway call.

use crate::protocol::{CallToolResult, ToolContent, ToolSchema};
use crate::tools::{json_schema_number, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use fxgate_core::FrankfurterClient;
use serde::Deserialize;

fn default_amount() -> f64 {
    1.0
}

fn default_base() -> String {
    "EUR".to_string()
}

/// Render a pass-through upstream value as a text content block.
fn json_result(data: &serde_json::Value) -> Result<CallToolResult> {
    Ok(CallToolResult {
        content: vec![ToolContent::text(serde_json::to_string_pretty(data)?)],
        is_error: None,
    })
}

/// Lists the currencies the upstream API quotes, as code-to-name pairs.
pub struct AvailableCurrenciesTool {
    gateway: FrankfurterClient,
}

impl AvailableCurrenciesTool {
    pub fn new(gateway: FrankfurterClient) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Tool for AvailableCurrenciesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "available_currencies".to_string(),
            description: "List the currencies available from the Frankfurter API as of today, \
                          as currency code to name pairs"
                .to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let data = self.gateway.currencies().await?;
        json_result(&data)
    }
}

#[derive(Debug, Deserialize)]
struct ConvertCurrencyArgs {
    from_code: String,
    to_code: String,
    #[serde(default = "default_amount")]
    amount: f64,
}

/// Converts an amount between two currencies at today's rate.
pub struct ConvertCurrencyTool {
    gateway: FrankfurterClient,
}

impl ConvertCurrencyTool {
    pub fn new(gateway: FrankfurterClient) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Tool for ConvertCurrencyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "convert_currency".to_string(),
            description: "Convert an amount from one currency to another at today's rate. \
                          The response includes the computed converted_amount"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "from_code": json_schema_string("From currency code, e.g. USD, EUR, INR"),
                    "to_code": json_schema_string("To currency code, e.g. USD, EUR, INR"),
                    "amount": json_schema_number("Amount to convert (default: 1.0)"),
                }),
                vec!["from_code", "to_code"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ConvertCurrencyArgs = serde_json::from_value(arguments)
            .context("invalid arguments for convert_currency")?;
        let data = self
            .gateway
            .convert(&args.from_code, &args.to_code, args.amount)
            .await?;
        json_result(&data)
    }
}

#[derive(Debug, Deserialize)]
struct TodayRatesArgs {
    code: String,
}

/// Current rates for every currency relative to the given base.
pub struct TodayRatesTool {
    gateway: FrankfurterClient,
}

impl TodayRatesTool {
    pub fn new(gateway: FrankfurterClient) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Tool for TodayRatesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "today_rates".to_string(),
            description: "Retrieve today's exchange rates for all currencies relative to the \
                          given base currency code"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "code": json_schema_string("Base currency code, e.g. USD, EUR, INR"),
                }),
                vec!["code"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: TodayRatesArgs =
            serde_json::from_value(arguments).context("invalid arguments for today_rates")?;
        let data = self.gateway.latest(&args.code, None).await?;
        json_result(&data)
    }
}

#[derive(Debug, Deserialize)]
struct HistoricalRatesArgs {
    date: String,
    #[serde(default = "default_base")]
    base: String,
    symbols: Option<String>,
}

/// Rates on a specific past date.
pub struct HistoricalRatesTool {
    gateway: FrankfurterClient,
}

impl HistoricalRatesTool {
    pub fn new(gateway: FrankfurterClient) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Tool for HistoricalRatesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "historical_rates".to_string(),
            description: "Retrieve exchange rates for a specific date in YYYY-MM-DD format, \
                          optionally filtered to a comma-separated list of currency codes"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "date": json_schema_string("Date in YYYY-MM-DD format, e.g. 2024-01-15"),
                    "base": json_schema_string("Base currency code (default: EUR)"),
                    "symbols": json_schema_string(
                        "Comma-separated currency codes to filter (optional)"
                    ),
                }),
                vec!["date"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: HistoricalRatesArgs =
            serde_json::from_value(arguments).context("invalid arguments for historical_rates")?;
        let data = self
            .gateway
            .historical(&args.date, &args.base, args.symbols.as_deref())
            .await?;
        json_result(&data)
    }
}

#[derive(Debug, Deserialize)]
struct TimeSeriesRatesArgs {
    start_date: String,
    end_date: String,
    #[serde(default = "default_base")]
    base: String,
    symbols: Option<String>,
}

/// Rates for every day in a period. `end_date` may be ".." for "up to the
/// latest available date".
pub struct TimeSeriesRatesTool {
    gateway: FrankfurterClient,
}

impl TimeSeriesRatesTool {
    pub fn new(gateway: FrankfurterClient) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl Tool for TimeSeriesRatesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "time_series_rates".to_string(),
            description: "Retrieve exchange rates over a period, one entry per day, \
                          optionally filtered to a comma-separated list of currency codes"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "start_date": json_schema_string("Start date in YYYY-MM-DD format"),
                    "end_date": json_schema_string(
                        "End date in YYYY-MM-DD format, or '..' for the latest available date"
                    ),
                    "base": json_schema_string("Base currency code (default: EUR)"),
                    "symbols": json_schema_string(
                        "Comma-separated currency codes to filter (optional)"
                    ),
                }),
                vec!["start_date", "end_date"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: TimeSeriesRatesArgs =
            serde_json::from_value(arguments).context("invalid arguments for time_series_rates")?;
        let data = self
            .gateway
            .time_series(
                &args.start_date,
                &args.end_date,
                &args.base,
                args.symbols.as_deref(),
            )
            .await?;
        json_result(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_args_default_amount_to_one() {
        let args: ConvertCurrencyArgs = serde_json::from_value(serde_json::json!({
            "from_code": "USD",
            "to_code": "EUR"
        }))
        .unwrap();
        assert_eq!(args.amount, 1.0);
    }

    #[test]
    fn series_args_default_base_to_eur() {
        let args: TimeSeriesRatesArgs = serde_json::from_value(serde_json::json!({
            "start_date": "2024-01-01",
            "end_date": ".."
        }))
        .unwrap();
        assert_eq!(args.base, "EUR");
        assert!(args.symbols.is_none());
    }

    #[test]
    fn required_args_are_enforced() {
        let result: Result<TodayRatesArgs, _> =
            serde_json::from_value(serde_json::json!({}));
        assert!(result.is_err());
    }
}
