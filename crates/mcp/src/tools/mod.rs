pub mod rates;
mod registry;

pub use rates::{
    AvailableCurrenciesTool, ConvertCurrencyTool, HistoricalRatesTool, TimeSeriesRatesTool,
    TodayRatesTool,
};
pub use registry::{
    json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry,
};
