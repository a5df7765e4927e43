// Core types for fxgate: configuration, error taxonomy, and the
// Frankfurter rate gateway shared by every transport.

pub mod client;
pub mod config;
pub mod error;

pub use client::FrankfurterClient;
pub use config::{AuthSettings, Settings};
pub use error::{FxError, FxResult};
