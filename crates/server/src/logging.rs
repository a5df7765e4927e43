// Log line sinks: the fixed log file plus a console stream.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::Context;
use fxgate_core::Settings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing with two fmt layers: one appending to the configured
/// log file and one on the console. In stdio mode the console layer writes
/// to stderr, because stdout carries the JSON-RPC frames.
pub fn init(settings: &Settings, stdio: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("failed to open log file {}", settings.log_file.display()))?;
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file));

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if stdio {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }

    Ok(())
}
