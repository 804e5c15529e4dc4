use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::domain::DTError;

const DEFAULT_LOG_FILTER: &str = "datatable=info";

pub enum LogSink<'a> {
    File(&'a Path),
    Stderr,
    /// The terminal is owned by the viewer.
    Off,
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(sink: LogSink) -> Result<(), DTError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = match sink {
        LogSink::File(path) => {
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .boxed(),
            )
        }
        LogSink::Stderr => Some(fmt::layer().with_writer(std::io::stderr).boxed()),
        LogSink::Off => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| DTError::LoggingFailed(e.to_string()))?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialized");
    Ok(())
}
