//! Diagnostics setup for the `lass` binary.
//!
//! Diagnostics go to stderr so stdout stays a clean JSON/text document.
//! Filter comes from `RUST_LOG`; default shows this crate's info events.

use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "LASS_LOG_FORMAT";
pub const DEFAULT_FILTER: &str = "lass_scoring=info,lass::leniency=info,warn";

/// Layout of diagnostic lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Format from `LASS_LOG_FORMAT`, falling back to compact on absent/invalid values.
pub fn log_format_from_env() -> LogFormat {
    std::env::var(ENV_LOG_FORMAT)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Install the global subscriber. Safe to call once per process.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let res = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}
