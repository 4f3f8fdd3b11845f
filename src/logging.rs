//! Diagnostics on stderr through `tracing-subscriber`.
//!
//! Library crates log through `tracing` (binding engine) and `log`
//! (AWS plumbing); the `tracing-log` bridge installed by `try_init` folds
//! the latter into the same output.

use anyhow::{anyhow, Context as _};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "ECSCTL_LOG";
const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Filter directives from `--log-level`; wins over [`LOG_ENV`].
    pub level: Option<String>,
    pub format: LogFormat,
}

/// Resolve the filter: `--log-level`, then `$ECSCTL_LOG`, then `warn`.
pub fn filter(settings: &LogSettings, env_value: Option<String>) -> anyhow::Result<EnvFilter> {
    match (settings.level.as_deref(), env_value) {
        (Some(level), _) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid --log-level '{level}'")),
        (None, Some(value)) if !value.trim().is_empty() => EnvFilter::try_new(&value)
            .with_context(|| format!("invalid {LOG_ENV} '{value}'")),
        _ => Ok(EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(settings: &LogSettings) -> anyhow::Result<()> {
    let filter = filter(settings, std::env::var(LOG_ENV).ok())?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);
    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| anyhow!(e).context("failed to install log subscriber"))
}
