//! File logging
//!
//! The terminal belongs to the editor, so logs go to `selah.log` in the
//! data directory.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "selah.log";

/// Environment variable that overrides the configured filter
const LOG_ENV: &str = "SELAH_LOG";

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(dir: &Path, configured: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter(std::env::var(LOG_ENV).ok().as_deref(), configured))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    Ok(guard)
}

/// Environment directive first, then the configured one, then `info`
fn filter(env: Option<&str>, configured: &str) -> EnvFilter {
    env.and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(filter(Some("selah=trace"), "warn").to_string(), "selah=trace");
        assert_eq!(filter(None, "warn").to_string(), "warn");
        assert_eq!(filter(Some("selah=loud"), "debug").to_string(), "debug");
        assert_eq!(filter(None, "selah=loud").to_string(), "info");
    }
}
