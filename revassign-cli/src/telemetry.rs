//! Log subscriber construction
//!
//! The subscriber is returned as a [`Dispatch`] and attached to the
//! command future by the caller, so nothing here touches the global
//! default.

use revassign_core::config::LogSettings;
use tracing::Dispatch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the subscriber for one CLI invocation
///
/// `RUST_LOG` wins over both `--verbose` and the configured filter.
pub fn dispatch(settings: &LogSettings, verbose: bool) -> Dispatch {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter(env.as_deref(), settings, verbose));
    Dispatch::new(subscriber)
}

fn filter(env: Option<&str>, settings: &LogSettings, verbose: bool) -> EnvFilter {
    match env {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ if verbose => EnvFilter::new("debug"),
        _ => EnvFilter::new(&settings.filter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(filter: &str) -> LogSettings {
        LogSettings {
            filter: filter.to_string(),
        }
    }

    #[test]
    fn test_configured_filter() {
        let filter = filter(None, &settings("revassign_core=debug"), false);
        assert_eq!(filter.to_string(), "revassign_core=debug");
    }

    #[test]
    fn test_verbose_overrides_config() {
        assert_eq!(filter(None, &settings("warn"), true).to_string(), "debug");
    }

    #[test]
    fn test_env_wins() {
        assert_eq!(filter(Some("error"), &settings("warn"), true).to_string(), "error");
        assert_eq!(filter(Some("  "), &settings("warn"), false).to_string(), "warn");
    }

    #[test]
    fn test_dispatch_is_scoped() {
        let dispatch = dispatch(&settings("info"), false);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("scoped subscriber");
        });
    }
}
