//! Logging setup.

use tickflow_config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging. Explicit CLI flags win; the `[logging]` section of
/// the configuration is the fallback, and `RUST_LOG` overrides both.
pub fn setup_logging(cli_level: Option<&str>, cli_json: bool, config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level(cli_level, config)));

    if use_json(cli_json, config) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn effective_level<'a>(cli_level: Option<&'a str>, config: &'a LoggingConfig) -> &'a str {
    cli_level.unwrap_or(&config.level)
}

fn use_json(cli_json: bool, config: &LoggingConfig) -> bool {
    cli_json || config.format.eq_ignore_ascii_case("json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_cli_level_wins_over_config() {
        let config = config("warn", "pretty");
        assert_eq!(effective_level(Some("debug"), &config), "debug");
        assert_eq!(effective_level(None, &config), "warn");
    }

    #[test]
    fn test_config_format_enables_json() {
        assert!(use_json(false, &config("info", "json")));
        assert!(use_json(false, &config("info", "JSON")));
        assert!(!use_json(false, &config("info", "pretty")));
        assert!(use_json(true, &config("info", "pretty")));
    }
}
