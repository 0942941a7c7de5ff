//! Diagnostic logging setup.
//!
//! Log lines go to stderr so reports on stdout stay machine-readable.
//! Verbosity comes from the `[logging]` section of the settings file; a
//! `RUST_LOG` value in the environment replaces the configured levels
//! wholesale:
//!
//! ```bash
//! RUST_LOG=nooa::rules=trace nooa check .
//! ```

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

/// Wall-clock timestamps with millisecond precision. The date is included
/// so long CI runs stay unambiguous across midnight.
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber for this process. Later calls are no-ops,
/// so library consumers and tests may call this freely.
pub fn init_with_config(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_timer(LocalClock)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Install the global subscriber at the default verbosity (`warn`).
pub fn init() {
    init_with_config(&LoggingConfig::default());
}

/// `RUST_LOG` verbatim when it is set and parseable, the configured
/// levels otherwise.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config))
}

/// The configured default level, plus one directive per
/// `[logging.modules]` entry. Entries that do not parse as directives are
/// dropped with a note rather than poisoning the whole filter.
fn config_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::new(&config.default);
    for (module, level) in &config.modules {
        match format!("{module}={level}").parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("ignoring log level '{level}' for module '{module}': {e}"),
        }
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_warn() {
        let filter = config_filter(&LoggingConfig::default()).to_string();
        assert_eq!(filter, "warn");
    }

    #[test]
    fn test_module_levels_become_directives() {
        let mut config = LoggingConfig::default();
        config
            .modules
            .insert("nooa::rules".to_string(), "debug".to_string());

        let filter = config_filter(&config).to_string();
        assert!(filter.contains("warn"));
        assert!(filter.contains("nooa::rules=debug"));
    }

    #[test]
    fn test_unparseable_module_level_is_dropped() {
        let mut config = LoggingConfig::default();
        config
            .modules
            .insert("nooa::grammar".to_string(), "loud".to_string());

        let filter = config_filter(&config).to_string();
        assert!(!filter.contains("nooa::grammar"));
    }
}
