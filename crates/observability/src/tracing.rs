//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` wins when set; otherwise `level` (a filter directive such as
/// `info` or `ninjabot=debug,serenity=warn`) is used. `json` switches from
/// human-readable lines to one JSON object per event.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = if json {
        builder.json().with_target(false).try_init()
    } else {
        builder.with_target(true).try_init()
    };
}

/// Filter for the configured level, falling back to `info` when it does not parse.
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|err| {
        eprintln!("invalid log level {level:?} ({err}); using info");
        EnvFilter::new("info")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used_verbatim() {
        assert_eq!(default_filter("warn").to_string(), "warn");
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        assert_eq!(default_filter("ninjabot=loud").to_string(), "info");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init("info", false);
        init("debug", true);
        ::tracing::info!("still logging");
    }
}
