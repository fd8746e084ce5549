//! Logging - tracing subscriber for the CLI
//!
//! Filter comes from `RUST_LOG`; without it, this crate logs at `info` and
//! dependencies at `warn`. `BEECONNECT_LOG_JSON=1` switches to JSON lines.

use crate::core::chain::env;
use tracing_subscriber::{fmt, EnvFilter};

pub(crate) const DEFAULT_FILTER: &str = "warn,beeconnect=info";

pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let use_json = std::env::var(env::LOG_JSON)
        .map(|value| value == "1")
        .unwrap_or(false);

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = if use_json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.compact().with_target(false).try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
