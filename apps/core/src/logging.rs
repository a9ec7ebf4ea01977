//! Tracing subscriber setup.

use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::LogFormat;

/// Builds the filter, falling back to `info` when the directive is invalid.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// `Pretty` writes compact human-readable lines; `Bunyan` writes one JSON
/// object per event, with span fields carried by `JsonStorageLayer`.
pub fn init(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = env_filter(level);

    match format {
        LogFormat::Pretty => {
            let subscriber = Registry::default().with(filter).with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .compact(),
            );
            set_global_default(subscriber)?;
        }
        LogFormat::Bunyan => {
            let formatting =
                BunyanFormattingLayer::new(env!("CARGO_PKG_NAME").to_string(), std::io::stdout);
            let subscriber = Registry::default()
                .with(filter)
                .with(JsonStorageLayer)
                .with(formatting);
            set_global_default(subscriber)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_falls_back() {
        assert_eq!(env_filter("d2d_core=notalevel").to_string(), "info");
        assert_eq!(env_filter("d2d_core=debug").to_string(), "d2d_core=debug");
    }
}
