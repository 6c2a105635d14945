//! Logger builder implementation
//!
//! - `format`: format layer creation

mod format;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::{LogError, LogResult};
use crate::writer;

/// Logger builder
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger's root span entered
///
/// Hold it for the life of the program; dropping it exits the span.
#[derive(Debug)]
pub struct LoggerGuard {
    root: Option<tracing::span::EnteredSpan>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Attach a `service` field to every event through a root span
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.config.service = Some(service.into());
        self
    }

    /// Build the subscriber without installing it
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Filter`] if the filter directive cannot be parsed.
    pub fn build_subscriber(&self) -> LogResult<impl Subscriber + Send + Sync + 'static> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::filter(&self.config.level, e))?;
        let writer = writer::make_writer(self.config.writer);
        let layer = format::make_layer(self.config.format, &self.config.display, writer);

        Ok(Registry::default().with(layer.with_filter(filter)))
    }

    /// Build and install the logger as the global default
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - A global subscriber is already set
    pub fn build(self) -> LogResult<LoggerGuard> {
        self.build_subscriber()?
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        let root = self
            .config
            .service
            .as_deref()
            .map(|service| tracing::info_span!("app", service).entered());

        Ok(LoggerGuard { root })
    }
}

impl LoggerGuard {
    /// Guard for a logger that was never installed
    #[must_use]
    pub fn noop() -> Self {
        Self { root: None }
    }

    /// Whether a root span is held
    #[must_use]
    pub fn has_root_span(&self) -> bool {
        self.root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::Format;

    #[rstest]
    #[case(Format::Pretty)]
    #[case(Format::Compact)]
    #[case(Format::Json)]
    fn every_format_builds(#[case] format: Format) {
        let config = Config {
            format,
            ..Config::test()
        };
        let subscriber = LoggerBuilder::from_config(config).build_subscriber().unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(format = %format, "format layer active");
        });
    }

    #[rstest]
    #[case("info,slotpool=trace")]
    #[case("warn")]
    #[case("slotpool::pool=debug")]
    fn valid_filters_accepted(#[case] level: &str) {
        let config = Config {
            level: level.to_string(),
            ..Config::test()
        };
        assert!(LoggerBuilder::from_config(config).build_subscriber().is_ok());
    }

    #[test]
    fn bad_filter_rejected() {
        let config = Config {
            level: "slotpool=loud".to_string(),
            ..Config::test()
        };
        let err = LoggerBuilder::from_config(config)
            .build_subscriber()
            .err()
            .unwrap();
        assert!(matches!(err, LogError::Filter { .. }));
        assert!(err.to_string().contains("slotpool=loud"));
    }

    #[test]
    fn service_is_recorded() {
        let builder = LoggerBuilder::default().with_service("stress");
        assert_eq!(builder.config.service.as_deref(), Some("stress"));
        assert!(!LoggerGuard::noop().has_root_span());
    }
}
