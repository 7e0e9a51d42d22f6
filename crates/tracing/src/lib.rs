//! Tracing management for loupe.
//!
//! Assembles a [`tracing_subscriber`] registry out of a stdout layer, an optional journald
//! layer and an optional rolling log file. The cli builds a [`LoupeTracer`] from its logging
//! flags and calls [`Tracer::init`] once at startup.

mod formatter;
mod layers;

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};
pub use tracing;
pub use tracing_subscriber;

use layers::Layers;
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration of a single output layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a new [`LayerInfo`].
    ///
    /// `default_directive` is applied when `RUST_LOG` is unset, `filters` is a comma separated
    /// list of extra directives, and `color` is `always`/`auto`/`never` (`None` disables ANSI).
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: "info".to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// Something that can install a global tracing subscriber.
pub trait Tracer {
    /// Installs the subscriber. The returned guard, if any, must be held for as long as
    /// file logs should be flushed.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

/// The tracer used by the loupe cli.
#[derive(Debug, Clone, Default)]
pub struct LoupeTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl LoupeTracer {
    /// Creates a tracer that only logs to stdout at `info`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Enables journald logging with the given filter.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Enables rolling file logs.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Tracer for LoupeTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse::<Directive>()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        if let Some(filter) = self.journald {
            layers.journald(&filter)?;
        }

        let file_guard = match self.file {
            Some((config, file_info)) => {
                Some(layers.file(config.format, &config.filters, file_info)?)
            }
            None => None,
        };

        // a subscriber may already be installed, e.g. in tests
        if let Err(e) = tracing_subscriber::registry().with(layers.into_inner()).try_init() {
            tracing::debug!("global subscriber not installed: {}", e);
        }
        Ok(file_guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_keeps_the_first_subscriber() {
        let stdout = LayerInfo::new(LogFormat::LogFmt, "debug".to_string(), String::new(), None);

        assert!(LoupeTracer::new().with_stdout(stdout.clone()).init().is_ok());
        assert!(LoupeTracer::new().with_stdout(stdout).init().is_ok());
    }
}
