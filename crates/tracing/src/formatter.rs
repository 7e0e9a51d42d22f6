use crate::layers::BoxedLayer;
use clap::ValueEnum;
use std::{fmt, fmt::Display};
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Represents the logging format.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub enum LogFormat {
    /// Structured JSON, one object per event.
    #[value(name = "json")]
    Json,

    /// `key=value` pairs, suitable for log aggregators.
    #[value(name = "log-fmt")]
    LogFmt,

    /// Human readable output.
    #[value(name = "terminal")]
    Terminal,
}

impl LogFormat {
    /// Builds a layer for this format. `color` is ignored when writing to a file.
    pub(crate) fn apply(
        &self,
        filter: EnvFilter,
        color: Option<String>,
        file_writer: Option<NonBlocking>,
    ) -> BoxedLayer<Registry> {
        let ansi = match color {
            Some(color) if file_writer.is_none() => std::env::var("RUST_LOG_STYLE")
                .map(|val| val != "never")
                .unwrap_or(color != "never"),
            _ => false,
        };
        let target = std::env::var("RUST_LOG_TARGET").map(|val| val != "0").unwrap_or(false);

        match self {
            Self::Json => {
                let layer =
                    tracing_subscriber::fmt::layer().json().with_ansi(ansi).with_target(target);

                match file_writer {
                    Some(writer) => layer.with_writer(writer).with_filter(filter).boxed(),
                    None => layer.with_filter(filter).boxed(),
                }
            }
            Self::LogFmt => {
                let layer = tracing_logfmt::builder().layer();

                match file_writer {
                    Some(writer) => layer.with_writer(writer).with_filter(filter).boxed(),
                    None => layer.with_filter(filter).boxed(),
                }
            }
            Self::Terminal => {
                let layer = tracing_subscriber::fmt::layer().with_ansi(ansi).with_target(target);

                match file_writer {
                    Some(writer) => layer.with_writer(writer).with_filter(filter).boxed(),
                    None => layer.with_filter(filter).boxed(),
                }
            }
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::LogFmt => write!(f, "log-fmt"),
            Self::Terminal => write!(f, "terminal"),
        }
    }
}
