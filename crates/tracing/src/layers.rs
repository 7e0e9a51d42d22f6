use std::path::PathBuf;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

use crate::formatter::LogFormat;

/// A worker guard returned by the file layer. Dropping it flushes and stops the writer.
pub type FileWorkerGuard = tracing_appender::non_blocking::WorkerGuard;

pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Noisy transport internals that are never interesting to a user.
const DEFAULT_ENV_FILTER_DIRECTIVES: [&str; 3] =
    ["hyper::proto::h1=off", "hyper_util=off", "alloy_transport_http=off"];

/// A collection of boxed layers, installed together into one registry.
#[derive(Default)]
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl std::fmt::Debug for Layers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layers").field("len", &self.inner.len()).finish()
    }
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        self.inner.push(format.apply(filter, color, None));
        Ok(())
    }

    pub(crate) fn journald(&mut self, filters: &str) -> eyre::Result<()> {
        let filter = build_env_filter(None, filters)?;
        let layer = tracing_journald::layer()?.with_filter(filter).boxed();
        self.inner.push(layer);
        Ok(())
    }

    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filters: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        let (writer, guard) = file_info.create_log_writer()?;
        let filter = build_env_filter(None, filters)?;
        self.inner.push(format.apply(filter, None, Some(writer)));
        Ok(guard)
    }
}

/// Where and how large rolling log files may grow.
#[derive(Debug, Clone)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
    max_size_bytes: u64,
    max_files: usize,
}

impl FileInfo {
    /// Creates a new [`FileInfo`] writing `loupe.log` under `dir`.
    pub fn new(dir: PathBuf, max_size_bytes: u64, max_files: usize) -> Self {
        Self { dir, file_name: "loupe.log".to_string(), max_size_bytes, max_files }
    }

    fn create_log_writer(&self) -> eyre::Result<(NonBlocking, FileWorkerGuard)> {
        std::fs::create_dir_all(&self.dir)?;
        let appender = BasicRollingFileAppender::new(
            self.dir.join(&self.file_name),
            RollingConditionBasic::new().max_size(self.max_size_bytes),
            self.max_files,
        )?;

        Ok(tracing_appender::non_blocking(appender))
    }
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, the default directive and the comma separated
/// `directives`.
fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = match default_directive {
        Some(default_directive) => {
            EnvFilter::builder().with_default_directive(default_directive).from_env_lossy()
        }
        None => EnvFilter::builder().from_env_lossy(),
    };

    DEFAULT_ENV_FILTER_DIRECTIVES
        .into_iter()
        .chain(directives.split(',').map(str::trim).filter(|d| !d.is_empty()))
        .try_fold(env_filter, |env_filter, directive| {
            Ok::<_, eyre::Report>(env_filter.add_directive(directive.parse()?))
        })
}
