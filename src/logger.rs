use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
};

use tracing::error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    EnvFilter, fmt,
    fmt::{
        format::{DefaultFields, Format, Full},
        time::ChronoLocal,
    },
    prelude::*,
};

pub static DEFAULT_LOG_FILE: &str = "bot.log";
pub static LOG_FILE_ENV: &str = "BOT_LOG_FILE";
pub static DEFAULT_FILTER: &str = "info,starter_bot=debug";
static TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keeps the file writer alive. Dropping it flushes pending log lines.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

pub fn log_file_from_env() -> PathBuf {
    std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

type FileLayer<S> = fmt::Layer<S, DefaultFields, Format<Full, ChronoLocal>, NonBlocking>;

/// The optional plain-text file layer. `error` is set when the file could
/// not be opened, in which case there is no layer and no guard.
struct FileOutput<S> {
    layer: Option<FileLayer<S>>,
    guard: Option<WorkerGuard>,
    error: Option<io::Error>,
}

fn file_output<S>(log_file: &Path) -> FileOutput<S> {
    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
                .with_writer(writer)
                .with_ansi(false);
            FileOutput {
                layer: Some(layer),
                guard: Some(guard),
                error: None,
            }
        }
        Err(e) => FileOutput {
            layer: None,
            guard: None,
            error: Some(e),
        },
    }
}

/// Installs the global subscriber: coloured output on stdout plus a plain copy
/// in `log_file`. A log file that cannot be opened is reported and skipped.
pub fn init(log_file: &Path) -> anyhow::Result<LogGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = fmt::layer()
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
        .with_writer(io::stdout)
        .with_ansi(true);

    let FileOutput {
        layer: file_layer,
        guard,
        error: file_error,
    } = file_output(log_file);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    if let Some(e) = file_error {
        error!(
            "Failed to create file handler for logging at {}: {}",
            log_file.display(),
            e
        );
    }

    Ok(LogGuard { _file: guard })
}
