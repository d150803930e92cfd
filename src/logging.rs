use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Keeps the background log writer alive. Drop it before exiting so the
/// last records reach the file.
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Set up the run's two log destinations: everything down to DEBUG goes to
/// a timestamped file in the working directory, INFO and above also go to
/// the console. The file is appended to if a run lands on an existing name.
///
/// Returns the guard plus the log file path.
pub fn init(prefix: &str) -> Result<(LogGuard, PathBuf)> {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = PathBuf::from(format!("{}{}.log", prefix, timestamp));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    // Dial down the noise from the HTTP stack
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug,hyper=info,reqwest=info,rustls=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::DEBUG),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(LevelFilter::INFO),
        )
        .init();

    Ok((LogGuard { _file: guard }, path))
}
