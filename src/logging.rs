use crate::config::app::LogFormat;
use crate::error::StudyError;

/// Initialize structured logging with tracing.
/// Called once at startup; a second call reports an error instead of panicking.
pub fn init_logging(format: LogFormat) -> Result<(), StudyError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).compact())
            .try_init(),
    };

    installed.map_err(|e| StudyError::new(
        format!("Failed to set global tracing subscriber: {}", e),
        "startup"
    ))?;

    tracing::info!(format = ?format, "Structured logging initialized");
    Ok(())
}
