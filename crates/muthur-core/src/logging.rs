//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/muthur/logs/` because the terminal
/// belongs to the dashboard. Log level is controlled by the `MUTHUR_LOG`
/// environment variable.
///
/// # Examples
/// ```bash
/// MUTHUR_LOG=debug muthur
/// MUTHUR_LOG=muthur_hass=trace muthur
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "muthur.log");

    // Default to info, allow override via MUTHUR_LOG
    let env_filter = EnvFilter::try_from_env("MUTHUR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(
            "muthur=info,muthur_core=info,muthur_hass=info,muthur_app=info,muthur_tui=info,warn",
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("MU/TH/UR 6000 interface starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("muthur").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join("muthur.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_lives_in_muthur_dir() {
        let file = get_current_log_file().unwrap();
        assert!(file.ends_with("muthur/logs/muthur.log"));
    }
}
