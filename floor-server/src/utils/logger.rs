//! Logging Infrastructure
//!
//! Console logging (pretty for development, JSON for production) plus an
//! optional daily rotating file under `{log_dir}/app`, pruned after
//! [`LOG_RETENTION_DAYS`].

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Application log files older than this are deleted
pub const LOG_RETENTION_DAYS: i64 = 14;

const APP_LOG_PREFIX: &str = "app";

/// Whether `name` is a rotated app log from before `cutoff`
fn is_expired_log(name: &str, cutoff: chrono::NaiveDate) -> bool {
    name.strip_prefix("app.")
        .and_then(|date| chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .is_some_and(|date| date < cutoff)
}

/// Clean up old application log files
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    let cutoff = (chrono::Local::now() - chrono::Duration::days(LOG_RETENTION_DAYS)).date_naive();

    let app_log_dir = log_dir.join(APP_LOG_PREFIX);
    if !app_log_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && is_expired_log(name, cutoff)
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(())
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level / filter (e.g. "info", "floor_server=debug")
/// * `json_format` - JSON console output (production)
/// * `log_dir` - Optional directory for rotating file logs
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let app_log_dir = dir.join(APP_LOG_PREFIX);
            fs::create_dir_all(&app_log_dir)?;
            let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, APP_LOG_PREFIX);

            tokio::spawn(periodic_cleanup(dir.to_path_buf()));

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(app_log))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::warn!(error = %e, "Log cleanup failed");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}
