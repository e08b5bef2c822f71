//! Logging Infrastructure
//!
//! `LOG_LEVEL` (or `RUST_LOG`) drives an [`EnvFilter`]. With a log directory,
//! output goes to a daily rolling file instead of stdout; files older than
//! [`LOG_RETENTION_DAYS`] are removed by [`cleanup_old_logs`].

use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "salon_server=info,tower_http=info";
const LOG_FILE_PREFIX: &str = "salon-server";
pub const LOG_RETENTION_DAYS: i64 = 14;

fn env_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Initialize the logger with optional file output
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout");
    }

    subscriber.init();
}

/// Delete rolled log files (`salon-server.YYYY-MM-DD`) older than `keep_days`.
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path, keep_days: i64) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(keep_days);
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date_part) = name
            .strip_prefix(LOG_FILE_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_only_expired_rolled_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let today = chrono::Local::now().date_naive();
        let old = today - chrono::Duration::days(30);

        let expired = dir.join(format!("salon-server.{}", old.format("%Y-%m-%d")));
        let current = dir.join(format!("salon-server.{}", today.format("%Y-%m-%d")));
        let unrelated = dir.join("notes.txt");
        for p in [&expired, &current, &unrelated] {
            fs::write(p, "x").unwrap();
        }

        assert_eq!(cleanup_old_logs(dir, LOG_RETENTION_DAYS).unwrap(), 1);
        assert!(!expired.exists());
        assert!(current.exists());
        assert!(unrelated.exists());
    }
}
