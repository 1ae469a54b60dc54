use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log file base path.
pub const LOG_ENV: &str = "CHATVIEW_LOG";

/// Initialize tracing with file output.
///
/// Does nothing unless `CHATVIEW_LOG` holds a file path. The file is created
/// as `{path}.{timestamp}.{pid}` so concurrent processes never share one log.
/// Returns whether the file subscriber was installed.
pub fn init_tracing() -> bool {
    let Some(log_path) = std::env::var(LOG_ENV).ok() else {
        return false;
    };

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = log_file_path(&log_path, timestamp, std::process::id());

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return false;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .try_init()
        .is_ok()
}

/// Initialize tracing on stderr, for interactive use.
pub fn init_stderr() {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(default_filter())
        .with(layer)
        .init();
}

fn log_file_path(base: &str, timestamp: u64, pid: u32) -> String {
    format!("{}.{}.{}", base, timestamp, pid)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_is_unique_per_process() {
        assert_eq!(log_file_path("/tmp/chatview.log", 1700000000, 42), "/tmp/chatview.log.1700000000.42");
        assert_ne!(log_file_path("a", 1, 1), log_file_path("a", 1, 2));
    }
}
