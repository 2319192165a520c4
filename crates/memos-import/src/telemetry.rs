//! Tracing subscriber setup.
//!
//! Environment variables:
//!   LOG_FORMAT  - "json" or "text" (default: "text")
//!   LOG_FILE    - path to log file (optional, enables daily-rolling file logging)
//!   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
//!   RUST_LOG    - standard env filter (default: [`DEFAULT_FILTER`])

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str =
    "import_memos=info,memos_import_core=info,memos_import_client=info";

/// Logging settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub format: String,
    pub file: Option<String>,
    pub ansi: Option<bool>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            file: std::env::var("LOG_FILE").ok().filter(|f| !f.is_empty()),
            ansi: std::env::var("LOG_ANSI").ok().map(|v| parse_flag(&v)),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Split a log file path into the directory and file name the rolling
/// appender expects.
fn split_log_path(path: &str) -> (&Path, &str) {
    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("import-memos.log");
    (dir, name)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = settings.file {
        let (dir, name) = split_log_path(path);
        let file_appender = tracing_appender::rolling::daily(dir, name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if settings.is_json() {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(settings.ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if settings.is_json() {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_target(false);
            if let Some(ansi) = settings.ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path("/var/log/import.log"),
            (Path::new("/var/log"), "import.log")
        );
        assert_eq!(split_log_path("import.log"), (Path::new("."), "import.log"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("false"));
    }

    #[test]
    fn test_json_format_is_case_insensitive() {
        let settings = LogSettings {
            format: "JSON".to_string(),
            file: None,
            ansi: None,
        };
        assert!(settings.is_json());
    }
}
