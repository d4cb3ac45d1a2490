use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name of the scored review dataset.
pub const DATASET_FILE_NAME: &str = "florida_with_sentiment.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.franchise-tracker/` and its `data/` subdirectory exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let tracker_dir = home.join(".franchise-tracker");
    std::fs::create_dir_all(tracker_dir.join("data"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map `--log-level` names (DEBUG, WARNING, CRITICAL, ...) to `tracing` directives.
fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Output goes to
/// stderr, or is appended to `log_file` without ANSI colors.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Dataset discovery ──────────────────────────────────────────────────────────

/// Locate the dataset file.
///
/// Checks the following in order and returns the first that exists:
/// 1. `explicit` (from `--dataset` or the last-used file)
/// 2. `./florida_with_sentiment.csv`
/// 3. `~/.franchise-tracker/data/florida_with_sentiment.csv`
pub fn discover_dataset_path(explicit: Option<&Path>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let home = dirs::home_dir();
    discover_dataset_path_in(explicit, cwd.as_deref(), home.as_deref())
}

fn discover_dataset_path_in(
    explicit: Option<&Path>,
    cwd: Option<&Path>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    // An explicit path is returned even when missing so the load reports it.
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidates = [
        cwd.map(|d| d.join(DATASET_FILE_NAME)),
        home.map(|h| h.join(".franchise-tracker").join("data").join(DATASET_FILE_NAME)),
    ];
    candidates.into_iter().flatten().find(|p| p.exists())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── level_directive ───────────────────────────────────────────────────────

    #[test]
    fn test_level_directive_cli_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("debug"), "debug");
        assert_eq!(level_directive("verbose"), "info");
    }

    // ── discover_dataset_path ─────────────────────────────────────────────────

    #[test]
    fn test_explicit_path_wins_even_if_missing() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(tmp.path().join(DATASET_FILE_NAME), "x").unwrap();
        let explicit = tmp.path().join("other.csv");

        let found = discover_dataset_path_in(Some(&explicit), Some(tmp.path()), None);
        assert_eq!(found, Some(explicit));
    }

    #[test]
    fn test_working_directory_before_home() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        let local = cwd.path().join(DATASET_FILE_NAME);
        std::fs::write(&local, "x").unwrap();
        let data_dir = home.path().join(".franchise-tracker").join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join(DATASET_FILE_NAME), "x").unwrap();

        let found = discover_dataset_path_in(None, Some(cwd.path()), Some(home.path()));
        assert_eq!(found, Some(local));
    }

    #[test]
    fn test_falls_back_to_home_data_dir() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        let data_dir = home.path().join(".franchise-tracker").join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        let in_home = data_dir.join(DATASET_FILE_NAME);
        std::fs::write(&in_home, "x").unwrap();

        let found = discover_dataset_path_in(None, Some(cwd.path()), Some(home.path()));
        assert_eq!(found, Some(in_home));
    }

    #[test]
    fn test_returns_none_when_absent() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        assert!(discover_dataset_path_in(None, Some(cwd.path()), Some(home.path())).is_none());
    }
}
