use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "debug";

/// Log to `log_file` and to stderr, and route panics through the log.
///
/// An existing `log_file` is renamed to `<log_file>.1` first.
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    rotate(log_file)?;
    let file = File::create(log_file)
        .with_context(|| format!("failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("failed to install the log subscriber")?;

    std::panic::set_hook(Box::new(|info| {
        error!("uncaught panic: {info}");
    }));
    Ok(())
}

fn rotated_path(log_file: &Path) -> PathBuf {
    let mut name = log_file.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

fn rotate(log_file: &Path) -> anyhow::Result<()> {
    if log_file.is_file() {
        let backup = rotated_path(log_file);
        std::fs::rename(log_file, &backup).with_context(|| {
            format!(
                "failed to rotate log file {} to {}",
                log_file.display(),
                backup.display()
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotated_path_appends_suffix() {
        assert_eq!(
            rotated_path(Path::new("logs/pdfautohighlight.log")),
            PathBuf::from("logs/pdfautohighlight.log.1")
        );
    }

    #[test]
    fn rotate_moves_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        std::fs::write(&log, "previous run").unwrap();
        std::fs::write(dir.path().join("run.log.1"), "older run").unwrap();

        rotate(&log).unwrap();
        assert!(!log.exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("run.log.1")).unwrap(),
            "previous run"
        );
    }

    #[test]
    fn rotate_without_existing_log_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        rotate(&log).unwrap();
        assert!(!log.exists());
        assert!(!dir.path().join("run.log.1").exists());
    }
}
