use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

pub fn log_path() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("could not resolve cache directory")?;
    Ok(base.join("dirviz").join("dirviz.log"))
}

/// Sends tracing output to the log file; the terminal belongs to the UI.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory: {}", parent.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .try_init();

    Ok(path)
}
