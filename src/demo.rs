use crate::util::ensure_dir;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub const SAMPLE_MARKDOWN: &str = include_str!("../assets/japanese_demo.md");

/// Writes the bundled Japanese sample document, creating parent directories.
pub fn write_sample(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        ensure_dir(dir)?;
    }
    std::fs::write(path, SAMPLE_MARKDOWN)
        .with_context(|| format!("writing sample markdown: {}", path.display()))?;
    info!("wrote sample markdown: {}", path.display());
    Ok(())
}
