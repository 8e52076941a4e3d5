//! Writing rendered newsletters to disk.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

pub const BATCH_FILENAME: &str = "newsletter.html";
pub const GENERATE_FILENAME: &str = "newsletter_ui.html";

/// Write `html` to `{output_dir}/{filename}`, creating the directory first.
#[instrument(level = "info", skip(html), fields(bytes = html.len()))]
pub async fn write_newsletter(output_dir: &Path, filename: &str, html: &str) -> Result<PathBuf> {
    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(dir = %output_dir.display(), error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = output_dir.join(filename);
    fs::write(&path, html).await?;
    info!(path = %path.display(), "Wrote newsletter");
    Ok(path)
}

/// Write a download copy of `html` to an arbitrary path.
#[instrument(level = "info", skip(html), fields(bytes = html.len()))]
pub async fn save_copy(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, html).await?;
    info!(path = %path.display(), "Saved newsletter copy");
    Ok(())
}
