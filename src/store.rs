//! Output persistence: backup-before-overwrite, then an atomic replace.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::model::SeasonDocument;

/// Persist the document as pretty-printed JSON. An existing destination is
/// first copied to a timestamped backup in the same directory; the new
/// content lands via temp file + rename so the destination is never left
/// half-written. Returns the number of bytes written.
pub fn save(doc: &SeasonDocument, dest: &Path) -> Result<usize> {
    if let Some(dir) = dest.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        }
    }

    if dest.exists() {
        let backup = backup_path(dest);
        fs::copy(dest, &backup)
            .with_context(|| format!("failed to back up {}", dest.display()))?;
        info!("backed up previous output to {}", backup.display());
    }

    let json = serde_json::to_string_pretty(doc).context("failed to serialize document")?;
    let tmp = dest.with_extension("json.tmp");
    fs::write(&tmp, &json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, dest)
        .with_context(|| format!("failed to replace {}", dest.display()))?;

    Ok(json.len())
}

fn backup_path(dest: &Path) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dest.with_file_name(format!("{}.backup-{}.json", stem, Utc::now().timestamp_millis()))
}
