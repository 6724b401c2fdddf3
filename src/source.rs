//! Input text acquisition. The PDF-to-text step happens upstream; this side
//! only consumes its output as an opaque line source.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

pub fn read_text(input: &Path) -> Result<String> {
    if !input.exists() {
        bail!("file not found: {}", input.display());
    }
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    debug!(chars = text.len(), "read input text");
    Ok(text)
}

/// Keep an unmodified copy of the extracted text next to the input for
/// inspection. Failure here never aborts the run.
pub fn write_debug_artifact(input: &Path, text: &str) {
    let path = debug_artifact_path(input);
    match fs::write(&path, text) {
        Ok(()) => debug!("debug text saved to {}", path.display()),
        Err(err) => warn!("could not write debug text to {}: {}", path.display(), err),
    }
}

fn debug_artifact_path(input: &Path) -> PathBuf {
    input.with_extension("debug.txt")
}
