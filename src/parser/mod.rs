pub mod lines;
pub mod metadata;
pub mod preprocess;
pub mod scanner;
pub mod week;

use crate::model::SeriesRecord;

/// Two-pass pipeline: raw text → cleaned lines → series records.
pub fn extract_series(text: &str) -> Vec<SeriesRecord> {
    let cleaned = preprocess::clean_lines(text);
    scanner::SeriesScanner::new(&cleaned).scan()
}

// ── Tests ──
