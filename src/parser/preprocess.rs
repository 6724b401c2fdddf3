//! Raw text cleanup: pagination artifacts out, blank runs collapsed.
//!
//! No reordering and no line merging here — wrapped lines are reassembled
//! later by the metadata and week parsers, which have the context to do it.

use super::lines;

pub fn clean_lines(text: &str) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for line in text.lines() {
        if lines::is_page_artifact(line.trim()) {
            continue;
        }
        let line = line.trim_end();
        if line.is_empty() && cleaned.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        cleaned.push(line.to_string());
    }
    cleaned
}
