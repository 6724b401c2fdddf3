//! Assemble and validate the final season document.

use anyhow::{bail, Result};
use chrono::{Datelike, Utc};
use regex::Regex;
use tracing::debug;

use crate::model::{SeasonDocument, SeasonMetadata};
use crate::parser;

/// Build the full document from raw extracted text. Season detection runs on
/// the raw text (the season tag usually appears on the cover page, before
/// any line survives cleaning).
pub fn build(text: &str) -> SeasonDocument {
    let series = parser::extract_series(text);
    let (season_year, season_number) = detect_season(text);
    let weeks = series.iter().map(|s| s.schedule.len()).max().unwrap_or(0);
    debug!(series = series.len(), weeks, "assembled season document");

    SeasonDocument {
        metadata: SeasonMetadata {
            season: format!("{} Season {}", season_year, season_number),
            season_number,
            season_year,
            last_updated: Utc::now(),
            weeks,
        },
        series,
    }
}

fn detect_season(text: &str) -> (i32, u32) {
    let season_re = Regex::new(r"(?i)(\d{4})\s+Season\s+(\d+)").unwrap();
    match season_re.captures(text) {
        Some(caps) => (
            caps[1].parse().unwrap_or_else(|_| Utc::now().year()),
            caps[2].parse().unwrap_or(1),
        ),
        None => (Utc::now().year(), 1),
    }
}

/// Structural invariants, enforced before anything is persisted. The parser
/// upholds these by construction; validation keeps the contract explicit so
/// an existing output file is only ever replaced by a fully valid document.
pub fn validate(doc: &SeasonDocument) -> Result<()> {
    for series in &doc.series {
        if series.id.is_empty() || series.name.is_empty() || series.category.is_empty() {
            bail!("invalid series: {:?}", series.name);
        }
        if series.schedule.is_empty() {
            bail!("series {:?} has an empty schedule", series.name);
        }
        for week in &series.schedule {
            if week.week == 0 || week.track.is_empty() {
                bail!("invalid week {} in {:?}", week.week, series.name);
            }
        }
    }
    Ok(())
}
