use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final output document: season metadata plus every series that survived
/// extraction. Assembled once per run, immutable after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDocument {
    pub metadata: SeasonMetadata,
    pub series: Vec<SeriesRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonMetadata {
    /// Display string, e.g. "2025 Season 4".
    pub season: String,
    pub season_number: u32,
    pub season_year: i32,
    pub last_updated: DateTime<Utc>,
    /// Max week count across all series (0 when no series parsed).
    pub weeks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drops: Option<u32>,
    pub schedule: Vec<WeekRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRecord {
    pub week: u32,
    pub track: String,
    pub track_id: String,
    pub start_date: DateTime<Utc>,
    /// Always start_date + 6 days; a week is a fixed 7-day span.
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_laps: Option<u32>,
}

/// Lower-case hyphen slug: non-alphanumeric runs collapse to one hyphen,
/// no leading or trailing hyphen.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    out
}
