//! Decompose one accumulated week block into a `WeekRecord`.
//!
//! A block looks like:
//!
//! ```text
//! Week 1 (2025-12-16) Charlotte Motor Speedway - Oval
//! (2025-12-20 12:40 1x) 66°F/19°C, Rain chance None, Rolling
//! start, Cautions disabled, Qual scrutiny
//! - Permissive.
//! 15 laps
//! ```
//!
//! or with the track name wrapping onto a second line before the race
//! datetime parenthetical.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use regex::Regex;

use super::lines;
use crate::model::{slug, WeekRecord};

static WEEK_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Week\s+(\d+)\s+\((\d{4}-\d{2}-\d{2})\)\s*(.*)$").unwrap());
static RACE_DT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d{4}-\d{2}-\d{2})\s+(\d{1,2}:\d{2})\s+\d+x\)\s*(.*)").unwrap()
});
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.?\s*(\d+)\s+(laps?|mins?)\s*$").unwrap());
static TRAILING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.,]\s*$").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Parse one week block. Returns None for a block whose first line is not a
/// well-formed "Week N (YYYY-MM-DD) ..." header — malformed headers are
/// noise, not errors.
pub fn parse_week_block(block: &[String]) -> Option<WeekRecord> {
    let first = block.first()?.trim();
    let caps = WEEK_HEADER_RE.captures(first)?;
    let week: u32 = caps[1].parse().ok()?;
    let start = NaiveDate::parse_from_str(&caps[2], "%Y-%m-%d").ok()?;

    // Track name continuations run until a line that looks like the race
    // datetime parenthetical.
    let mut track_parts = vec![caps[3].trim().to_string()];
    let mut idx = 1;
    while idx < block.len() {
        let line = block[idx].trim();
        if lines::starts_race_datetime(line) || lines::has_embedded_race_datetime(line) {
            break;
        }
        track_parts.push(line.to_string());
        idx += 1;
    }
    let track = track_parts.join(" ").trim().to_string();

    // First matching parenthetical supplies the race datetime; trailing text
    // on the same line seeds the conditions. Lines matching neither form are
    // dropped.
    let mut race_date_time = None;
    let mut condition_parts: Vec<String> = Vec::new();
    while idx < block.len() {
        let line = block[idx].trim();
        idx += 1;
        if let Some(dt_caps) = RACE_DT_RE.captures(line) {
            race_date_time = combine_datetime(&dt_caps[1], &dt_caps[2]);
            let rest = dt_caps[3].trim();
            if !rest.is_empty() {
                condition_parts.push(rest.to_string());
            }
            break;
        }
    }

    for line in &block[idx..] {
        condition_parts.push(line.trim().to_string());
    }

    let mut conditions = condition_parts.join(" ").trim().to_string();

    let mut duration_mins = None;
    let mut duration_laps = None;
    if let Some(dur_caps) = DURATION_RE.captures(&conditions) {
        if let Ok(value) = dur_caps[1].parse::<u32>() {
            if dur_caps[2].to_lowercase().starts_with("lap") {
                duration_laps = Some(value);
            } else {
                duration_mins = Some(value);
            }
            let tail_start = dur_caps.get(0).unwrap().start();
            conditions.truncate(tail_start);
            conditions = TRAILING_PUNCT_RE.replace(conditions.trim(), "").trim().to_string();
        }
    }
    let conditions = WHITESPACE_RE.replace_all(&conditions, " ").trim().to_string();

    let start_date = start.and_time(NaiveTime::MIN).and_utc();
    let end_date = start_date + Duration::days(6);

    Some(WeekRecord {
        track_id: slug(if track.is_empty() { "unknown" } else { &track }),
        track: if track.is_empty() { "Unknown Track".to_string() } else { track },
        week,
        start_date,
        end_date,
        race_date_time,
        conditions: (!conditions.is_empty()).then_some(conditions),
        duration_mins,
        duration_laps,
    })
}

fn combine_datetime(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(block: &[&str]) -> Option<WeekRecord> {
        let block: Vec<String> = block.iter().map(|s| s.to_string()).collect();
        parse_week_block(&block)
    }

    #[test]
    fn simple_block_with_laps() {
        let week = parse(&[
            "Week 1 (2025-12-16) Daytona",
            "(2025-12-20 12:40 1x) sunny",
            "15 laps",
        ])
        .unwrap();
        assert_eq!(week.week, 1);
        assert_eq!(week.track, "Daytona");
        assert_eq!(week.track_id, "daytona");
        assert_eq!(
            week.race_date_time,
            Some(Utc.with_ymd_and_hms(2025, 12, 20, 12, 40, 0).unwrap())
        );
        assert_eq!(week.conditions.as_deref(), Some("sunny"));
        assert_eq!(week.duration_laps, Some(15));
        assert_eq!(week.duration_mins, None);
    }

    #[test]
    fn end_date_is_start_plus_six_days() {
        let week = parse(&["Week 4 (2026-01-06) Okayama"]).unwrap();
        assert_eq!(week.start_date, Utc.with_ymd_and_hms(2026, 1, 6, 0, 0, 0).unwrap());
        assert_eq!(week.end_date - week.start_date, Duration::days(6));
        assert_eq!(week.end_date, Utc.with_ymd_and_hms(2026, 1, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn wrapped_track_name() {
        let week = parse(&[
            "Week 8 (2026-02-03) Misano World Circuit Marco Simoncelli - Grand",
            "Prix",
            "(2026-04-01 12:00 1x)",
            "70°F/21°C, Rain chance None",
            "15 mins",
        ])
        .unwrap();
        assert_eq!(week.track, "Misano World Circuit Marco Simoncelli - Grand Prix");
        assert_eq!(week.conditions.as_deref(), Some("70°F/21°C, Rain chance None"));
        assert_eq!(week.duration_mins, Some(15));
        assert_eq!(week.duration_laps, None);
    }

    #[test]
    fn multi_line_conditions_collapse_whitespace() {
        let week = parse(&[
            "Week 2 (2025-12-23) Charlotte Motor Speedway - Oval",
            "(2025-12-27 12:40 1x) 66°F/19°C, Rain chance None, Rolling",
            "start, Cautions disabled, Qual scrutiny",
            "- Permissive.",
            "25 laps",
        ])
        .unwrap();
        assert_eq!(
            week.conditions.as_deref(),
            Some("66°F/19°C, Rain chance None, Rolling start, Cautions disabled, Qual scrutiny - Permissive")
        );
        assert_eq!(week.duration_laps, Some(25));
    }

    #[test]
    fn no_duration_token() {
        let week = parse(&[
            "Week 3 (2025-12-30) Watkins Glen",
            "(2026-01-03 14:00 2x) overcast",
        ])
        .unwrap();
        assert_eq!(week.conditions.as_deref(), Some("overcast"));
        assert_eq!(week.duration_mins, None);
        assert_eq!(week.duration_laps, None);
    }

    #[test]
    fn duration_only_on_datetime_line() {
        let week = parse(&["Week 1 (2025-09-02) Eldora Speedway", "(2025-09-05 20:00 1x) 30 laps"])
            .unwrap();
        assert_eq!(week.duration_laps, Some(30));
        assert_eq!(week.conditions, None);
    }

    #[test]
    fn header_only_block() {
        let week = parse(&["Week 5 (2026-01-13) Daytona Road Course"]).unwrap();
        assert_eq!(week.race_date_time, None);
        assert_eq!(week.conditions, None);
    }

    #[test]
    fn partial_parenthetical_before_datetime_is_dropped() {
        let week = parse(&[
            "Week 1 (2025-01-07) Sebring",
            "(2025-01-09) qualifying note",
            "(2025-01-11 10:00 1x) wet",
        ])
        .unwrap();
        assert_eq!(
            week.race_date_time,
            Some(Utc.with_ymd_and_hms(2025, 1, 11, 10, 0, 0).unwrap())
        );
        assert_eq!(week.conditions.as_deref(), Some("wet"));
    }

    #[test]
    fn empty_track_falls_back_to_unknown() {
        let week = parse(&["Week 9 (2026-02-10)"]).unwrap();
        assert_eq!(week.track, "Unknown Track");
        assert_eq!(week.track_id, "unknown");
    }

    #[test]
    fn malformed_header_is_dropped() {
        assert!(parse(&["Week one (2025-12-16) Daytona"]).is_none());
        assert!(parse(&["Weekly recap"]).is_none());
        assert!(parse(&[]).is_none());
    }

    #[test]
    fn impossible_date_is_dropped() {
        assert!(parse(&["Week 2 (2025-13-45) Nowhere"]).is_none());
    }
}
