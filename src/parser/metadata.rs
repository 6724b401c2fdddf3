//! Ordered, all-optional metadata fields following a series title.
//!
//! The sequence is a fixed run of greedy lookahead decisions with no
//! backtracking: each slot is offered the current line at most once, in
//! order, and a slot that declines leaves the line for the next slot. A line
//! that could satisfy two slots goes to whichever is checked first.

use std::sync::LazyLock;

use regex::Regex;

use super::lines;

static RACES_EVERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Races?\s+every").unwrap());
static FREQUENCY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Races?\s").unwrap());
static TIMESLOTS_PER_WEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Timeslots?\s+Per\s+Week").unwrap());
static TIMESLOT_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+\s+Timeslots").unwrap());
static MIN_ENTRIES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Min entries").unwrap());
static DROPS_MARK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Drops:").unwrap());
static DROPS_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Drops:\s*(\d+)").unwrap());
static PENALTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Penalty|DQ|incident").unwrap());
static PENALTY_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Penalty").unwrap());
static NO_INCIDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)No incident").unwrap());

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeriesMetadata {
    pub car: Option<String>,
    pub license_range: Option<String>,
    pub race_frequency: Option<String>,
    pub drops: Option<u32>,
    /// Consumed so the cursor moves past it, but not part of the output.
    pub penalty_info: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Car,
    LicenseRange,
    RaceFrequency,
    Entries,
    Penalty,
}

impl Slot {
    fn next(self) -> Option<Slot> {
        match self {
            Slot::Car => Some(Slot::LicenseRange),
            Slot::LicenseRange => Some(Slot::RaceFrequency),
            Slot::RaceFrequency => Some(Slot::Entries),
            Slot::Entries => Some(Slot::Penalty),
            Slot::Penalty => None,
        }
    }
}

/// Walk the field slots over `all[*pos..]`, advancing the cursor past every
/// line a slot consumes. Stops at a blank line, series title, or week marker.
pub fn extract(all: &[String], pos: &mut usize) -> SeriesMetadata {
    let mut meta = SeriesMetadata::default();
    let mut slot = Slot::Car;

    loop {
        let Some(line) = candidate(all, *pos) else { break };

        match slot {
            Slot::Car => {
                if accepts_car(line) {
                    let mut parts = vec![line.to_string()];
                    *pos += 1;
                    // Comma-terminated fragments mean the car list wrapped.
                    while parts.last().is_some_and(|p| p.ends_with(','))
                        && candidate(all, *pos).is_some_and(accepts_car_continuation)
                    {
                        parts.push(all[*pos].trim().to_string());
                        *pos += 1;
                    }
                    meta.car = Some(lines::clean_dots(&parts.join(" ")));
                }
            }
            Slot::LicenseRange => {
                if contains_arrow(line) {
                    meta.license_range = Some(lines::clean_dots(line));
                    *pos += 1;
                }
            }
            Slot::RaceFrequency => {
                if FREQUENCY_RE.is_match(line) || TIMESLOTS_PER_WEEK_RE.is_match(line) {
                    meta.race_frequency = Some(lines::clean_dots(line));
                    *pos += 1;
                }
            }
            Slot::Entries => {
                if MIN_ENTRIES_RE.is_match(line) || DROPS_MARK_RE.is_match(line) {
                    meta.drops = DROPS_COUNT_RE
                        .captures(line)
                        .and_then(|caps| caps[1].parse().ok());
                    *pos += 1;
                }
            }
            Slot::Penalty => {
                if PENALTY_RE.is_match(line) {
                    meta.penalty_info = Some(lines::clean_dots(line));
                    *pos += 1;
                }
            }
        }

        let Some(next) = slot.next() else { break };
        slot = next;
    }

    meta
}

fn candidate(all: &[String], pos: usize) -> Option<&str> {
    let line = all.get(pos)?.trim();
    if line.is_empty() || lines::is_series_title(line) || lines::is_week_marker(line) {
        return None;
    }
    Some(line)
}

fn contains_arrow(line: &str) -> bool {
    line.contains("->") || line.contains('→')
}

fn accepts_car(line: &str) -> bool {
    !lines::is_toc_line(line)
        && lines::category_from_line(line).is_none()
        && !contains_arrow(line)
        && !RACES_EVERY_RE.is_match(line)
        && !TIMESLOT_COUNT_RE.is_match(line)
        && !MIN_ENTRIES_RE.is_match(line)
        && !PENALTY_WORD_RE.is_match(line)
        && !NO_INCIDENT_RE.is_match(line)
}

fn accepts_car_continuation(line: &str) -> bool {
    !contains_arrow(line)
        && !RACES_EVERY_RE.is_match(line)
        && !TIMESLOT_COUNT_RE.is_match(line)
        && !MIN_ENTRIES_RE.is_match(line)
}
