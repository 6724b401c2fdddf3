//! Top-level scan over the cleaned line sequence.
//!
//! Three explicit states; the sticky category is a scanner field, scoped to
//! one run, so repeated scans never see each other's state.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{lines, metadata, week};
use crate::model::{slug, SeriesRecord, WeekRecord};

static SEASON_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*-?\s*\d{4}\s+Season\s*\d*\s*$").unwrap());
static REGION_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+-\s+(Europe|North America|South America|America|Americas|Asia Pacific|Asia|Oceania|Australia|Africa|International|Australian Servers)\s*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    SeekingCategoryOrTitle,
    InSeriesMetadata,
    InSeriesSchedule,
}

struct PendingSeries {
    name: String,
    region: Option<String>,
    metadata: metadata::SeriesMetadata,
}

pub struct SeriesScanner<'a> {
    all: &'a [String],
    pos: usize,
    state: ScanState,
    current_category: Option<String>,
    pending: Option<PendingSeries>,
    records: Vec<SeriesRecord>,
}

impl<'a> SeriesScanner<'a> {
    pub fn new(all: &'a [String]) -> Self {
        SeriesScanner {
            all,
            pos: 0,
            state: ScanState::SeekingCategoryOrTitle,
            current_category: None,
            pending: None,
            records: Vec::new(),
        }
    }

    pub fn scan(mut self) -> Vec<SeriesRecord> {
        loop {
            match self.state {
                ScanState::SeekingCategoryOrTitle => {
                    if self.pos >= self.all.len() {
                        break;
                    }
                    self.seek_step();
                }
                ScanState::InSeriesMetadata => self.read_metadata(),
                ScanState::InSeriesSchedule => self.read_schedule(),
            }
        }
        self.records
    }

    fn seek_step(&mut self) {
        let line = self.all[self.pos].trim();
        self.pos += 1;

        if line.is_empty() || lines::is_toc_line(line) {
            return;
        }
        if let Some(category) = lines::category_from_line(line) {
            self.current_category = Some(category);
            return;
        }
        if lines::is_series_title(line) {
            self.pending = Some(open_series(line));
            self.state = ScanState::InSeriesMetadata;
        }
    }

    fn read_metadata(&mut self) {
        let meta = metadata::extract(self.all, &mut self.pos);
        if let Some(pending) = self.pending.as_mut() {
            pending.metadata = meta;
        }

        // Unrecognized metadata noise before the first week line.
        while self.pos < self.all.len() {
            let line = self.all[self.pos].trim();
            if line.is_empty()
                || lines::has_season_tag(line)
                || lines::is_week_marker(line)
                || lines::is_class_series_boundary(line)
                || lines::is_toc_line(line)
            {
                break;
            }
            self.pos += 1;
        }

        self.state = ScanState::InSeriesSchedule;
    }

    fn read_schedule(&mut self) {
        let mut schedule: Vec<WeekRecord> = Vec::new();
        let mut block: Vec<String> = Vec::new();

        while self.pos < self.all.len() {
            let line = self.all[self.pos].trim();
            if line.is_empty() {
                self.pos += 1;
                continue;
            }
            if lines::is_series_title(line) && !lines::is_week_marker(line) {
                break;
            }
            if lines::is_class_series_boundary(line) || lines::is_toc_line(line) {
                break;
            }
            if lines::is_week_start(line) {
                flush_block(&mut block, &mut schedule);
                block.push(line.to_string());
                self.pos += 1;
                continue;
            }
            if !block.is_empty() {
                block.push(line.to_string());
            }
            self.pos += 1;
        }
        flush_block(&mut block, &mut schedule);

        self.close_series(schedule);
        self.state = ScanState::SeekingCategoryOrTitle;
    }

    fn close_series(&mut self, schedule: Vec<WeekRecord>) {
        let Some(pending) = self.pending.take() else { return };
        if schedule.is_empty() {
            debug!(name = %pending.name, "discarding series with no parsed weeks");
            return;
        }

        let category = self
            .current_category
            .clone()
            .unwrap_or_else(|| "Uncategorized".to_string());
        let meta = pending.metadata;
        self.records.push(SeriesRecord {
            id: slug(&pending.name),
            name: pending.name,
            category,
            region: pending.region,
            car: meta.car,
            license_range: meta.license_range,
            race_frequency: meta.race_frequency,
            drops: meta.drops,
            schedule,
        });
    }
}

fn open_series(title: &str) -> PendingSeries {
    let raw = lines::clean_dots(title);
    let without_season = SEASON_SUFFIX_RE.replace(&raw, "").trim().to_string();
    let (name, region) = match REGION_SUFFIX_RE.captures(&without_season) {
        Some(caps) => {
            let suffix = caps.get(0).unwrap();
            (
                without_season[..suffix.start()].trim().to_string(),
                Some(caps[1].to_string()),
            )
        }
        None => (without_season, None),
    };
    PendingSeries {
        name,
        region,
        metadata: metadata::SeriesMetadata::default(),
    }
}

fn flush_block(block: &mut Vec<String>, schedule: &mut Vec<WeekRecord>) {
    if block.is_empty() {
        return;
    }
    if let Some(record) = week::parse_week_block(block) {
        schedule.push(record);
    }
    block.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn scan(input: &[&str]) -> Vec<SeriesRecord> {
        let all: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        SeriesScanner::new(&all).scan()
    }

    const OVAL_SERIES: &[&str] = &[
        "OVAL",
        "Some Series - 2025 Season 3",
        "Car X",
        "D 2.5 --> C 3.0",
        "Races every 30 minutes at :15 and :45",
        "Week 1 (2025-12-16) Daytona",
        "(2025-12-20 12:40 1x) sunny",
        "15 laps",
    ];

    #[test]
    fn end_to_end_single_series() {
        let series = scan(OVAL_SERIES);
        assert_eq!(series.len(), 1);
        let s = &series[0];
        assert_eq!(s.id, "some-series");
        assert_eq!(s.name, "Some Series");
        assert_eq!(s.category, "Oval");
        assert_eq!(s.region, None);
        assert_eq!(s.car.as_deref(), Some("Car X"));
        assert_eq!(s.license_range.as_deref(), Some("D 2.5 --> C 3.0"));
        assert_eq!(
            s.race_frequency.as_deref(),
            Some("Races every 30 minutes at :15 and :45")
        );
        assert_eq!(s.schedule.len(), 1);
        let w = &s.schedule[0];
        assert_eq!(w.week, 1);
        assert_eq!(w.track, "Daytona");
        assert_eq!(
            w.race_date_time,
            Some(Utc.with_ymd_and_hms(2025, 12, 20, 12, 40, 0).unwrap())
        );
        assert_eq!(w.duration_laps, Some(15));
        assert_eq!(w.conditions.as_deref(), Some("sunny"));
    }

    #[test]
    fn scan_is_idempotent() {
        assert_eq!(scan(OVAL_SERIES), scan(OVAL_SERIES));
    }

    #[test]
    fn sticky_category_spans_series() {
        let series = scan(&[
            "SPORTS CAR",
            "First Series - 2025 Season 1",
            "Week 1 (2025-03-04) Spa",
            "Second Series - 2025 Season 1",
            "Week 1 (2025-03-04) Monza",
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].category, "Sports Car");
        assert_eq!(series[1].category, "Sports Car");
    }

    #[test]
    fn category_defaults_to_uncategorized() {
        let series = scan(&["Lone Series - 2025 Season 2", "Week 1 (2025-06-10) Sebring"]);
        assert_eq!(series[0].category, "Uncategorized");
    }

    #[test]
    fn region_suffix_extracted_and_removed() {
        let series = scan(&[
            "Global Mazda MX-5 Cup - Europe - 2025 Season 4",
            "Week 1 (2025-09-02) Zandvoort",
        ]);
        assert_eq!(series[0].name, "Global Mazda MX-5 Cup");
        assert_eq!(series[0].region.as_deref(), Some("Europe"));
        assert_eq!(series[0].id, "global-mazda-mx-5-cup");
    }

    #[test]
    fn multi_word_region() {
        let series = scan(&[
            "Production Car Challenge - Asia Pacific - 2025 Season 4",
            "Week 1 (2025-09-02) Okayama",
        ]);
        assert_eq!(series[0].name, "Production Car Challenge");
        assert_eq!(series[0].region.as_deref(), Some("Asia Pacific"));
    }

    #[test]
    fn season_suffix_without_number_is_stripped() {
        let series = scan(&["Legacy Cup 2024 Season", "Week 1 (2024-03-05) Lime Rock"]);
        assert_eq!(series[0].name, "Legacy Cup");
    }

    #[test]
    fn zero_week_series_is_discarded() {
        let series = scan(&[
            "Phantom Series - 2025 Season 1",
            "Real Series - 2025 Season 1",
            "Week 1 (2025-03-04) Road Atlanta",
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Real Series");
    }

    #[test]
    fn toc_entries_never_open_a_series() {
        let series = scan(&[
            "Fake Series - 2025 Season 1 . . . . . . . 3",
            "Real Series - 2025 Season 1",
            "Week 1 (2025-03-04) Road Atlanta",
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Real Series");
    }

    #[test]
    fn class_series_header_terminates_schedule() {
        let series = scan(&[
            "OVAL",
            "Short Series - 2025 Season 1",
            "Week 1 (2025-03-04) Bristol",
            "D Class Series (SPORTS CAR)",
            "Week 2 (2025-03-11) Dover",
        ]);
        // Week 2 belongs to no series: the boundary ended the schedule and no
        // new title followed.
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].schedule.len(), 1);
    }

    #[test]
    fn standalone_category_word_does_not_terminate_schedule() {
        let series = scan(&[
            "Wrap Series - 2025 Season 1",
            "Week 1 (2025-03-04) Charlotte Motor Speedway -",
            "Oval",
            "(2025-03-08 12:00 1x) clear",
        ]);
        assert_eq!(series[0].schedule.len(), 1);
        assert_eq!(series[0].schedule[0].track, "Charlotte Motor Speedway - Oval");
    }

    #[test]
    fn malformed_week_block_does_not_corrupt_next() {
        let series = scan(&[
            "Sturdy Series - 2025 Season 1",
            "Week 1 (2025-13-45) Nowhere",
            "(2025-03-08 12:00 1x) lost",
            "Week 2 (2025-03-11) Dover",
            "(2025-03-15 12:00 1x) fine",
        ]);
        assert_eq!(series[0].schedule.len(), 1);
        let w = &series[0].schedule[0];
        assert_eq!(w.week, 2);
        assert_eq!(w.track, "Dover");
        assert_eq!(w.conditions.as_deref(), Some("fine"));
    }

    #[test]
    fn fresh_scanner_has_no_leaked_category() {
        let first = scan(&["DIRT OVAL", "A - 2025 Season 1", "Week 1 (2025-03-04) Eldora"]);
        assert_eq!(first[0].category, "Dirt Oval");
        let second = scan(&["B - 2025 Season 1", "Week 1 (2025-03-04) Limaland"]);
        assert_eq!(second[0].category, "Uncategorized");
    }
}
