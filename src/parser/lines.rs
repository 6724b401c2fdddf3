//! Stateless predicates over a single trimmed line of schedule text.
//!
//! Classification is deliberately overlapping: `category_from_line` and
//! `is_class_series_boundary` both recognize "X Class Series (OVAL)" headers,
//! but only the latter may terminate a schedule block. Standalone category
//! words ("Oval") can occur inside wrapped track names, so the scanner must
//! never treat them as boundaries.

use std::sync::LazyLock;

use regex::Regex;

static PAGE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--\s*\d+\s+of\s+\d+\s*--$").unwrap());
static PAGE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,3}$").unwrap());
static TOC_SPACED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\.\s+){3,}\d*\s*$").unwrap());
static TOC_SOLID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{3,}\s*\d*\s*$").unwrap());
static DOT_LEADER_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.]*(?:\.\s*){3,}[\s\d.]*$").unwrap());
static CLASS_SERIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Class\s+Series\s+\(").unwrap());
static CATEGORY_BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*(OVAL|SPORTS\s+CAR|FORMULA\s+CAR|DIRT\s+OVAL|DIRT\s+ROAD|UNRANKED)\s*\)")
        .unwrap()
});
static SEASON_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{4}\s+Season\s*\d*").unwrap());
static WEEK_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Week\s+\d+").unwrap());
static WEEK_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Week\s+\d+\s+\(").unwrap());
static RACE_DT_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{4}-\d{2}-\d{2}").unwrap());
static RACE_DT_EMBEDDED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{4}-\d{2}-\d{2}\s+\d{1,2}:\d{2}\s+\d+x\)").unwrap());

const CATEGORIES: &[(&str, &str)] = &[
    ("OVAL", "Oval"),
    ("SPORTS CAR", "Sports Car"),
    ("FORMULA CAR", "Formula Car"),
    ("DIRT OVAL", "Dirt Oval"),
    ("DIRT ROAD", "Dirt Road"),
    ("UNRANKED", "Unranked"),
];

/// Page separator ("-- 3 of 12 --") or a standalone 1-3 digit page number.
/// Dropped during preprocessing, never seen downstream.
pub fn is_page_artifact(line: &str) -> bool {
    PAGE_SEPARATOR_RE.is_match(line) || PAGE_NUMBER_RE.is_match(line)
}

/// Table-of-contents line: a run of 3+ dot leaders (spaced or solid) with an
/// optional trailing page number. A structural veto: TOC lines are excluded
/// from series/week detection everywhere.
pub fn is_toc_line(line: &str) -> bool {
    TOC_SPACED_RE.is_match(line) || TOC_SOLID_RE.is_match(line)
}

/// Strip a trailing dot-leader artifact from a title or metadata value.
pub fn clean_dots(s: &str) -> String {
    DOT_LEADER_TAIL_RE.replace(s, "").trim().to_string()
}

/// "X Class Series (" header. Used ONLY as a series/week terminator; see the
/// module docs for why this is distinct from `category_from_line`.
pub fn is_class_series_boundary(line: &str) -> bool {
    CLASS_SERIES_RE.is_match(line)
}

/// Category from a "X Class Series (CATEGORY)" header or a standalone
/// category word. Returns the canonical display form; an unmapped bracketed
/// value comes back as-is.
pub fn category_from_line(line: &str) -> Option<String> {
    if let Some(caps) = CATEGORY_BRACKET_RE.captures(line) {
        return Some(canonical_category(&caps[1]));
    }
    let standalone = line.trim().to_uppercase();
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == standalone)
        .map(|(_, display)| display.to_string())
}

fn canonical_category(raw: &str) -> String {
    let key = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    CATEGORIES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Line contains "YYYY Season" with an optional season number.
pub fn has_season_tag(line: &str) -> bool {
    SEASON_TAG_RE.is_match(line)
}

/// Series title: a season tag that is not a TOC entry.
pub fn is_series_title(line: &str) -> bool {
    has_season_tag(line) && !is_toc_line(line)
}

/// Loose "Week N" prefix, used as a metadata boundary.
pub fn is_week_marker(line: &str) -> bool {
    WEEK_MARKER_RE.is_match(line)
}

/// Strict "Week N (" prefix that opens a schedule block.
pub fn is_week_start(line: &str) -> bool {
    WEEK_START_RE.is_match(line)
}

/// Line opens with "(YYYY-MM-DD" — start of a race datetime parenthetical.
pub fn starts_race_datetime(line: &str) -> bool {
    RACE_DT_OPEN_RE.is_match(line)
}

/// Line contains a full "(YYYY-MM-DD HH:MM Nx)" parenthetical anywhere.
pub fn has_embedded_race_datetime(line: &str) -> bool {
    RACE_DT_EMBEDDED_RE.is_match(line)
}
