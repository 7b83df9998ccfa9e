//! Display-date normalization. Statement exports disagree on date spelling
//! ("February 1, 2026", "2026-02-01", "1/2/26", sometimes "today" from a
//! manual entry), so everything is funneled into one canonical rendering,
//! `Mon D, YYYY`. Normalization never fails: input that resists every rule
//! is returned verbatim and sorts after real dates.

use chrono::{Datelike, Duration, Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Year a month-and-day-only input gets parked in before year correction.
const SENTINEL_YEAR: i32 = 2001;

const LONG_MONTHS: [(&str, &str); 11] = [
    ("january", "Jan"),
    ("february", "Feb"),
    ("march", "Mar"),
    ("april", "Apr"),
    ("june", "Jun"),
    ("july", "Jul"),
    ("august", "Aug"),
    ("september", "Sep"),
    ("october", "Oct"),
    ("november", "Nov"),
    ("december", "Dec"),
];

// All-numeric layouts are deliberately absent: chrono's %Y happily eats
// two-digit years, which would shadow the day-first swap heuristic. They
// are handled in parse_numeric instead.
const GENERIC_FORMATS: [&str; 5] = [
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%b %d, %y",
];

/// Normalize against the wall-clock date. See [`format_date_with`].
pub fn format_date(raw: &str) -> String {
    format_date_with(raw, Local::now().date_naive())
}

/// Normalize `raw` to `Mon D, YYYY`, resolving relative tokens against
/// `today`. Unparseable input is returned unchanged.
pub fn format_date_with(raw: &str, today: NaiveDate) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_string();
    }

    if trimmed.eq_ignore_ascii_case("today") {
        return render(today);
    }
    if trimmed.eq_ignore_ascii_case("yesterday") {
        return render(today - Duration::days(1));
    }

    let rewritten = shorten_months(trimmed);
    let parsed = parse_generic(&rewritten).or_else(|| parse_numeric(trimmed));
    match parsed {
        Some(date) => render(correct_year(date, trimmed, today)),
        None => raw.to_string(),
    }
}

/// Parse a canonical display date back into a sortable value. Verbatim
/// fallbacks yield `None` and are ordered after every real date by the
/// ledger sort.
pub fn sort_key(display: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(display.trim(), "%b %d, %Y").ok()
}

fn render(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Rewrite English long month names to their 3-letter forms so the generic
/// format list stays short.
fn shorten_months(s: &str) -> String {
    let mut out = s.to_string();
    for (long, short) in LONG_MONTHS {
        if let Some(range) = find_ignore_case(&out, long) {
            out.replace_range(range, short);
        }
    }
    out
}

/// Byte range of the first case-insensitive occurrence of `needle` (ASCII,
/// lowercase) in `haystack`. The match is located on the haystack's own
/// char boundaries; lowercasing the whole haystack first would shift byte
/// offsets whenever a character's length changes under case folding.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<std::ops::Range<usize>> {
    for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].chars();
        let mut len = 0;
        let matched = needle.chars().all(|n| match rest.next() {
            Some(h) if h.to_ascii_lowercase() == n => {
                len += h.len_utf8();
                true
            }
            _ => false,
        });
        if matched {
            return Some(start..start + len);
        }
    }
    None
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    for fmt in GENERIC_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    // Month and day with no year at all ("Feb 5"). Park it in the sentinel
    // year; correct_year moves it to the current one.
    NaiveDate::parse_from_str(&format!("{s} {SENTINEL_YEAR}"), "%b %d %Y").ok()
}

/// Slash/hyphen numeric fallback. `A/B/Y` is month-first unless the first
/// component exceeds 12, in which case the input is assumed day-first and
/// the two are swapped. Two-digit years get a `20` prefix.
fn parse_numeric(s: &str) -> Option<NaiveDate> {
    let sep = if s.contains('/') {
        '/'
    } else if s.contains('-') {
        '-'
    } else {
        return None;
    };

    let parts: Vec<&str> = s.split(sep).map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let nums: Vec<u32> = parts
        .iter()
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;

    if parts[0].len() == 4 {
        return NaiveDate::from_ymd_opt(nums[0] as i32, nums[1], nums[2]);
    }

    let (mut month, mut day) = (nums[0], nums[1]);
    if month > 12 {
        std::mem::swap(&mut month, &mut day);
    }
    let mut year = nums[2] as i32;
    if parts[2].len() <= 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A literal 4-digit year anywhere in the raw input wins over whatever the
/// parse produced. Absent one, an implausible parsed year (the sentinel, or
/// more than a year in the future) is replaced with the current year.
fn correct_year(date: NaiveDate, raw: &str, today: NaiveDate) -> NaiveDate {
    if let Some(literal) = year_literal(raw) {
        if literal != date.year() {
            return date.with_year(literal).unwrap_or(date);
        }
        return date;
    }
    if date.year() == SENTINEL_YEAR || date.year() > today.year() + 1 {
        return date.with_year(today.year()).unwrap_or(date);
    }
    date
}

fn year_literal(raw: &str) -> Option<i32> {
    static YEAR_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = YEAR_RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").ok());
    re.as_ref()?.find(raw)?.as_str().parse().ok()
}
