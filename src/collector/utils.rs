use std::{borrow::Borrow, cmp::Ordering, sync::OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::metadata::Post;

const UNTITLED: &str = "Untitled Post";

fn filename_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})").unwrap())
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^#[ \t]+(.+)$").unwrap())
}

/// Newest first.
pub(super) fn sort_post<T: Borrow<Post>>(a: &T, b: &T) -> Ordering {
    b.borrow().date.cmp(&a.borrow().date)
}

/// Title fallback for posts without a `title` attribute:
/// first `# heading`, then first non-blank line.
pub(super) fn extract_title(body: &str) -> String {
    if let Some(heading) = heading_pattern()
        .captures_iter(body)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()).trim())
        .find(|heading| !heading.is_empty())
    {
        return heading.to_string();
    }

    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Parses a `date` attribute. Offsets are dropped, keeping the written wall-clock time.
pub(super) fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    // jekyll style: 2024-03-05 10:00:00 +0100
    for format in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M %z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_local());
        }
    }
    // %.f also matches a missing fraction
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Date from a `YYYY-MM-DD` filename prefix, if it is a real calendar date.
pub(super) fn date_from_filename(filename: &str) -> Option<NaiveDateTime> {
    let caps = filename_date_pattern().captures(filename)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(NaiveTime::MIN))
}

pub(super) fn slug_from_filename(filename: &str) -> &str {
    let rest = match filename_date_pattern().find(filename) {
        Some(m) if filename[m.end()..].starts_with('-') => &filename[m.end() + 1..],
        _ => filename,
    };
    rest.strip_suffix(".md").unwrap_or(rest)
}

/// `<site>/<slug>-DD-MM-YYYY/`
pub(super) fn post_url(site_base: &str, slug: &str, date: &NaiveDateTime) -> String {
    format!("{}/{}-{}/", site_base, slug, date.format("%d-%m-%Y"))
}
