//! Lenient calendar-day parsing for row bounds and filter input.
//!
//! Everything here works on whole days ([`NaiveDate`]); a time-of-day found
//! in the input is discarded. Anything unrecognised parses to `None`, which
//! the filter treats as "no bound".

use chrono::{Datelike, NaiveDate};

/// A bound as written in the source: either a full date or a year-less
/// month/day such as `9/8` (pacing calendars repeat every school year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Day(NaiveDate),
    MonthDay { month: u32, day: u32 },
}

const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%b %d, %Y", "%B %d, %Y"];

/// Parse a calendar day. Accepts ISO dates, timestamps with an ISO date
/// prefix (`2025-01-06T08:30:00Z`, `2025-01-06 15:00`) and US `M/D/YYYY`.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DAY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // Timestamp: keep the calendar part only.
    let head: String = s.chars().take_while(|c| *c != 'T' && *c != ' ').collect();
    if head.len() < s.len() {
        if let Ok(d) = NaiveDate::parse_from_str(&head, "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}

/// Parse a year-less `M/D`, `M-D`, `M.D` or `Sep 8` bound.
pub fn parse_month_day(raw: &str) -> Option<(u32, u32)> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(['/', '-', '.']).map(str::trim).collect();
    if parts.len() == 2 {
        let month: u32 = parts[0].parse().ok()?;
        let day: u32 = parts[1].parse().ok()?;
        // 2024 is a leap year, so Feb 29 validates.
        NaiveDate::from_ymd_opt(2024, month, day)?;
        return Some((month, day));
    }

    for fmt in ["%b %d %Y", "%B %d %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{s} 2024"), fmt) {
            return Some((d.month(), d.day()));
        }
    }
    None
}

/// Parse a row bound: a full day first, then a month/day.
pub fn parse_bound(raw: &str) -> Option<Bound> {
    if let Some(d) = parse_day(raw) {
        return Some(Bound::Day(d));
    }
    parse_month_day(raw).map(|(month, day)| Bound::MonthDay { month, day })
}

/// Place a month/day in `year`. Feb 29 falls back to Feb 28 off leap years.
pub fn month_day_in(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if month == 2 && day == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// Resolve a year-less window against the reference day.
///
/// If the window does not wrap the new year it sits in the reference year.
/// A wrapping window (e.g. `12/15 – 1/20`) is anchored on whichever side
/// contains the reference: if its start has already passed this year the end
/// moves to next year, otherwise the start moves to last year.
pub fn resolve_window(start: (u32, u32), end: (u32, u32), reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let year = reference.year();
    let s = month_day_in(year, start.0, start.1)?;
    let e = month_day_in(year, end.0, end.1)?;
    if e >= s {
        return Some((s, e));
    }
    if s <= reference {
        Some((s, month_day_in(year + 1, end.0, end.1)?))
    } else {
        Some((month_day_in(year - 1, start.0, start.1)?, e))
    }
}

/// Split a "date range" cell (`9/8 - 10/17`, `2025-01-06 – 2025-02-07`) into
/// its two halves. En and em dashes count as separators.
pub fn split_range(cell: &str) -> Option<(String, String)> {
    let txt = cell.trim().replace(['\u{2013}', '\u{2014}'], "-");
    if txt.is_empty() {
        return None;
    }

    for sep in [" - ", " to "] {
        if let Some((a, b)) = txt.split_once(sep) {
            let (a, b) = (a.trim(), b.trim());
            if !a.is_empty() && !b.is_empty() {
                return Some((a.to_string(), b.to_string()));
            }
        }
    }

    let parts: Vec<&str> = txt.split('-').map(str::trim).filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [a, b] => Some((a.to_string(), b.to_string())),
        _ => None,
    }
}
