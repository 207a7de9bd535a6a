use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::dates::{month_day_in, parse_bound, resolve_window, Bound};
use super::model::CurriculumRow;

// ---------------------------------------------------------------------------
// FilterSelection – what the user has picked
// ---------------------------------------------------------------------------

/// Current filter choices. `None` or an empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub point_date: Option<NaiveDate>,
    pub district: Option<String>,
    pub school: Option<String>,
    pub grade: Option<String>,
}

impl FilterSelection {
    pub fn is_unconstrained(&self) -> bool {
        self.point_date.is_none()
            && active(&self.district).is_none()
            && active(&self.school).is_none()
            && active(&self.grade).is_none()
    }
}

fn active(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Date interval of a row
// ---------------------------------------------------------------------------

/// The calendar interval a row covers, as seen from `point`.
///
/// Full-date bounds are used as is. Year-less bounds are placed relative to
/// the other bound when it has a year, otherwise relative to `point`.
/// Unparseable bounds come back as `None` (open on that side).
pub fn interval(row: &CurriculumRow, point: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let start = parse_bound(&row.start_date);
    let end = parse_bound(&row.end_date);

    match (start, end) {
        (Some(Bound::Day(s)), Some(Bound::Day(e))) => (Some(s), Some(e)),
        (Some(Bound::MonthDay { month: sm, day: sd }), Some(Bound::MonthDay { month: em, day: ed })) => {
            match resolve_window((sm, sd), (em, ed), point) {
                Some((s, e)) => (Some(s), Some(e)),
                None => (None, None),
            }
        }
        (Some(Bound::Day(s)), Some(Bound::MonthDay { month, day })) => {
            let e = month_day_in(s.year(), month, day)
                .and_then(|e| if e < s { month_day_in(s.year() + 1, month, day) } else { Some(e) });
            (Some(s), e)
        }
        (Some(Bound::MonthDay { month, day }), Some(Bound::Day(e))) => {
            let s = month_day_in(e.year(), month, day)
                .and_then(|s| if s > e { month_day_in(e.year() - 1, month, day) } else { Some(s) });
            (s, Some(e))
        }
        (s, e) => (place(s, point), place(e, point)),
    }
}

fn place(bound: Option<Bound>, point: NaiveDate) -> Option<NaiveDate> {
    match bound? {
        Bound::Day(d) => Some(d),
        Bound::MonthDay { month, day } => month_day_in(point.year(), month, day),
    }
}

/// Whether `point` falls inside the row's interval (both ends inclusive).
pub fn covers(row: &CurriculumRow, point: NaiveDate) -> bool {
    let (start, end) = interval(row, point);
    if start.is_some_and(|s| point < s) {
        return false;
    }
    if end.is_some_and(|e| point > e) {
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Predicate and search
// ---------------------------------------------------------------------------

/// A row passes when every active field of the selection passes.
pub fn matches(row: &CurriculumRow, selection: &FilterSelection) -> bool {
    if active(&selection.district).is_some_and(|d| row.district != d) {
        return false;
    }
    if active(&selection.school).is_some_and(|s| row.school != s) {
        return false;
    }
    if active(&selection.grade).is_some_and(|g| row.grade != g) {
        return false;
    }
    match selection.point_date {
        Some(point) => covers(row, point),
        None => true,
    }
}

/// Indices of the rows passing `selection`, in source order.
pub fn filtered_indices(rows: &[CurriculumRow], selection: &FilterSelection) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| matches(r, selection))
        .map(|(i, _)| i)
        .collect()
}

/// The rows passing `selection`, in source order.
pub fn search(rows: &[CurriculumRow], selection: &FilterSelection) -> Vec<CurriculumRow> {
    rows.iter().filter(|r| matches(r, selection)).cloned().collect()
}

/// Collapse overlapping matches to one row per
/// district + school + grade + curriculum.
///
/// The row with the latest start wins; a missing start loses to any present
/// one and ties keep the earlier row. Output indices stay in source order.
pub fn resolve_overlaps(rows: &[CurriculumRow], indices: &[usize], reference: NaiveDate) -> Vec<usize> {
    let mut best: BTreeMap<(&str, &str, &str, &str), (usize, Option<NaiveDate>)> = BTreeMap::new();

    for &i in indices {
        let r = &rows[i];
        let key = (r.district.as_str(), r.school.as_str(), r.grade.as_str(), r.curriculum.as_str());
        let start = interval(r, reference).0;
        let newer = best.get(&key).map_or(true, |(_, held)| start > *held);
        if newer {
            best.insert(key, (i, start));
        }
    }

    let mut keep: Vec<usize> = best.into_values().map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep
}

// ---------------------------------------------------------------------------
// Module navigation
// ---------------------------------------------------------------------------

/// One module of a curriculum + grade, for prior/next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    pub number: Option<u32>,
    pub label: String,
    pub start: String,
    pub end: String,
}

/// Distinct modules of `curriculum` at `grade`, ordered by module number
/// (unnumbered modules last, in source order).
pub fn modules_for(rows: &[CurriculumRow], curriculum: &str, grade: &str) -> Vec<ModuleSummary> {
    let mut out: Vec<ModuleSummary> = Vec::new();
    for r in rows.iter().filter(|r| r.curriculum == curriculum && r.grade == grade) {
        if r.module.is_empty() || out.iter().any(|m| m.label == r.module) {
            continue;
        }
        out.push(ModuleSummary {
            number: r.module_number(),
            label: r.module.clone(),
            start: r.start_date.clone(),
            end: r.end_date.clone(),
        });
    }
    out.sort_by_key(|m| (m.number.is_none(), m.number));
    out
}
