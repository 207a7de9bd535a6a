use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::grades::grade_cmp;
use super::model::{CurriculumRow, Directory};

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Natural label ordering: runs of ASCII digits compare by value, other text
/// compares case-insensitively, and the raw strings break remaining ties so
/// the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let na = take_digits(&mut ai);
                let nb = take_digits(&mut bi);
                let ord = cmp_digit_runs(&na, &nb);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut s = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        s.push(c);
        it.next();
    }
    s
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

// ---------------------------------------------------------------------------
// Option lists
// ---------------------------------------------------------------------------

/// Distinct non-empty values in natural order.
pub fn distinct_sorted<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sorted_by(values, natural_cmp)
}

/// Distinct non-empty grade tokens, PK → 12 first.
pub fn distinct_grades<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sorted_by(values, grade_cmp)
}

fn sorted_by<I, S>(values: I, cmp: fn(&str, &str) -> Ordering) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: BTreeSet<String> = values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    let mut out: Vec<String> = set.into_iter().collect();
    out.sort_by(|a, b| cmp(a, b));
    out
}

/// Every district named by the rows or the directory.
pub fn districts(rows: &[CurriculumRow], directory: &Directory) -> Vec<String> {
    distinct_sorted(
        rows.iter()
            .map(|r| r.district.as_str())
            .chain(directory.entries().iter().map(|e| e.district.as_str())),
    )
}

/// Schools offered for `district`.
///
/// Precedence: the directory's list for that district when it has one, else
/// the schools the rows name under that district. With no district the union
/// of every directory school and every row school is offered.
pub fn schools_for(district: Option<&str>, rows: &[CurriculumRow], directory: &Directory) -> Vec<String> {
    match district.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => {
            let listed = directory.schools_in(d);
            if !listed.is_empty() {
                return distinct_sorted(listed);
            }
            distinct_sorted(rows.iter().filter(|r| r.district == d).map(|r| r.school.as_str()))
        }
        None => distinct_sorted(
            directory
                .entries()
                .iter()
                .map(|e| e.school.as_str())
                .chain(rows.iter().map(|r| r.school.as_str())),
        ),
    }
}

/// Grades offered for the chosen district + school.
///
/// When both are chosen and the directory lists the grades that school
/// serves, only those are offered; otherwise every grade found in the rows
/// and the directory.
pub fn grades_for(
    district: Option<&str>,
    school: Option<&str>,
    rows: &[CurriculumRow],
    directory: &Directory,
) -> Vec<String> {
    let district = district.map(str::trim).filter(|s| !s.is_empty());
    let school = school.map(str::trim).filter(|s| !s.is_empty());

    if let (Some(d), Some(s)) = (district, school) {
        if let Some(served) = directory.grades_of(d, s) {
            if !served.is_empty() {
                return distinct_grades(served);
            }
        }
    }

    distinct_grades(
        rows.iter()
            .map(|r| r.grade.as_str())
            .chain(directory.entries().iter().flat_map(|e| e.grades.iter().map(String::as_str))),
    )
}
