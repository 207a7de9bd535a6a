//! Grade tokens: canonical spelling, school-level span expansion, ordering.

use std::cmp::Ordering;

use super::options::natural_cmp;

/// Fold the common spellings of pre-kindergarten and kindergarten into
/// `PK` / `K`, and `03` style numbers into `3`. Anything else is returned
/// trimmed and otherwise untouched.
pub fn canonical_grade(raw: &str) -> String {
    let t = raw.trim();
    let upper = t.to_ascii_uppercase();
    match upper.as_str() {
        "K" | "KG" | "KDG" | "KINDER" | "KINDERGARTEN" => "K".to_string(),
        "PK" | "PRE-K" | "PREK" | "P K" | "PRE K" | "PRE-KINDERGARTEN" => "PK".to_string(),
        _ => match t.parse::<u32>() {
            Ok(n) => n.to_string(),
            Err(_) => t.to_string(),
        },
    }
}

/// Highest numbered grade on the ladder.
const TOP_GRADE: u32 = 12;

/// Position on the PK → 12 ladder; `None` for tokens off the ladder,
/// including numbers above 12.
fn rank(token: &str) -> Option<u32> {
    match token {
        "PK" => Some(0),
        "K" => Some(1),
        _ => token.parse::<u32>().ok().filter(|n| *n <= TOP_GRADE).map(|n| n + 2),
    }
}

fn from_rank(rank: u32) -> String {
    match rank {
        0 => "PK".to_string(),
        1 => "K".to_string(),
        n => (n - 2).to_string(),
    }
}

/// Order grades PK < K < 1 < … < 12, then anything else naturally.
pub fn grade_cmp(a: &str, b: &str) -> Ordering {
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => natural_cmp(a, b),
    }
}

/// Expand a "grades served" cell into canonical tokens.
///
/// Handles spans (`K-5`, `6–8`, `PK-2`), lists (`K, 1, 2`, `6/7/8`) and
/// space separated runs (`OK 1 2 3`, where `OK` is a common typo for K).
/// Output keeps first-seen order without duplicates.
pub fn expand_grade_span(cell: &str) -> Vec<String> {
    let txt = cell.trim().replace(['\u{2013}', '\u{2014}'], "-");
    let mut out: Vec<String> = Vec::new();

    let mut add = |tok: &str| {
        let mut t = canonical_grade(tok);
        if t.eq_ignore_ascii_case("OK") {
            t = "K".to_string();
        }
        if rank(&t).is_some() && !out.contains(&t) {
            out.push(t);
        }
    };

    for part in txt.split([',', ';', '/']).map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((a, b)) = part.split_once('-') {
            if let (Some(x), Some(y)) = (rank(&canonical_grade(a)), rank(&canonical_grade(b))) {
                let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
                for r in lo..=hi {
                    add(&from_rank(r));
                }
                continue;
            }
        }
        let subs: Vec<&str> = part.split_whitespace().collect();
        if subs.len() > 1 && canonical_grade(part) != "PK" {
            for sub in subs {
                add(sub);
            }
        } else {
            add(part);
        }
    }
    out
}
