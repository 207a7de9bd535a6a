use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Book – one reading-list entry
// ---------------------------------------------------------------------------

/// A reading-list entry. A title-only book is what a delimited "books" cell
/// produces; enumerated reading-list columns and JSON sources can add links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

impl Book {
    pub fn titled(title: impl Into<String>) -> Self {
        Book {
            title: title.into(),
            url: None,
            cover_image_url: None,
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

// ---------------------------------------------------------------------------
// CurriculumRow – one module assigned to a school / grade / curriculum
// ---------------------------------------------------------------------------

/// One instructional module for a school-grade-curriculum combination.
///
/// Date bounds are kept as the source wrote them and parsed by the filter,
/// so a malformed bound only ever weakens the row's interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumRow {
    pub district: String,
    pub school: String,
    pub grade: String,
    pub curriculum: String,
    pub module: String,
    pub essential_question: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub books: Vec<Book>,
    pub start_date: String,
    pub end_date: String,
}

impl CurriculumRow {
    /// True when no field carries data (missing headers produce these).
    pub fn is_empty(&self) -> bool {
        self.district.is_empty()
            && self.school.is_empty()
            && self.grade.is_empty()
            && self.curriculum.is_empty()
            && self.module.is_empty()
            && self.essential_question.is_empty()
            && self.genres.is_empty()
            && self.books.is_empty()
            && self.start_date.is_empty()
            && self.end_date.is_empty()
    }

    pub fn book_titles(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.title.as_str()).collect()
    }

    /// The essential question split into individual questions, each ending
    /// in `?`, duplicates removed.
    pub fn questions(&self) -> Vec<String> {
        let text = self
            .essential_question
            .replace(['\u{2018}', '\u{2019}'], "'")
            .replace(['\u{201c}', '\u{201d}'], "\"");
        let mut out: Vec<String> = Vec::new();
        for piece in text.split(['?', '\n', ';']) {
            let t = piece.trim();
            if t.is_empty() {
                continue;
            }
            let q = format!("{t}?");
            if !out.contains(&q) {
                out.push(q);
            }
        }
        out
    }

    /// Number at the front of the module label (`Module 3: …` → 3).
    pub fn module_number(&self) -> Option<u32> {
        let digits: String = self
            .module
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Directory – district → school reference set
// ---------------------------------------------------------------------------

/// One school listed in the school directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub district: String,
    pub school: String,
    #[serde(default)]
    pub curriculum: String,
    /// Canonical grade tokens the school serves.
    #[serde(default)]
    pub grades: Vec<String>,
}

/// The directory with a district index built once at load.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<DirectoryEntry>,
    by_district: BTreeMap<String, Vec<usize>>,
}

impl Directory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        let mut by_district: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, e) in entries.iter().enumerate() {
            by_district.entry(e.district.clone()).or_default().push(i);
        }
        Directory { entries, by_district }
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Schools listed under `district` (source order, may repeat).
    pub fn schools_in(&self, district: &str) -> Vec<&str> {
        self.by_district
            .get(district)
            .map(|ix| ix.iter().map(|&i| self.entries[i].school.as_str()).collect())
            .unwrap_or_default()
    }

    /// Grades served by a school, if the directory lists it.
    pub fn grades_of(&self, district: &str, school: &str) -> Option<&[String]> {
        let ix = self.by_district.get(district)?;
        ix.iter()
            .map(|&i| &self.entries[i])
            .find(|e| e.school == school)
            .map(|e| e.grades.as_slice())
    }
}

/// Expand every row that names a curriculum but no district or school into
/// one row per directory school running that curriculum and serving that
/// grade (a school with no grade list serves every grade).
///
/// Rows that already carry a district or school, and curriculum rows no
/// school matches, are kept as they are. Source order is preserved.
pub fn join_directory(rows: Vec<CurriculumRow>, directory: &Directory) -> Vec<CurriculumRow> {
    if directory.is_empty() {
        return rows;
    }
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if !row.district.is_empty() || !row.school.is_empty() || row.curriculum.is_empty() {
            out.push(row);
            continue;
        }
        let schools: Vec<&DirectoryEntry> = directory
            .entries()
            .iter()
            .filter(|e| e.curriculum.trim().eq_ignore_ascii_case(row.curriculum.trim()))
            .filter(|e| e.grades.is_empty() || row.grade.is_empty() || e.grades.contains(&row.grade))
            .collect();
        if schools.is_empty() {
            out.push(row);
            continue;
        }
        for entry in schools {
            out.push(CurriculumRow {
                district: entry.district.clone(),
                school: entry.school.clone(),
                ..row.clone()
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// ReferenceData – the immutable session snapshot
// ---------------------------------------------------------------------------

/// Rows plus directory for one session. Cheap to clone; replaced whole on
/// reload, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub rows: Arc<[CurriculumRow]>,
    pub directory: Arc<Directory>,
}

impl ReferenceData {
    /// Build the snapshot. Curriculum-level rows (no district and no school)
    /// are joined against the directory first, see [`join_directory`].
    pub fn new(rows: Vec<CurriculumRow>, directory: Vec<DirectoryEntry>) -> Self {
        let directory = Directory::new(directory);
        let rows = join_directory(rows, &directory);
        ReferenceData {
            rows: rows.into(),
            directory: Arc::new(directory),
        }
    }

    /// Number of curriculum rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_number_reads_leading_digits() {
        let mut r = CurriculumRow {
            module: "Module 12: Liberty!".into(),
            ..Default::default()
        };
        assert_eq!(r.module_number(), Some(12));
        r.module = "Unit A".into();
        assert_eq!(r.module_number(), None);
    }

    #[test]
    fn questions_split_and_dedup() {
        let r = CurriculumRow {
            essential_question: "What makes a hero? Why do we tell stories?\nWhat makes a hero".into(),
            ..Default::default()
        };
        assert_eq!(r.questions(), vec!["What makes a hero?", "Why do we tell stories?"]);
    }

    #[test]
    fn directory_index_by_district() {
        let dir = Directory::new(vec![
            DirectoryEntry {
                district: "1".into(),
                school: "A".into(),
                grades: vec!["K".into()],
                ..Default::default()
            },
            DirectoryEntry {
                district: "2".into(),
                school: "B".into(),
                ..Default::default()
            },
        ]);
        assert_eq!(dir.schools_in("1"), vec!["A"]);
        assert!(dir.schools_in("3").is_empty());
        assert_eq!(dir.grades_of("1", "A"), Some(&["K".to_string()][..]));
        assert_eq!(dir.grades_of("2", "A"), None);
    }

    #[test]
    fn curriculum_rows_join_to_serving_schools() {
        let entry = |district: &str, school: &str, curriculum: &str, grades: &[&str]| DirectoryEntry {
            district: district.into(),
            school: school.into(),
            curriculum: curriculum.into(),
            grades: grades.iter().map(|g| g.to_string()).collect(),
        };
        let directory = vec![
            entry("3", "P.S. 9", "Wit & Wisdom", &["K", "1", "2", "3", "4", "5"]),
            entry("3", "M.S. 54", "Wit & Wisdom", &["6", "7", "8"]),
            entry("5", "P.S. 36", "EL Education", &[]),
        ];
        let template = |curriculum: &str, grade: &str| CurriculumRow {
            curriculum: curriculum.into(),
            grade: grade.into(),
            module: "Module 1: The Sea".into(),
            ..Default::default()
        };
        let placed = CurriculumRow {
            district: "9".into(),
            school: "Elm".into(),
            ..template("Wit & Wisdom", "3")
        };
        let data = ReferenceData::new(
            vec![
                template("Wit & Wisdom", "3"),
                placed,
                template("EL Education", "7"),
                template("HMH Into Reading", "2"),
            ],
            directory,
        );
        let keys: Vec<(&str, &str, &str)> = data
            .rows
            .iter()
            .map(|r| (r.district.as_str(), r.school.as_str(), r.curriculum.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("3", "P.S. 9", "Wit & Wisdom"),
                ("9", "Elm", "Wit & Wisdom"),
                ("5", "P.S. 36", "EL Education"),
                ("", "", "HMH Into Reading"),
            ]
        );
        assert_eq!(data.rows[0].module, "Module 1: The Sea");
    }

    #[test]
    fn no_directory_leaves_rows_alone() {
        let rows = vec![CurriculumRow {
            curriculum: "Wit & Wisdom".into(),
            ..Default::default()
        }];
        assert_eq!(join_directory(rows.clone(), &Directory::default()), rows);
    }

    #[test]
    fn default_row_is_empty() {
        assert!(CurriculumRow::default().is_empty());
    }
}
