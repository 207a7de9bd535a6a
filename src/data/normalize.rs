//! Raw rows → [`CurriculumRow`] / [`DirectoryEntry`].
//!
//! Spreadsheets drift: the same column shows up as `Grade`, `Grade Level` or
//! `gradelevel` depending on who last edited the sheet. Every canonical field
//! has a fixed priority list of accepted spellings; headers are compared
//! after [`normalize_header`] and the first alias present wins.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use super::grades::{canonical_grade, expand_grade_span};
use super::model::{Book, CurriculumRow, DirectoryEntry};
use super::tabular;

// ---------------------------------------------------------------------------
// Canonical fields and their aliases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    District,
    School,
    Grade,
    Curriculum,
    Module,
    ModuleTitle,
    EssentialQuestion,
    Genres,
    Books,
    Start,
    End,
    DateRange,
    Date,
}

/// Priority-ordered header spellings per field (already in normalized form
/// or normalizable to it).
const ALIASES: &[(Field, &[&str])] = &[
    (Field::District, &["district", "district #", "district number", "district no", "district id", "districtid"]),
    (Field::School, &["school", "campus", "school name", "school name nyc doe"]),
    (Field::Grade, &["grade", "grade level", "gradelevel", "grades"]),
    (Field::Curriculum, &["curriculum", "program", "adoption", "literacy curriculum"]),
    (Field::Module, &["module", "unit", "module/unit", "unit/module", "module number", "modulenumber", "module #"]),
    (Field::ModuleTitle, &["module title", "moduletitle", "theme", "title"]),
    (
        Field::EssentialQuestion,
        &["essential question", "essentialquestion", "essential questions", "guiding question", "big question", "eq"],
    ),
    (Field::Genres, &["text genres", "textgenres", "genres", "genre"]),
    (
        Field::Books,
        &["book list", "books", "texts", "text set", "textset", "booklist", "reading list", "books json"],
    ),
    (
        Field::Start,
        &["start date", "startdate", "start", "from", "begin", "begin date", "beginning", "start md", "daterange start"],
    ),
    (
        Field::End,
        &["end date", "enddate", "end", "to", "through", "until", "finish", "finish date", "end md", "daterange end"],
    ),
    (Field::DateRange, &["date range", "daterange", "dates"]),
    (Field::Date, &["date", "as of", "on date"]),
];

const DIRECTORY_ALIASES: &[(Field, &[&str])] = &[
    (Field::District, &["district", "district #", "district number", "district no", "district id", "districtid"]),
    (Field::School, &["school", "school name", "school name nyc doe", "campus"]),
    (Field::Curriculum, &["curriculum", "literacy curriculum", "program"]),
    (Field::Grade, &["grades served", "grades", "grade", "grade level", "grade levels"]),
];

/// Enumerated reading-list columns are numbered from 1.
const MAX_READING_COLUMNS: usize = 20;

/// Known program names, matched case-insensitively.
const CURRICULA: &[&str] = &["HMH Into Reading", "Wit & Wisdom", "EL Education"];

/// Lowercase, collapse every run of non-alphanumerics into one space, trim.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut gap = false;
    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push(' ');
            }
            gap = false;
            out.push(c);
        } else {
            gap = true;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// HeaderMap – resolved column positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReadingColumns {
    title: usize,
    url: Option<usize>,
    cover: Option<usize>,
}

/// Column positions resolved from one header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: BTreeMap<Field, usize>,
    reading: Vec<ReadingColumns>,
}

impl HeaderMap {
    /// Resolve curriculum-row headers.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        let mut map = HeaderMap {
            columns: resolve_aliases(&normalized, ALIASES),
            reading: Vec::new(),
        };

        let find = |name: String| normalized.iter().position(|h| *h == name);
        for n in 1..=MAX_READING_COLUMNS {
            let Some(title) = find(format!("reading list {n}")) else {
                continue;
            };
            let url = find(format!("reading url {n}")).or_else(|| find(format!("reading list url {n}")));
            let cover = find(format!("cover image url {n}")).or_else(|| find(format!("coverimageurl {n}")));
            map.reading.push(ReadingColumns { title, url, cover });
        }
        map
    }

    fn resolve_directory<S: AsRef<str>>(headers: &[S]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        HeaderMap {
            columns: resolve_aliases(&normalized, DIRECTORY_ALIASES),
            reading: Vec::new(),
        }
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Fields with no matching header among `wanted`.
    pub fn missing(&self, wanted: &[Field]) -> Vec<Field> {
        wanted.iter().copied().filter(|f| !self.columns.contains_key(f)).collect()
    }

    fn cell<'a>(&self, row: &'a [String], field: Field) -> &'a str {
        self.position(field)
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    /// True when every mapped cell of `row` is blank.
    pub fn is_blank(&self, row: &[String]) -> bool {
        let blank = |i: usize| row.get(i).map_or(true, |c| c.trim().is_empty());
        self.columns.values().all(|&i| blank(i))
            && self.reading.iter().all(|r| {
                blank(r.title) && r.url.map_or(true, blank) && r.cover.map_or(true, blank)
            })
    }
}

fn resolve_aliases(normalized: &[String], table: &[(Field, &[&str])]) -> BTreeMap<Field, usize> {
    let mut columns = BTreeMap::new();
    for (field, aliases) in table {
        let hit = aliases.iter().find_map(|alias| {
            let alias = normalize_header(alias);
            normalized.iter().position(|h| *h == alias)
        });
        if let Some(i) = hit {
            columns.insert(*field, i);
        }
    }
    columns
}

// ---------------------------------------------------------------------------
// Curriculum rows
// ---------------------------------------------------------------------------

/// Normalize one row against its header row.
///
/// Headers that match no alias leave the field empty; when nothing matches
/// the result is an all-empty row rather than an error.
pub fn normalize<H: AsRef<str>>(headers: &[H], row: &[String]) -> CurriculumRow {
    normalize_with(&HeaderMap::resolve(headers), row)
}

/// Normalize with a pre-resolved [`HeaderMap`].
pub fn normalize_with(map: &HeaderMap, row: &[String]) -> CurriculumRow {
    let get = |f: Field| map.cell(row, f);

    let (start_date, end_date) = resolve_bounds(get(Field::Start), get(Field::End), get(Field::DateRange), get(Field::Date));

    let books = if map.reading.is_empty() {
        split_books(get(Field::Books))
    } else {
        enumerated_books(map, row)
    };

    CurriculumRow {
        district: get(Field::District).to_string(),
        school: get(Field::School).to_string(),
        grade: canonical_grade(get(Field::Grade)),
        curriculum: canonical_curriculum(get(Field::Curriculum)),
        module: module_label(get(Field::Module), get(Field::ModuleTitle)),
        essential_question: get(Field::EssentialQuestion).to_string(),
        genres: split_genres(get(Field::Genres)),
        books,
        start_date,
        end_date,
    }
}

/// Normalize a whole table whose first row is the header row. Blank rows
/// are dropped.
pub fn normalize_table(table: &[Vec<String>]) -> Vec<CurriculumRow> {
    let Some((headers, body)) = table.split_first() else {
        return Vec::new();
    };
    let map = HeaderMap::resolve(headers);

    let missing = map.missing(&[Field::District, Field::School, Field::Grade, Field::Curriculum]);
    if !missing.is_empty() {
        log::warn!("No header found for {missing:?}; those fields stay empty (headers: {headers:?})");
    }

    let mut out = Vec::with_capacity(body.len());
    for (i, row) in body.iter().enumerate() {
        if tabular::is_blank(row) || map.is_blank(row) {
            log::debug!("Skipping blank row {}", i + 2);
            continue;
        }
        out.push(normalize_with(&map, row));
    }
    out
}

/// Explicit bound precedence: dedicated start/end > "date range" cell >
/// single "date" column for both ends.
fn resolve_bounds(start: &str, end: &str, range: &str, single: &str) -> (String, String) {
    let mut start = start.to_string();
    let mut end = end.to_string();

    if start.is_empty() || end.is_empty() {
        if let Some((a, b)) = super::dates::split_range(range) {
            if start.is_empty() {
                start = a;
            }
            if end.is_empty() {
                end = b;
            }
        }
    }
    if start.is_empty() {
        start = single.to_string();
    }
    if end.is_empty() {
        end = single.to_string();
    }
    (start, end)
}

fn module_label(module: &str, title: &str) -> String {
    if module.is_empty() {
        return title.to_string();
    }
    if !title.is_empty() && module.chars().all(|c| c.is_ascii_digit()) {
        return format!("Module {module}: {title}");
    }
    module.to_string()
}

fn canonical_curriculum(raw: &str) -> String {
    CURRICULA
        .iter()
        .find(|c| c.eq_ignore_ascii_case(raw))
        .map(|c| c.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Split a "books" cell on `;` or `,`.
///
/// Lossy by construction: a title that itself contains a comma is split in
/// two.
pub fn split_books(cell: &str) -> Vec<Book> {
    cell.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Book::titled)
        .collect()
}

/// Split a genres cell on newlines or `;`.
pub fn split_genres(cell: &str) -> Vec<String> {
    cell.split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn enumerated_books(map: &HeaderMap, row: &[String]) -> Vec<Book> {
    let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");
    let mut books = Vec::new();
    for cols in &map.reading {
        let mut book = parse_book_cell(cell(cols.title));
        if book.title.is_empty() {
            continue;
        }
        if let Some(url) = cols.url.map(cell).filter(|u| !u.is_empty()) {
            book.url = Some(url.to_string());
        }
        if let Some(cover) = cols.cover.map(cell).filter(|c| !c.is_empty()) {
            book.cover_image_url = Some(cover.to_string());
        }
        books.push(book);
    }
    books
}

/// Read a reading-list title cell. Understands spreadsheet
/// `HYPERLINK("url","title")` formulas, `title | url`, and a bare URL
/// trailing the title.
pub fn parse_book_cell(cell: &str) -> Book {
    let s = cell.trim();
    if s.is_empty() {
        return Book::default();
    }

    if let Some((url, title)) = hyperlink_args(s) {
        let title = if title.is_empty() { url.clone() } else { title };
        return Book {
            title,
            url: Some(url),
            cover_image_url: None,
        };
    }

    if let Some((left, right)) = s.split_once(" | ") {
        let url = right.trim().to_string();
        let title = left.trim();
        return Book {
            title: if title.is_empty() { url.clone() } else { title.to_string() },
            url: Some(url),
            cover_image_url: None,
        };
    }

    if let Some(pos) = s.find("http://").or_else(|| s.find("https://")) {
        let url: String = s[pos..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .trim_end_matches([')', '.', ',', ';'])
            .to_string();
        let title = s[..pos].trim().trim_matches([':', '-']).trim();
        return Book {
            title: if title.is_empty() { url.clone() } else { title.to_string() },
            url: Some(url),
            cover_image_url: None,
        };
    }

    Book::titled(s)
}

/// `HYPERLINK("url", "title")` (either quote style, any case).
fn hyperlink_args(s: &str) -> Option<(String, String)> {
    let upper = s.to_ascii_uppercase();
    let start = upper.find("HYPERLINK(")? + "HYPERLINK(".len();
    let inner = s[start..].rsplit_once(')')?.0;

    let mut args = Vec::new();
    let mut rest = inner.trim();
    while let Some(q) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &rest[1..];
        let close = body.find(q)?;
        args.push(body[..close].trim().to_string());
        rest = body[close + 1..].trim_start().trim_start_matches(',').trim_start();
    }
    match args.as_slice() {
        [url, title] => Some((url.clone(), title.clone())),
        [url] => Some((url.clone(), String::new())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Normalize one JSON object using the same alias table as CSV headers.
pub fn normalize_record(obj: &Map<String, JsonValue>) -> CurriculumRow {
    let mut headers: Vec<String> = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut structured_books: Option<Vec<Book>> = None;
    let mut structured_genres: Option<Vec<String>> = None;

    for (key, val) in obj {
        match val {
            JsonValue::Object(inner) => {
                for (sub, v) in inner {
                    headers.push(format!("{key} {sub}"));
                    cells.push(json_text(v));
                }
            }
            JsonValue::Array(items) => {
                let field = field_for(key);
                if field == Some(Field::Books) && structured_books.is_none() {
                    structured_books = Some(json_books(items));
                } else if field == Some(Field::Genres) && structured_genres.is_none() {
                    structured_genres = Some(items.iter().map(json_text).filter(|s| !s.is_empty()).collect());
                }
                headers.push(key.clone());
                cells.push(items.iter().map(json_text).collect::<Vec<_>>().join("; "));
            }
            JsonValue::String(s) if field_for(key) == Some(Field::Books) && s.trim_start().starts_with('[') => {
                if let Ok(JsonValue::Array(items)) = serde_json::from_str::<JsonValue>(s) {
                    structured_books.get_or_insert_with(|| json_books(&items));
                }
                headers.push(key.clone());
                cells.push(String::new());
            }
            other => {
                headers.push(key.clone());
                cells.push(json_text(other));
            }
        }
    }

    let mut row = normalize(&headers, &cells);
    if let Some(books) = structured_books {
        row.books = books;
    }
    if let Some(genres) = structured_genres {
        row.genres = genres;
    }
    row
}

/// Accepts a flat array of row objects or an object wrapping one under
/// `results` / `rows` / `data`. Non-object items and empty rows are dropped.
pub fn normalize_records(root: &JsonValue) -> Vec<CurriculumRow> {
    record_list(root, &["results", "rows", "data"])
        .iter()
        .filter_map(JsonValue::as_object)
        .map(normalize_record)
        .filter(|r| !r.is_empty())
        .collect()
}

fn field_for(key: &str) -> Option<Field> {
    let k = normalize_header(key);
    ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| normalize_header(a) == k))
        .map(|(f, _)| *f)
}

fn record_list<'a>(root: &'a JsonValue, keys: &[&str]) -> &'a [JsonValue] {
    if let Some(arr) = root.as_array() {
        return arr;
    }
    keys.iter()
        .find_map(|k| root.get(*k).and_then(JsonValue::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        JsonValue::Object(o) => o
            .get("title")
            .map(json_text)
            .unwrap_or_else(|| val.to_string()),
        JsonValue::Array(items) => items.iter().map(json_text).collect::<Vec<_>>().join("; "),
    }
}

fn json_books(items: &[JsonValue]) -> Vec<Book> {
    items
        .iter()
        .filter_map(|item| match item {
            JsonValue::String(s) => Some(Book::titled(s.trim())),
            JsonValue::Object(o) => {
                let text = |keys: &[&str]| {
                    keys.iter()
                        .find_map(|k| o.get(*k).map(json_text))
                        .filter(|s| !s.is_empty())
                };
                Some(Book {
                    title: text(&["title"])?,
                    url: text(&["url", "link"]),
                    cover_image_url: text(&["coverImageUrl", "coverimageurl", "cover_image_url"]),
                })
            }
            _ => None,
        })
        .filter(|b| !b.title.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Directory rows
// ---------------------------------------------------------------------------

/// Normalize a school-directory table (first row = headers). Entries missing
/// a district or a school are dropped.
pub fn directory_table(table: &[Vec<String>]) -> Vec<DirectoryEntry> {
    let Some((headers, body)) = table.split_first() else {
        return Vec::new();
    };
    let map = HeaderMap::resolve_directory(headers);
    let missing = map.missing(&[Field::District, Field::School]);
    if !missing.is_empty() {
        log::warn!("Directory has no header for {missing:?} (headers: {headers:?})");
    }

    body.iter()
        .filter(|row| !tabular::is_blank(row))
        .filter_map(|row| directory_entry(&map, row))
        .collect()
}

/// One directory entry from resolved cells; `None` without a district or a
/// school.
fn directory_entry(map: &HeaderMap, row: &[String]) -> Option<DirectoryEntry> {
    let entry = DirectoryEntry {
        district: map.cell(row, Field::District).to_string(),
        school: map.cell(row, Field::School).to_string(),
        curriculum: canonical_curriculum(map.cell(row, Field::Curriculum)),
        grades: expand_grade_span(map.cell(row, Field::Grade)),
    };
    (!entry.district.is_empty() && !entry.school.is_empty()).then_some(entry)
}

/// Directory from JSON: an array of school objects or a meta object carrying
/// them under `schools`. Keys are matched with the same aliases as directory
/// table headers (`district_number`, `school_name`, `grades served`, ...).
pub fn directory_records(root: &JsonValue) -> Vec<DirectoryEntry> {
    record_list(root, &["schools", "items"])
        .iter()
        .filter_map(JsonValue::as_object)
        .filter_map(|o| {
            let headers: Vec<&str> = o.keys().map(String::as_str).collect();
            let cells: Vec<String> = o.values().map(json_text).collect();
            directory_entry(&HeaderMap::resolve_directory(&headers), &cells)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("  Grade   Level "), "grade level");
        assert_eq!(normalize_header("Module/Unit"), "module unit");
        assert_eq!(normalize_header("District #"), "district");
        assert_eq!(normalize_header("School Name - NYC DOE"), "school name nyc doe");
        assert_eq!(normalize_header("start_md"), "start md");
    }

    #[test]
    fn aliases_resolve_in_priority_order() {
        let headers = strings(&["Grade Level", "Campus", "District", "Book List", "Start", "End Date"]);
        let row = strings(&["4", "Roosevelt Elementary", "East Valley SD", "One Plastic Bag; Hatchet", "2025-03-03", "2025-04-04"]);
        let r = normalize(&headers, &row);
        assert_eq!(r.district, "East Valley SD");
        assert_eq!(r.school, "Roosevelt Elementary");
        assert_eq!(r.grade, "4");
        assert_eq!(r.book_titles(), vec!["One Plastic Bag", "Hatchet"]);
        assert_eq!(r.start_date, "2025-03-03");
        assert_eq!(r.end_date, "2025-04-04");
    }

    #[test]
    fn unmatched_headers_give_an_empty_row() {
        let r = normalize(&strings(&["foo", "bar"]), &strings(&["1", "2"]));
        assert!(r.is_empty());
    }

    #[test]
    fn single_date_column_fills_both_bounds() {
        let r = normalize(&strings(&["School", "Date"]), &strings(&["Oak", "2025-02-10"]));
        assert_eq!(r.start_date, "2025-02-10");
        assert_eq!(r.end_date, "2025-02-10");

        // dedicated column wins over the combined one
        let r = normalize(&strings(&["Start Date", "Date"]), &strings(&["2025-01-01", "2025-02-10"]));
        assert_eq!(r.start_date, "2025-01-01");
        assert_eq!(r.end_date, "2025-02-10");
    }

    #[test]
    fn date_range_cell_splits() {
        let r = normalize(&strings(&["Curriculum", "Date Range"]), &strings(&["Wit & Wisdom", "9/8 \u{2013} 10/17"]));
        assert_eq!(r.start_date, "9/8");
        assert_eq!(r.end_date, "10/17");
    }

    #[test]
    fn grade_and_curriculum_are_canonical() {
        let r = normalize(&strings(&["grade", "curriculum"]), &strings(&["k", "hmh into reading"]));
        assert_eq!(r.grade, "K");
        assert_eq!(r.curriculum, "HMH Into Reading");
    }

    #[test]
    fn numeric_module_picks_up_theme() {
        let r = normalize(&strings(&["Module", "Theme"]), &strings(&["2", "Liberty!"]));
        assert_eq!(r.module, "Module 2: Liberty!");
        let r = normalize(&strings(&["Module", "Theme"]), &strings(&["Module 2: Liberty!", "Liberty!"]));
        assert_eq!(r.module, "Module 2: Liberty!");
    }

    #[test]
    fn enumerated_reading_list_builds_linked_books() {
        let headers = strings(&["School", "Reading List 1", "Reading URL 1", "Cover Image URL 1", "Reading List 2"]);
        let row = strings(&[
            "Oak",
            "Fossils",
            "https://example.org/fossils",
            "https://example.org/fossils.png",
            "=HYPERLINK(\"https://example.org/dig\",\"The Dog That Dug for Dinosaurs\")",
        ]);
        let r = normalize(&headers, &row);
        assert_eq!(r.books.len(), 2);
        assert_eq!(r.books[0].url.as_deref(), Some("https://example.org/fossils"));
        assert_eq!(r.books[0].cover_image_url.as_deref(), Some("https://example.org/fossils.png"));
        assert_eq!(r.books[1].title, "The Dog That Dug for Dinosaurs");
        assert_eq!(r.books[1].url.as_deref(), Some("https://example.org/dig"));
    }

    #[test]
    fn book_cell_forms() {
        let b = parse_book_cell("Hatchet | https://example.org/h");
        assert_eq!((b.title.as_str(), b.url.as_deref()), ("Hatchet", Some("https://example.org/h")));
        let b = parse_book_cell("Owl Moon: https://example.org/owl.");
        assert_eq!((b.title.as_str(), b.url.as_deref()), ("Owl Moon", Some("https://example.org/owl")));
        assert_eq!(parse_book_cell("Peter Pan"), Book::titled("Peter Pan"));
    }

    #[test]
    fn table_drops_blank_rows() {
        let table = tabular::parse("District,School,Grade\nA,Maple,3\n,,\n\nB,Oak,5\n");
        let rows = normalize_table(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].school, "Oak");
    }

    #[test]
    fn json_records_coerce_and_keep_book_objects() {
        let root = json!({
            "results": [
                {
                    "district": 3,
                    "school": "P.S. 1",
                    "grade": 5,
                    "curriculum": "EL Education",
                    "module_number": "1",
                    "module_title": "Climate Science",
                    "essential_question": "How does climate change impact our world?",
                    "genres": ["Informational", "Poetry"],
                    "books": [{"title": "Fossil Fuel Frenzy", "coverImageUrl": "https://x/c.png"}, "Articles"],
                    "startDate": "2025-09-02",
                    "endDate": "2025-10-10"
                },
                "not a record",
                {}
            ]
        });
        let rows = normalize_records(&root);
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.district, "3");
        assert_eq!(r.grade, "5");
        assert_eq!(r.module, "Module 1: Climate Science");
        assert_eq!(r.genres, vec!["Informational", "Poetry"]);
        assert_eq!(r.books[0].cover_image_url.as_deref(), Some("https://x/c.png"));
        assert_eq!(r.books[1].title, "Articles");
        assert_eq!(r.start_date, "2025-09-02");
    }

    #[test]
    fn books_json_string_is_decoded() {
        let root = json!([{ "school": "Oak", "books_json": "[{\"title\":\"Hatchet\",\"url\":\"https://h\"}]" }]);
        let rows = normalize_records(&root);
        assert_eq!(rows[0].books, vec![Book { title: "Hatchet".into(), url: Some("https://h".into()), cover_image_url: None }]);
    }

    #[test]
    fn directory_rows_expand_grades() {
        let table = tabular::parse("District #,School Name - NYC DOE,Curriculum,Grades Served\n3,P.S. 9,wit & wisdom,K-2\n,Orphan,,\n");
        let dir = directory_table(&table);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir[0].district, "3");
        assert_eq!(dir[0].curriculum, "Wit & Wisdom");
        assert_eq!(dir[0].grades, vec!["K", "1", "2"]);
    }

    #[test]
    fn directory_json_accepts_header_aliases() {
        let root = json!([
            {"district_number": 12, "school_name": "P.S. 9", "Literacy Curriculum": "wit & wisdom", "grades_served": "K-2"},
            {"District #": "12", "Campus": "M.S. 54", "grade levels": ["6", "7"]}
        ]);
        let dir = directory_records(&root);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir[0].district, "12");
        assert_eq!(dir[0].school, "P.S. 9");
        assert_eq!(dir[0].curriculum, "Wit & Wisdom");
        assert_eq!(dir[0].grades, vec!["K", "1", "2"]);
        assert_eq!(dir[1].school, "M.S. 54");
        assert_eq!(dir[1].grades, vec!["6", "7"]);
    }

    #[test]
    fn directory_from_meta_json() {
        let root = json!({"districts": ["1"], "schools": [{"district": "1", "school": "A", "grades": ["k", "1"]}, {"district": "", "school": "B"}]});
        let dir = directory_records(&root);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir[0].grades, vec!["K", "1"]);
    }

    fn headers_for(order: &[usize], casing: &[bool]) -> Vec<String> {
        let base = ["District", "School", "Grade Level", "Curriculum", "Essential Question"];
        order
            .iter()
            .zip(casing)
            .map(|(&i, &upper)| if upper { base[i].to_uppercase() } else { base[i].to_lowercase() })
            .collect()
    }

    proptest! {
        #[test]
        fn column_position_and_case_do_not_matter(
            order in Just(vec![0usize, 1, 2, 3, 4]).prop_shuffle(),
            casing in prop::collection::vec(any::<bool>(), 5),
        ) {
            let values = ["Northside ISD", "Maple Elementary", "3", "HMH Into Reading", "Why?"];
            let headers = headers_for(&order, &casing);
            let row: Vec<String> = order.iter().map(|&i| values[i].to_string()).collect();
            let r = normalize(&headers, &row);
            prop_assert_eq!(r.district.as_str(), values[0]);
            prop_assert_eq!(r.school.as_str(), values[1]);
            prop_assert_eq!(r.grade.as_str(), values[2]);
            prop_assert_eq!(r.curriculum.as_str(), values[3]);
            prop_assert_eq!(r.essential_question.as_str(), values[4]);
        }
    }
}
