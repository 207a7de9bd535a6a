use std::io::Write;
use std::path::Path;

use super::model::CurriculumRow;

pub const EXPORT_HEADER: [&str; 10] = [
    "District",
    "School",
    "Grade",
    "Curriculum",
    "Module",
    "Essential Question",
    "Genres",
    "Books",
    "Start Date",
    "End Date",
];

/// Write `rows` as CSV with [`EXPORT_HEADER`]. List cells are joined with `"; "`.
/// Returns the number of data rows written.
pub fn write_csv<'a, W, I>(out: W, rows: I) -> csv::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a CurriculumRow>,
{
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(EXPORT_HEADER)?;
    let mut written = 0;
    for r in rows {
        let genres = r.genres.join("; ");
        let books = r.book_titles().join("; ");
        wtr.write_record([
            r.district.as_str(),
            r.school.as_str(),
            r.grade.as_str(),
            r.curriculum.as_str(),
            r.module.as_str(),
            r.essential_question.as_str(),
            genres.as_str(),
            books.as_str(),
            r.start_date.as_str(),
            r.end_date.as_str(),
        ])?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

pub fn export_file<'a, I>(path: &Path, rows: I) -> csv::Result<usize>
where
    I: IntoIterator<Item = &'a CurriculumRow>,
{
    let file = std::fs::File::create(path)?;
    let written = write_csv(file, rows)?;
    log::info!("Exported {written} rows to {}", path.display());
    Ok(written)
}
