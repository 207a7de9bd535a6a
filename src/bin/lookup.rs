//! Headless lookup over the same reference data as the desktop app.
//!
//! ```text
//! lookup --date 2025-01-15 --district "Northside ISD" --grade 3
//! lookup --source-file pacing.csv --list schools --district 12
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;

use pacing_guide::config::{AppConfig, SourceConfig};
use pacing_guide::data::dates::parse_day;
use pacing_guide::data::export::write_csv;
use pacing_guide::data::loader::load_reference;
use pacing_guide::state::AppState;

#[derive(Parser)]
#[command(
    name = "lookup",
    version,
    about = "Find the curriculum modules taught on a date",
    long_about = "Find the curriculum modules taught on a date.\n\n\
                  Data comes from the configured source (pacing-guide.toml or \
                  $PACING_GUIDE_CONFIG), a local export given with --source-file, \
                  or the bundled sample."
)]
struct Cli {
    /// Config file (default: $PACING_GUIDE_CONFIG, then ./pacing-guide.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read rows from a local .csv or .json export instead of the configured source.
    #[arg(long = "source-file", value_name = "PATH")]
    source_file: Option<PathBuf>,

    /// Directory export to pair with --source-file.
    #[arg(long = "directory-file", value_name = "PATH", requires = "source_file")]
    directory_file: Option<PathBuf>,

    /// Only modules running on this day (2025-01-15, 1/15/2025, ...).
    #[arg(long, value_name = "DATE")]
    date: Option<String>,

    #[arg(long)]
    district: Option<String>,

    #[arg(long)]
    school: Option<String>,

    #[arg(long)]
    grade: Option<String>,

    /// Keep one module per school, grade and curriculum: the latest to start.
    #[arg(long)]
    current: bool,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print an option list instead of modules.
    #[arg(long, value_enum, value_name = "WHAT")]
    list: Option<ListKind>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListKind {
    Districts,
    Schools,
    Grades,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("reading configuration")?;
    if let Some(path) = &cli.source_file {
        config.source = SourceConfig::File {
            path: path.clone(),
            directory_path: cli.directory_file.clone(),
        };
    }

    let point = match cli.date.as_deref() {
        Some(raw) => match parse_day(raw) {
            Some(d) => Some(d),
            None => bail!("unrecognised date {raw:?}"),
        },
        None => None,
    };

    let outcome = load_reference(&config.source, &config.http);
    if outcome.origin.is_fallback() {
        eprintln!("warning: {}", outcome.origin);
    }
    let mut state = AppState::with_outcome(outcome);

    state.set_point_date(point);
    state.set_current_only(cli.current);
    apply(&mut state, "district", cli.district, AppState::set_district, |s| s.selection.district.clone());
    apply(&mut state, "school", cli.school, AppState::set_school, |s| s.selection.school.clone());
    apply(&mut state, "grade", cli.grade, AppState::set_grade, |s| s.selection.grade.clone());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.list {
        Some(kind) => {
            let values = match kind {
                ListKind::Districts => &state.districts,
                ListKind::Schools => &state.schools,
                ListKind::Grades => &state.grades,
            };
            print_list(&mut out, cli.format, values)?;
        }
        None => print_rows(&mut out, cli.format, &state)?,
    }
    out.flush()?;
    Ok(())
}

/// Set one selection field, warning when the value is not offered and gets
/// cleared by the cascade.
fn apply(
    state: &mut AppState,
    what: &str,
    value: Option<String>,
    set: fn(&mut AppState, Option<String>),
    get: fn(&AppState) -> Option<String>,
) {
    let Some(value) = value else { return };
    set(state, Some(value.clone()));
    if get(state).is_none() && !value.trim().is_empty() {
        eprintln!("warning: {what} {value:?} is not offered; ignoring it");
    }
}

fn print_list(out: &mut impl Write, format: OutputFormat, values: &[String]) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(values)?)?,
        OutputFormat::Text | OutputFormat::Csv => {
            for v in values {
                writeln!(out, "{v}")?;
            }
        }
    }
    Ok(())
}

fn print_rows(out: &mut impl Write, format: OutputFormat, state: &AppState) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            write_csv(out, state.visible_rows()).context("writing CSV")?;
        }
        OutputFormat::Json => {
            let results: Vec<_> = state.visible_rows().collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&json!({ "results": results }))?)?;
        }
        OutputFormat::Text => {
            if state.visible_indices.is_empty() {
                writeln!(out, "No modules match.")?;
            }
            for r in state.visible_rows() {
                writeln!(out, "{} | {} | grade {} | {}", r.district, r.school, r.grade, r.curriculum)?;
                writeln!(out, "  {}", r.module)?;
                if !r.essential_question.is_empty() {
                    writeln!(out, "  EQ: {}", r.essential_question)?;
                }
                if !r.books.is_empty() {
                    writeln!(out, "  Books: {}", r.book_titles().join("; "))?;
                }
                writeln!(out, "  {} to {}", r.start_date, r.end_date)?;
            }
        }
    }
    Ok(())
}
