use std::io::Write;

use chrono::NaiveDate;

use pacing_guide::config::{AppConfig, HttpConfig, SourceConfig};
use pacing_guide::data::filter::{search, FilterSelection};
use pacing_guide::data::loader::{load_reference, DataOrigin, SampleReason};
use pacing_guide::data::model::{CurriculumRow, ReferenceData};
use pacing_guide::data::normalize::normalize_records;
use pacing_guide::data::tabular;
use pacing_guide::state::AppState;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn two_rows() -> Vec<CurriculumRow> {
    normalize_records(&serde_json::json!([
        {"district": "Northside ISD", "school": "Maple Elementary", "grade": "3",
         "startDate": "2025-01-06", "endDate": "2025-02-07"},
        {"district": "Northside ISD", "school": "Oak Elementary", "grade": "5",
         "startDate": "2024-10-01", "endDate": "2024-11-08"}
    ]))
}

#[test]
fn district_and_date_select_the_running_module() {
    let rows = two_rows();
    assert_eq!(rows.len(), 2);
    let selection = FilterSelection {
        district: Some("Northside ISD".into()),
        point_date: Some(day("2025-01-20")),
        ..Default::default()
    };
    let hits = search(&rows, &selection);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].school, "Maple Elementary");
}

#[test]
fn not_applicable_end_date_is_open_ended() {
    let table = tabular::parse(
        "District,School,Grade,Start Date,End Date\nNorthside ISD,Maple Elementary,3,2025-01-06,N/A\n",
    );
    let rows = pacing_guide::data::normalize::normalize_table(&table);
    let mut state = AppState::with_outcome(pacing_guide::data::loader::LoadOutcome {
        data: ReferenceData::new(rows, Vec::new()),
        origin: DataOrigin::Source("inline".into()),
    });
    state.set_point_date(Some(day("2030-06-01")));
    assert_eq!(state.visible_indices, vec![0]);
    state.set_point_date(Some(day("2025-01-05")));
    assert!(state.visible_indices.is_empty());
}

#[test]
fn config_file_drives_a_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let rows_path = dir.path().join("pacing.csv");
    std::fs::write(
        &rows_path,
        "\u{feff}District #,Campus,Grade Level,Program,Unit,Module Title,EQ,Books,Dates\n\
         12,Maple,kindergarten,hmh into reading,2,Nature Watchers,How does nature inspire us?,\"Owl Moon; A Seed Is Sleepy\",11/18/2024 - 12/20/2024\n",
    )
    .unwrap();
    let config_path = dir.path().join("pacing-guide.toml");
    let mut f = std::fs::File::create(&config_path).unwrap();
    writeln!(f, "[source]\nkind = \"file\"\npath = {:?}", rows_path.display().to_string()).unwrap();

    let config = AppConfig::load(Some(&config_path)).unwrap();
    let outcome = load_reference(&config.source, &config.http);
    assert!(matches!(outcome.origin, DataOrigin::Source(_)));

    let row = &outcome.data.rows[0];
    assert_eq!(row.district, "12");
    assert_eq!(row.school, "Maple");
    assert_eq!(row.grade, "K");
    assert_eq!(row.curriculum, "HMH Into Reading");
    assert_eq!(row.module, "Module 2: Nature Watchers");
    assert_eq!(row.book_titles(), vec!["Owl Moon", "A Seed Is Sleepy"]);

    let mut state = AppState::with_outcome(outcome);
    state.set_point_date(Some(day("2024-12-20")));
    assert_eq!(state.visible_indices, vec![0]);
    state.set_point_date(Some(day("2024-12-21")));
    assert!(state.visible_indices.is_empty());
}

#[test]
fn unreachable_source_serves_the_sample() {
    let source = SourceConfig::CsvUrl {
        url: "http://127.0.0.1:9/pacing.csv".into(),
        directory_url: None,
    };
    let outcome = load_reference(&source, &HttpConfig { timeout_secs: 2 });
    assert!(matches!(outcome.origin, DataOrigin::Sample(SampleReason::LoadFailed(_))));
    assert_eq!(outcome.origin.to_string(), "Sample data (load failed)");
    assert_eq!(outcome.data.len(), 11);
}

#[test]
fn sample_cascade_and_lookup() {
    let mut state = AppState::default();
    state.set_district(Some("East Valley SD".into()));
    assert_eq!(state.schools, vec!["Lakeside Elementary", "Roosevelt Elementary"]);
    state.set_school(Some("Roosevelt Elementary".into()));
    assert_eq!(state.grades, vec!["3", "4"]);
    state.set_point_date(Some(day("2025-01-20")));
    let modules: Vec<&str> = state.visible_rows().map(|r| r.module.as_str()).collect();
    assert_eq!(modules, vec!["Module 2: American Art & Identity"]);

    state.set_district(Some("River City PS".into()));
    assert_eq!(state.selection.school, None);
}

#[test]
fn curriculum_sheet_joins_the_school_directory() {
    let dir = tempfile::tempdir().unwrap();
    let pacing = dir.path().join("pacing.csv");
    let schools = dir.path().join("schools.csv");
    std::fs::write(
        &pacing,
        "Curriculum,Grade Level,Module,Theme,start_md,end_md\n\
         Wit & Wisdom,3,1,The Sea,9/8,10/17\n\
         Wit & Wisdom,3,2,Outer Space,10/20,12/5\n",
    )
    .unwrap();
    std::fs::write(
        &schools,
        "District,School,Curriculum,Grades\n3,P.S. 9,Wit & Wisdom,K-5\n3,M.S. 54,Wit & Wisdom,6-8\n",
    )
    .unwrap();

    let source = SourceConfig::File {
        path: pacing,
        directory_path: Some(schools),
    };
    let mut state = AppState::with_outcome(load_reference(&source, &HttpConfig::default()));
    state.set_district(Some("3".into()));
    state.set_school(Some("P.S. 9".into()));
    state.set_grade(Some("3".into()));
    state.set_point_date(Some(day("2025-09-20")));

    assert_eq!(state.selection.school.as_deref(), Some("P.S. 9"));
    assert_eq!(state.selection.grade.as_deref(), Some("3"));
    let modules: Vec<&str> = state.visible_rows().map(|r| r.module.as_str()).collect();
    assert_eq!(modules, vec!["Module 1: The Sea"]);

    state.set_school(Some("M.S. 54".into()));
    assert!(state.visible_indices.is_empty());
}

#[test]
fn api_rows_without_schools_join_the_meta_directory() {
    let rows = normalize_records(&serde_json::json!({"results": [
        {"curriculum": "EL Education", "grade": "6", "module": "Module 1: Climate Science",
         "startDate": "2025-09-02", "endDate": "2025-10-10", "district": "", "school": ""}
    ]}));
    let directory = pacing_guide::data::normalize::directory_records(&serde_json::json!({
        "schools": [{"district_number": "7", "school_name": "Jefferson Middle",
                     "curriculum": "EL Education", "grades": ["6", "7", "8"]}]
    }));
    let data = ReferenceData::new(rows, directory);
    let selection = FilterSelection {
        school: Some("Jefferson Middle".into()),
        point_date: Some(day("2025-09-15")),
        ..Default::default()
    };
    let hits = search(&data.rows, &selection);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].district, "7");
}
