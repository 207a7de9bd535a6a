use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::{Local, NaiveDate};

use crate::data::filter::{filtered_indices, resolve_overlaps, FilterSelection};
use crate::data::loader::{DataOrigin, LoadOutcome, SampleReason};
use crate::data::model::{CurriculumRow, ReferenceData};
use crate::data::options::{districts, grades_for, schools_for};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A load running on a background thread. Only the newest one is kept;
/// dropping the receiver discards whatever an older thread sends later.
struct PendingLoad {
    generation: u64,
    label: String,
    rx: Receiver<LoadOutcome>,
}

/// The full session state, independent of rendering.
pub struct AppState {
    /// Current reference snapshot (the bundled sample until a load lands).
    pub data: ReferenceData,

    /// Where `data` came from; `None` before the first load finishes.
    pub origin: Option<DataOrigin>,

    /// What the user has picked.
    pub selection: FilterSelection,

    /// Option lists for the three combos, kept in step with `selection`.
    pub districts: Vec<String>,
    pub schools: Vec<String>,
    pub grades: Vec<String>,

    /// Indices of rows passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Collapse overlapping modules to the one that started last.
    pub current_only: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load is in flight.
    pub loading: bool,

    generation: u64,
    pending: Option<PendingLoad>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_outcome(LoadOutcome::sample(SampleReason::NotConfigured))
    }
}

impl AppState {
    pub fn with_outcome(outcome: LoadOutcome) -> Self {
        let mut state = Self {
            data: ReferenceData::default(),
            origin: None,
            selection: FilterSelection::default(),
            districts: Vec::new(),
            schools: Vec::new(),
            grades: Vec::new(),
            visible_indices: Vec::new(),
            current_only: false,
            status_message: None,
            loading: false,
            generation: 0,
            pending: None,
        };
        state.apply_outcome(outcome);
        state
    }

    /// Install a new snapshot. The selection survives where its values are
    /// still offered.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        self.status_message = match &outcome.origin {
            DataOrigin::Sample(SampleReason::LoadFailed(reason)) => Some(format!("Could not load data: {reason}")),
            DataOrigin::Sample(SampleReason::EmptyPrimary) => Some("The configured source has no rows".to_string()),
            _ => None,
        };
        self.data = outcome.data;
        self.origin = Some(outcome.origin);
        self.loading = false;

        self.districts = districts(&self.data.rows, &self.data.directory);
        if !offered(&self.districts, &self.selection.district) {
            self.selection.district = None;
        }
        self.cascade_from_district();
    }

    // ---- option cascade ----

    fn cascade_from_district(&mut self) {
        self.schools = schools_for(self.selection.district.as_deref(), &self.data.rows, &self.data.directory);
        if !offered(&self.schools, &self.selection.school) {
            self.selection.school = None;
        }
        self.cascade_from_school();
    }

    fn cascade_from_school(&mut self) {
        self.grades = grades_for(
            self.selection.district.as_deref(),
            self.selection.school.as_deref(),
            &self.data.rows,
            &self.data.directory,
        );
        if !offered(&self.grades, &self.selection.grade) {
            self.selection.grade = None;
        }
        self.refilter();
    }

    pub fn set_district(&mut self, district: Option<String>) {
        self.selection.district = non_empty(district);
        self.cascade_from_district();
    }

    pub fn set_school(&mut self, school: Option<String>) {
        self.selection.school = non_empty(school);
        self.cascade_from_school();
    }

    pub fn set_grade(&mut self, grade: Option<String>) {
        self.selection.grade = non_empty(grade);
        self.refilter();
    }

    pub fn set_point_date(&mut self, date: Option<NaiveDate>) {
        self.selection.point_date = date;
        self.refilter();
    }

    pub fn set_current_only(&mut self, on: bool) {
        self.current_only = on;
        self.refilter();
    }

    /// Clear every constraint.
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.cascade_from_district();
    }

    // ---- results ----

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        let matched = filtered_indices(&self.data.rows, &self.selection);
        self.visible_indices = if self.current_only {
            let reference = self.selection.point_date.unwrap_or_else(|| Local::now().date_naive());
            resolve_overlaps(&self.data.rows, &matched, reference)
        } else {
            matched
        };
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &CurriculumRow> + '_ {
        self.visible_indices.iter().map(|&i| &self.data.rows[i])
    }

    // ---- background loading ----

    /// Start `job` on a worker thread. A newer request supersedes this one:
    /// its result is dropped unread. `notify` runs after the job finishes
    /// (the GUI passes a repaint request).
    pub fn request_load<J, N>(&mut self, label: impl Into<String>, job: J, notify: N)
    where
        J: FnOnce() -> LoadOutcome + Send + 'static,
        N: Fn() + Send + 'static,
    {
        self.generation += 1;
        let generation = self.generation;
        let label = label.into();
        let (tx, rx) = mpsc::channel();

        log::info!("Loading {label} (request #{generation})");
        thread::spawn(move || {
            let outcome = job();
            if tx.send(outcome).is_err() {
                log::debug!("Load request #{generation} superseded; result discarded");
            }
            notify();
        });

        self.pending = Some(PendingLoad { generation, label, rx });
        self.loading = true;
    }

    /// Apply a finished load, if any. Returns whether the state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        match pending.rx.try_recv() {
            Ok(outcome) => {
                log::debug!("Applying load request #{}", pending.generation);
                self.pending = None;
                self.apply_outcome(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                let err = LoadError::Panicked {
                    origin: pending.label.clone(),
                };
                log::error!("{err}");
                self.status_message = Some(err.to_string());
                self.pending = None;
                self.loading = false;
                true
            }
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Unset, or one of `options`.
fn offered(options: &[String], value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| options.iter().any(|o| o == v))
}
