use std::path::PathBuf;

use eframe::egui;

use pacing_guide::config::{AppConfig, SourceConfig};
use pacing_guide::data::loader::load_reference;
use pacing_guide::state::AppState;

use crate::color::CurriculumColors;
use crate::ui::panels::{self, TopBarAction};
use crate::ui::results::{self, ResultsView};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PacingGuideApp {
    pub state: AppState,
    config: AppConfig,
    colors: CurriculumColors,
    view: ResultsView,
}

impl PacingGuideApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = AppState::default();
        let colors = CurriculumColors::new(&state.data.rows);
        let mut app = Self {
            state,
            config,
            colors,
            view: ResultsView::default(),
        };
        if app.config.source != SourceConfig::Sample {
            app.reload(&cc.egui_ctx);
        }
        app
    }

    /// Fetch the configured source on a worker thread.
    fn reload(&mut self, ctx: &egui::Context) {
        let source = self.config.source.clone();
        let http = self.config.http.clone();
        let ctx = ctx.clone();
        self.state.request_load(
            source.label(),
            move || load_reference(&source, &http),
            move || ctx.request_repaint(),
        );
    }

    fn open_file(&mut self, ctx: &egui::Context, path: PathBuf) {
        self.config.source = SourceConfig::File {
            path,
            directory_path: None,
        };
        self.reload(ctx);
    }
}

impl eframe::App for PacingGuideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.poll_load() {
            self.colors = CurriculumColors::new(&self.state.data.rows);
            self.view.reset_cursor();
        }

        // ---- Top panel: menu bar ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;
        match action {
            Some(TopBarAction::Open(path)) => self.open_file(ctx, path),
            Some(TopBarAction::Reload) => self.reload(ctx),
            None => {}
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::results_panel(ui, &mut self.state, &self.colors, &mut self.view);
        });
    }
}
