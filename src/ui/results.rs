use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use pacing_guide::data::dates::parse_day;
use pacing_guide::data::filter::{modules_for, ModuleSummary};
use pacing_guide::data::model::CurriculumRow;
use pacing_guide::state::AppState;

use crate::color::CurriculumColors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsMode {
    #[default]
    Cards,
    Table,
}

/// Presentation choices that live outside the session state.
#[derive(Debug, Default)]
pub struct ResultsView {
    pub mode: ResultsMode,
    scroll_to_top: bool,
}

impl ResultsView {
    pub fn reset_cursor(&mut self) {
        self.scroll_to_top = true;
    }
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

pub fn results_panel(ui: &mut Ui, state: &mut AppState, colors: &CurriculumColors, view: &mut ResultsView) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut view.mode, ResultsMode::Cards, "Cards");
        ui.selectable_value(&mut view.mode, ResultsMode::Table, "Table");
        ui.separator();
        match state.selection.point_date {
            Some(d) => ui.label(format!("Showing modules taught on {}", d.format("%B %-d, %Y"))),
            None => ui.label("Showing modules for any date"),
        };
    });
    ui.separator();

    if state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No modules match the current filters");
        });
        return;
    }

    match view.mode {
        ResultsMode::Table => results_table(ui, state, colors),
        ResultsMode::Cards => {
            let mut scroll = ScrollArea::vertical().auto_shrink([false, false]);
            if std::mem::take(&mut view.scroll_to_top) {
                scroll = scroll.vertical_scroll_offset(0.0);
            }
            let mut jump = None;
            scroll.show(ui, |ui: &mut Ui| {
                for &i in &state.visible_indices {
                    let row = &state.data.rows[i];
                    let modules = modules_for(&state.data.rows, &row.curriculum, &row.grade);
                    if let Some(target) = module_card(ui, row, &modules, colors) {
                        jump = Some(target);
                    }
                    ui.add_space(6.0);
                }
            });
            // Jump to the start of a neighbouring module.
            if let Some(start) = jump {
                state.set_point_date(Some(start));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Card view
// ---------------------------------------------------------------------------

fn badge(ui: &mut Ui, text: &str, color: Color32) {
    ui.label(RichText::new(format!(" {text} ")).color(Color32::WHITE).background_color(color));
}

/// One module card. Returns the start date of the neighbouring module the
/// user clicked, if any.
fn module_card(
    ui: &mut Ui,
    row: &CurriculumRow,
    modules: &[ModuleSummary],
    colors: &CurriculumColors,
) -> Option<chrono::NaiveDate> {
    let mut jump = None;
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.horizontal_wrapped(|ui: &mut Ui| {
            if !row.curriculum.is_empty() {
                badge(ui, &row.curriculum, colors.color_for(&row.curriculum));
            }
            ui.label(RichText::new(format!("{} · {} · Grade {}", row.district, row.school, row.grade)).weak());
        });

        let title = if row.module.is_empty() { "Untitled module" } else { row.module.as_str() };
        ui.heading(title);
        ui.label(RichText::new(format!("{} – {}", or_dash(&row.start_date), or_dash(&row.end_date))).weak());

        let questions = row.questions();
        if !questions.is_empty() {
            ui.add_space(4.0);
            ui.strong("Essential question");
            for q in &questions {
                ui.label(format!("• {q}"));
            }
        }

        if !row.genres.is_empty() {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong("Genres:");
                for g in &row.genres {
                    ui.label(RichText::new(g).italics());
                }
            });
        }

        if !row.books.is_empty() {
            ui.add_space(4.0);
            ui.strong("Reading list");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for book in &row.books {
                    ui.vertical(|ui: &mut Ui| {
                        ui.set_max_width(110.0);
                        if let Some(cover) = &book.cover_image_url {
                            ui.add(egui::Image::from_uri(cover.as_str()).max_height(120.0).max_width(100.0));
                        }
                        match &book.url {
                            Some(url) => {
                                ui.hyperlink_to(&book.title, url);
                            }
                            None => {
                                ui.label(&book.title);
                            }
                        }
                    });
                }
            });
        }

        if let Some(target) = neighbours(ui, row, modules) {
            jump = Some(target);
        }
    });
    jump
}

/// Prior / next module links, ordered by module number.
fn neighbours(ui: &mut Ui, row: &CurriculumRow, modules: &[ModuleSummary]) -> Option<chrono::NaiveDate> {
    let pos = modules.iter().position(|m| m.label == row.module)?;
    let prior = pos.checked_sub(1).and_then(|p| modules.get(p));
    let next = modules.get(pos + 1);
    if prior.is_none() && next.is_none() {
        return None;
    }

    let mut jump = None;
    ui.add_space(4.0);
    ui.horizontal(|ui: &mut Ui| {
        for (arrow, m) in [("◀ Prior", prior), ("Next ▶", next)] {
            let Some(m) = m else { continue };
            let target = parse_day(&m.start);
            let text = format!("{arrow}: {}", m.label);
            let resp = ui.add_enabled(target.is_some(), egui::Button::new(text).small());
            if resp.on_hover_text(format!("{} – {}", or_dash(&m.start), or_dash(&m.end))).clicked() {
                jump = target;
            }
        }
    });
    jump
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

const TABLE_COLUMNS: [&str; 9] = [
    "District",
    "School",
    "Grade",
    "Curriculum",
    "Module",
    "Essential Question",
    "Books",
    "Start",
    "End",
];

fn results_table(ui: &mut Ui, state: &AppState, colors: &CurriculumColors) {
    let rows = &state.data.rows;
    let visible = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0).clip(true), 5)
        .column(Column::remainder().at_least(160.0).clip(true))
        .column(Column::auto().at_least(120.0).clip(true))
        .columns(Column::auto().at_least(80.0), 2)
        .header(22.0, |mut header| {
            for title in TABLE_COLUMNS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(22.0, visible.len(), |mut table_row| {
                let r = &rows[visible[table_row.index()]];
                table_row.col(|ui| {
                    ui.label(&r.district);
                });
                table_row.col(|ui| {
                    ui.label(&r.school);
                });
                table_row.col(|ui| {
                    ui.label(&r.grade);
                });
                table_row.col(|ui| {
                    if !r.curriculum.is_empty() {
                        badge(ui, &r.curriculum, colors.color_for(&r.curriculum));
                    }
                });
                table_row.col(|ui| {
                    ui.label(&r.module);
                });
                table_row.col(|ui| {
                    ui.label(&r.essential_question).on_hover_text(&r.essential_question);
                });
                table_row.col(|ui| {
                    ui.label(r.book_titles().join("; "));
                });
                table_row.col(|ui| {
                    ui.label(&r.start_date);
                });
                table_row.col(|ui| {
                    ui.label(&r.end_date);
                });
            });
        });
}
