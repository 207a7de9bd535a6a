use std::path::PathBuf;

use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use pacing_guide::data::export::export_file;
use pacing_guide::state::AppState;

use crate::color::origin_color;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date ----
            ui.strong("Date");
            let mut any_date = state.selection.point_date.is_none();
            if ui.checkbox(&mut any_date, "Any date").changed() {
                let date = if any_date { None } else { Some(Local::now().date_naive()) };
                state.set_point_date(date);
            }
            if let Some(mut date) = state.selection.point_date {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.add(DatePickerButton::new(&mut date).id_salt("point_date")).changed() {
                        state.set_point_date(Some(date));
                    }
                    if ui.small_button("Today").clicked() {
                        state.set_point_date(Some(Local::now().date_naive()));
                    }
                });
            }
            ui.separator();

            // ---- District → school → grade ----
            let current = state.selection.district.clone();
            if let Some(picked) = option_combo(ui, "District", "district", current.as_deref(), &state.districts) {
                state.set_district(picked);
            }

            let current = state.selection.school.clone();
            if let Some(picked) = option_combo(ui, "School", "school", current.as_deref(), &state.schools) {
                state.set_school(picked);
            }

            let current = state.selection.grade.clone();
            if let Some(picked) = option_combo(ui, "Grade", "grade", current.as_deref(), &state.grades) {
                state.set_grade(picked);
            }
            ui.separator();

            let mut current_only = state.current_only;
            if ui
                .checkbox(&mut current_only, "Current module only")
                .on_hover_text("When modules overlap, keep the one that started last")
                .changed()
            {
                state.set_current_only(current_only);
            }

            ui.add_space(8.0);
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// A labelled combo with an "All" entry. Returns the new choice when the
/// user picked something different.
fn option_combo(
    ui: &mut Ui,
    label: &str,
    id: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<Option<String>> {
    let mut picked = None;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .width(ui.available_width())
        .selected_text(current.unwrap_or("All"))
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "All").clicked() && current.is_some() {
                picked = Some(None);
            }
            for opt in options {
                let is_current = current == Some(opt.as_str());
                if ui.selectable_label(is_current, opt).clicked() && !is_current {
                    picked = Some(Some(opt.clone()));
                }
            }
        });
    if options.is_empty() {
        ui.label(RichText::new(format!("No {} options", label.to_lowercase())).weak());
    }
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Requests the app handles itself because they start a load.
pub enum TopBarAction {
    Open(PathBuf),
    Reload,
}

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<TopBarAction> {
    let mut action = None;
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                action = open_file_dialog().map(TopBarAction::Open);
                ui.close_menu();
            }
            if ui.button("Export results…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.add_enabled(!state.loading, egui::Button::new("Reload")).clicked() {
                action = Some(TopBarAction::Reload);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(origin) = &state.origin {
            ui.label(
                RichText::new(format!(" {origin} "))
                    .color(Color32::WHITE)
                    .background_color(origin_color(origin)),
            );
        }
        ui.label(format!(
            "{} rows loaded, {} visible",
            state.data.len(),
            state.visible_indices.len()
        ));

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    action
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open pacing guide export")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file()
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export visible rows")
        .set_file_name("pacing-guide.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_file(&path, state.visible_rows()) {
            Ok(n) => state.status_message = Some(format!("Exported {n} rows to {}", path.display())),
            Err(e) => {
                log::error!("Failed to export {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
