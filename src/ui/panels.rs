use eframe::egui::{self, Color32, Key, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – scope and question
// ---------------------------------------------------------------------------

/// Render the left panel: scope inputs, date and the question box.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Your scope");
    ui.separator();

    let mut scope_changed = false;

    egui::Grid::new("scope_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            scope_changed |= ui.checkbox(&mut state.grade_enabled, "Grade").changed();
            scope_changed |= ui
                .add_enabled(
                    state.grade_enabled,
                    egui::DragValue::new(&mut state.grade).range(1..=12),
                )
                .changed();
            ui.end_row();

            ui.label("Class");
            scope_changed |= ui.text_edit_singleline(&mut state.class_input).changed();
            ui.end_row();

            ui.label("Region");
            scope_changed |= ui.text_edit_singleline(&mut state.region_input).changed();
            ui.end_row();

            ui.label("Today");
            ui.add(DatePickerButton::new(&mut state.today));
            ui.end_row();
        });

    if scope_changed {
        state.rescope();
    }

    ui.add_space(8.0);
    ui.label(RichText::new(state.scope().to_string()).weak());

    ui.add_space(12.0);
    ui.heading("Ask your question");
    ui.separator();

    let response = ui.add(
        egui::TextEdit::singleline(&mut state.question)
            .hint_text("e.g. Who hasn't submitted homework?")
            .desired_width(f32::INFINITY),
    );
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

    if ui.button("Ask").clicked() || submitted {
        state.ask();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.cache.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(roster) = &state.roster {
            ui.label(format!(
                "{} records loaded, {} in scope",
                roster.len(),
                state.scoped_indices.len()
            ));
            if roster.degraded_fields() > 0 {
                ui.label(
                    RichText::new(format!("{} unparsable cells", roster.degraded_fields()))
                        .color(Color32::YELLOW),
                );
            }
        }

        ui.separator();
        ui.label(RichText::new(format!("fallback: {}", state.engine.fallback_name())).weak());

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open roster")
        .add_filter("Supported files", &["csv", "tsv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_dataset(&path);
    }
}
