use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 9] = [
    "ID", "Name", "Grade", "Class", "Region", "Homework", "Quiz", "Quiz date", "Score",
];

/// Table of the scoped records.
pub fn scoped_table(ui: &mut Ui, state: &AppState) {
    let Some(roster) = &state.roster else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a roster to get started  (File → Open…)");
        });
        return;
    };

    if state.scoped_indices.is_empty() {
        ui.label("No records in scope.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(40.0), HEADERS.len())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.scoped_indices.len(), |mut row| {
                let record = &roster.records()[state.scoped_indices[row.index()]];
                let cells = [
                    record.student_id.clone(),
                    record.name.clone(),
                    opt(record.grade),
                    record.class_label.clone().unwrap_or_default(),
                    record.region.clone().unwrap_or_default(),
                    if record.homework_submitted { "submitted" } else { "missing" }.to_string(),
                    record.quiz_name.clone(),
                    opt(record.quiz_date),
                    opt(record.quiz_score),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
