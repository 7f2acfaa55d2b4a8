use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Quiz score chart (central panel)
// ---------------------------------------------------------------------------

/// One bar per scoped record with a score, grouped and coloured by class.
pub fn score_chart(ui: &mut Ui, state: &AppState) {
    let Some(roster) = &state.roster else {
        return;
    };

    // Bars keep their position in the scoped order so the x axis lines up
    // with the table below.
    let mut by_class: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for (pos, &idx) in state.scoped_indices.iter().enumerate() {
        let record = &roster.records()[idx];
        let Some(score) = record.quiz_score else {
            continue;
        };
        let label = format!("{} — {}", record.name, record.quiz_name);
        by_class
            .entry(record.class_key())
            .or_default()
            .push(Bar::new(pos as f64, score as f64).name(label).width(0.7));
    }

    if by_class.is_empty() {
        ui.label("No quiz scores in scope.");
        return;
    }

    Plot::new("score_chart")
        .height(220.0)
        .legend(Legend::default())
        .y_axis_label("Quiz score")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (class_key, bars) in by_class {
                let mut chart = BarChart::new(bars).name(format!("Class {class_key}"));
                if let Some(cm) = &state.color_map {
                    chart = chart.color(cm.color_for(&class_key));
                }
                plot_ui.bar_chart(chart);
            }
        });
}
