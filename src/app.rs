use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RosterQueryApp {
    pub state: AppState,
}

impl RosterQueryApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RosterQueryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: scope and question ----
        egui::SidePanel::left("query_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: answer, chart, scoped rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some(answer) = &self.state.answer {
                        ui.heading("Answer");
                        ui.add(egui::Label::new(egui::RichText::new(answer).monospace()).wrap());
                        ui.separator();
                    }
                    chart::score_chart(ui, &self.state);
                    ui.separator();
                    table::scoped_table(ui, &self.state);
                });
        });
    }
}
