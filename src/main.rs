mod app;
mod color;
mod state;
mod ui;

use anyhow::Context;
use eframe::egui;
use roster_query::{HuggingFaceResponder, QueryEngine, Settings};

use app::RosterQueryApp;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load(None).context("loading settings")?;
    let responder =
        HuggingFaceResponder::new(&settings.fallback).context("building the fallback client")?;
    let engine = QueryEngine::new(Box::new(responder));

    let mut state = AppState::new(&settings, engine);
    state.open_dataset(&settings.dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Roster Query",
        options,
        Box::new(move |_cc| Ok(Box::new(RosterQueryApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
