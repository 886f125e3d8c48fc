use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AnthroApp {
    pub state: AppState,
}

impl AnthroApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AnthroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: run summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Central panel: chart rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_rows(ui, &self.state);
        });
    }
}
