use std::path::PathBuf;

use eframe::egui::{self, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the run summary above the charts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if let Some(src) = &state.source {
            ui.label(format!("Source: {}", src.display()));
            ui.separator();
        }

        ui.label(format!(
            "{} athletes, {} measurements",
            state.athletes.len(),
            state.measurement_count()
        ));

        if let Some(report) = &state.report_path {
            ui.separator();
            ui.label(format!("Report: {}", report.display()));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for the measurement file when none was given on the command line.
pub fn pick_input_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open anthropometric data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}
