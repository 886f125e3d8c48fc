mod app;
mod cli;
mod color;
mod data;
mod error;
mod export;
mod pipeline;
mod state;
mod ui;
mod view;

use anyhow::{bail, Context, Result};
use app::AnthroApp;
use clap::Parser;
use eframe::egui;
use export::XlsxExporter;
use state::AppState;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(cli::Args::parse()) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: cli::Args) -> Result<()> {
    let input = match args.input {
        Some(path) => path,
        None if !args.no_display => {
            ui::panels::pick_input_file().context("no input file selected")?
        }
        None => bail!("an INPUT file is required with --no-display"),
    };

    let set = pipeline::prepare(&input)
        .with_context(|| format!("loading measurements from {}", input.display()))?;

    // The chart window blocks until closed, so the views are collected and
    // the report written before it opens.
    let mut state = AppState::new(input, args.output.clone());
    pipeline::publish(&set, &mut state, &XlsxExporter::new(&args.output))
        .context("exporting report")?;

    if args.no_display {
        return Ok(());
    }
    show_charts(state)
}

fn show_charts(state: AppState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Anthropometrics – Lean Mass Index & Sum of 7 Skinfolds",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(AnthroApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("chart window failed: {e}"))
}
