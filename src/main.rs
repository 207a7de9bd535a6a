mod app;
mod color;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::PacingGuideApp;
use eframe::egui;
use pacing_guide::config::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional config path as the only argument; otherwise the usual lookup.
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(explicit.as_deref()).context("reading configuration")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pacing Guide",
        options,
        Box::new(move |cc| {
            // Image loaders render book covers fetched over http.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(PacingGuideApp::new(cc, config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
