//! Revingo GUI
//!
//! Play against the CPU or another player on one screen.

use revingo::config::{Config, DEFAULT_LOG_FILTER};
use revingo::ui::RevingoApp;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    let config = Config::load();

    // RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let directive = config
                .as_ref()
                .map(|c| c.log_filter.as_str())
                .unwrap_or(DEFAULT_LOG_FILTER);
            EnvFilter::try_new(directive)
        })
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config.unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to default config");
        Config::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 680.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title("Revingo"),
        ..Default::default()
    };

    eframe::run_native(
        "Revingo",
        options,
        Box::new(|cc| Ok(Box::new(RevingoApp::new(cc, config)))),
    )
}
