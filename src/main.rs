mod app;
mod theme;
mod ui;

use app::ChatApp;
use chatstats::ChatConfig;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChatConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        stats_source = ?config.stats_source,
        welcome = ?config.welcome,
        chart = config.chart_enabled,
        "starting chat"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chat",
        native_options,
        Box::new(move |creation_context| Ok(Box::new(ChatApp::new(&creation_context.egui_ctx, config)))),
    )?;

    Ok(())
}
