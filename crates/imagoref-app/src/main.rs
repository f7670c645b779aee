//! Main application entry point.

use clap::Parser;
use imagoref_app::{App, AppConfig, Cli};
use imagoref_core::Settings;

fn load_settings() -> Settings {
    let loaded = Settings::default_path().and_then(|path| Settings::load_or_default(&path));
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load settings, using defaults: {e}");
        Settings::default()
    })
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting ImagoRef");

    if cli.shortcuts {
        imagoref_app::print_shortcuts();
        return;
    }

    let mut app = App::new(AppConfig::default(), load_settings());
    let opened = app.open_files(&cli.files);

    let summary = app.summary();
    println!("{}: {} of {} files placed", app.config().title, opened.len(), cli.files.len());
    if let Some(bounds) = summary.bounds {
        println!(
            "Board spans {:.0}x{:.0} at ({:.0}, {:.0})",
            bounds.width(),
            bounds.height(),
            bounds.x0,
            bounds.y0
        );
    }
}
