//! Salon Dashboard - Desktop admin dashboard for salon customers and bookings.

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use salon_dashboard as app;

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::App;

/// Desktop admin dashboard for salon customers and bookings.
#[derive(Parser)]
#[command(name = "salon-dashboard")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Salon Dashboard starting...");

    // The upstream API credential comes from the environment; .env is
    // honored for local runs.
    if dotenvy::dotenv().is_ok() {
        tracing::info!("Loaded .env");
    }

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let (config, config_error) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            (config, None)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, using defaults");
            (AppConfig::default(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid, using defaults: {}", e);
            (AppConfig::default(), Some(e.to_string()))
        }
    };

    let title = config.ui.page_title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            let mut app = App::new(config, rt);
            if let Some(error) = config_error {
                app.login_form.warning = Some(format!("Config invalid, using defaults: {error}"));
            }
            Ok(Box::new(app))
        }),
    )
}
