#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod io;
mod model;
mod store;
mod ui;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppSettings;
use crate::io::FileStorage;
use crate::store::ScheduleStore;

/// Environment variable holding the tracing filter, e.g. `debug`.
const LOG_ENV: &str = "WORK_ORDER_TIMELINE_LOG";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_storage(settings: &AppSettings) -> FileStorage {
    if let Some(dir) = &settings.data_dir {
        return FileStorage::new(dir);
    }
    FileStorage::in_project_dirs().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to the working directory for storage");
        FileStorage::new(".")
    })
}

fn main() -> eframe::Result<()> {
    init_tracing();

    let settings = AppSettings::load();
    let storage = open_storage(&settings);
    info!(dir = %storage.dir().display(), "using storage directory");
    let today = chrono::Local::now().date_naive();
    let store = ScheduleStore::open(storage, today);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Work Order Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Work Order Timeline",
        options,
        Box::new(move |cc| Ok(Box::new(app::TimelineApp::new(cc, settings, store, today)))),
    )
}
