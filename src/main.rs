// Prevent console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod message;
mod ui;
mod ui_document;
mod ui_selection;
mod ui_welcome;
mod update;

use app::CropperApp;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn init_logging() {
    let fallback = pdfcropper::storage::load_settings().log_filter;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn main() -> iced::Result {
    human_panic::setup_panic!();
    init_logging();

    iced::application(CropperApp::default, CropperApp::update, CropperApp::view)
        .title("PDF Cropper")
        .window_size((840.0, 760.0))
        .run()
}
