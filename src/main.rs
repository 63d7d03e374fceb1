mod api;
mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;

use std::sync::Arc;

use iced::window;
use tracing::info;

use crate::api::{ApiClient, ApiConfig};
use crate::config::Settings;

fn main() -> iced::Result {
    dotenvy::dotenv().ok();
    let settings = Settings::new().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(&settings.log_level)
        .init();

    let api_config = ApiConfig::new(&settings.server_url, settings.request_timeout())
        .expect("Invalid server_url");
    let service = Arc::new(ApiClient::new(api_config).expect("Failed to build HTTP client"));
    info!(server = %settings.server_url, "Starting download manager");

    let icon_data = include_bytes!("../assets/icon.png");

    let icon = match image::load_from_memory(icon_data) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            window::icon::from_rgba(rgba.into_raw(), width, height).ok()
        }
        Err(_) => None,
    };

    iced::application(
        move || app::DownloadApp::boot(service.clone(), &settings),
        app::update,
        app::view,
    )
    .title("Download Manager")
    .window(window::Settings {
        icon,
        ..Default::default()
    })
    .run()
}
