use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::application::PollConfig;
use crate::domain::ThreadConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub thread_count: u32,
    pub use_threads: bool,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Default settings
            .set_default("server_url", "http://127.0.0.1:5000")?
            .set_default("poll_interval_ms", 1000)?
            .set_default("request_timeout_ms", 10_000)?
            .set_default("thread_count", 4)?
            .set_default("use_threads", true)?
            .set_default("log_level", "info")?
            // Config file (optional)
            .add_source(File::with_name("downloader").required(false))
            // Environment variables (e.g. DOWNLOADER_SERVER_URL=http://nas:5000)
            .add_source(Environment::with_prefix("DOWNLOADER"));

        builder.build()?.try_deserialize()
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            request_timeout: Duration::from_millis(self.request_timeout_ms.max(1)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    pub fn thread_config(&self) -> ThreadConfig {
        ThreadConfig::new(self.thread_count, self.use_threads)
    }
}
