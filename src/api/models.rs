use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::client::{ApiError, Result};
use crate::domain::HistoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Success,
    Error,
}

/// Generic `{status, message}` acknowledgement used by most mutating endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ack {
    pub status: AckStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from /api/start_download
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartDownloadResponse {
    pub status: AckStatus,
    #[serde(default)]
    pub download_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartDownloadRequest<'a> {
    pub url: &'a str,
    pub save_path: &'a str,
    pub thread_count: u32,
    pub use_threads: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessQueueRequest<'a> {
    pub save_path: &'a str,
    pub thread_count: u32,
    pub use_threads: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddToQueueRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveFromQueueRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultPathResponse {
    pub default_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueResponse {
    #[serde(default)]
    pub queue: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShowFolderResponse {
    pub folder_path: String,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}
