use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::models::{
    Ack, AckStatus, AddToQueueRequest, ApiConfig, DefaultPathResponse, HistoryResponse,
    ProcessQueueRequest, QueueResponse, RemoveFromQueueRequest, ShowFolderResponse,
    StartDownloadRequest, StartDownloadResponse,
};
use super::service::RemoteService;
use crate::domain::{AppError, HistoryRecord, StatusReport, ThreadConfig};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ApiError(message) => AppError::Remote(message),
            other => AppError::Transport(other.to_string()),
        }
    }
}

/// Turns a `{status, message}` pair into a result, keeping the server's message verbatim.
fn check_ack(
    status: AckStatus,
    message: Option<String>,
    operation: &str,
) -> Result<Option<String>> {
    match status {
        AckStatus::Success => Ok(message),
        AckStatus::Error => Err(ApiError::ApiError(
            message.unwrap_or_else(|| format!("{} failed", operation)),
        )),
    }
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.config.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self
            .http
            .get(self.endpoint(segments)?)
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(segments)?)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }
}

impl RemoteService for ApiClient {
    async fn default_path(&self) -> Result<String> {
        let json: DefaultPathResponse = self.get_json(&["api", "browse_location"]).await?;
        Ok(json.default_path)
    }

    async fn start_download(
        &self,
        url: &str,
        save_path: &str,
        threads: ThreadConfig,
    ) -> Result<String> {
        let body = StartDownloadRequest {
            url,
            save_path,
            thread_count: threads.thread_count,
            use_threads: threads.use_threads,
        };
        let json: StartDownloadResponse =
            self.post_json(&["api", "start_download"], &body).await?;

        check_ack(json.status, json.message, "Start download")?;
        json.download_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("missing download_id".to_string()))
    }

    async fn download_status(&self, download_id: &str) -> Result<StatusReport> {
        self.get_json(&["api", "download_status", download_id]).await
    }

    async fn cancel_download(&self, download_id: &str) -> Result<()> {
        // Acknowledgement body is opaque; only an explicit error status rejects.
        let json: Value = self
            .get_json(&["api", "cancel_download", download_id])
            .await?;
        if json.get("status").and_then(Value::as_str) == Some("error") {
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            check_ack(AckStatus::Error, message, "Cancel download")?;
        }
        Ok(())
    }

    async fn add_to_queue(&self, url: &str) -> Result<()> {
        let json: Ack = self
            .post_json(&["api", "add_to_queue"], &AddToQueueRequest { url })
            .await?;
        check_ack(json.status, json.message, "Add to queue").map(|_| ())
    }

    async fn remove_from_queue(&self, index: usize) -> Result<()> {
        let json: Ack = self
            .post_json(
                &["api", "remove_from_queue"],
                &RemoveFromQueueRequest { index },
            )
            .await?;
        check_ack(json.status, json.message, "Remove from queue").map(|_| ())
    }

    async fn get_queue(&self) -> Result<Vec<String>> {
        let json: QueueResponse = self.get_json(&["api", "get_queue"]).await?;
        Ok(json.queue)
    }

    async fn process_queue(&self, save_path: &str, threads: ThreadConfig) -> Result<String> {
        let body = ProcessQueueRequest {
            save_path,
            thread_count: threads.thread_count,
            use_threads: threads.use_threads,
        };
        let json: Ack = self.post_json(&["api", "process_queue"], &body).await?;
        let message = check_ack(json.status, json.message, "Process queue")?;
        Ok(message.unwrap_or_default())
    }

    async fn get_history(&self) -> Result<Vec<HistoryRecord>> {
        let json: HistoryResponse = self.get_json(&["api", "get_history"]).await?;
        Ok(json.history)
    }

    async fn clear_history(&self) -> Result<()> {
        let json: Ack = self.get_json(&["api", "clear_history"]).await?;
        check_ack(json.status, json.message, "Clear history").map(|_| ())
    }

    async fn show_folder(&self, path: &str) -> Result<String> {
        let json: ShowFolderResponse = self.get_json(&["api", "show_folder", path]).await?;
        Ok(json.folder_path)
    }
}
