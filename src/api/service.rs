use std::future::Future;

use super::client::Result;
use crate::domain::{HistoryRecord, StatusReport, ThreadConfig};

/// Request/response contract of the remote download service.
///
/// Implementations hold no session state; the controller owns all of it.
/// Futures are `Send` so the poll loop can drive them from a spawned task.
pub trait RemoteService: Send + Sync + 'static {
    fn default_path(&self) -> impl Future<Output = Result<String>> + Send;

    /// Returns the id the service assigned to the new download.
    fn start_download(
        &self,
        url: &str,
        save_path: &str,
        threads: ThreadConfig,
    ) -> impl Future<Output = Result<String>> + Send;

    fn download_status(&self, download_id: &str)
        -> impl Future<Output = Result<StatusReport>> + Send;

    fn cancel_download(&self, download_id: &str) -> impl Future<Output = Result<()>> + Send;

    fn add_to_queue(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    fn remove_from_queue(&self, index: usize) -> impl Future<Output = Result<()>> + Send;

    fn get_queue(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Hands the whole queue to the service; returns its summary message.
    fn process_queue(
        &self,
        save_path: &str,
        threads: ThreadConfig,
    ) -> impl Future<Output = Result<String>> + Send;

    fn get_history(&self) -> impl Future<Output = Result<Vec<HistoryRecord>>> + Send;

    fn clear_history(&self) -> impl Future<Output = Result<()>> + Send;

    /// The service cannot open local folders; it only echoes the path back.
    fn show_folder(&self, path: &str) -> impl Future<Output = Result<String>> + Send;
}
