use tracing::info;

use crate::api::RemoteService;
use crate::domain::{AppError, ThreadConfig};

/// Client-side view of the pending URL queue. The service's copy is authoritative;
/// every successful mutation is followed by a refetch.
#[derive(Debug, Default)]
pub struct QueueManager {
    entries: Vec<String>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub async fn add<S: RemoteService>(&mut self, service: &S, url: &str) -> Result<(), AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::EmptyUrl);
        }

        service.add_to_queue(url).await?;
        info!(url, "Added to queue");
        self.refresh(service).await
    }

    pub async fn remove_at<S: RemoteService>(
        &mut self,
        service: &S,
        index: Option<usize>,
    ) -> Result<(), AppError> {
        let index = index.ok_or(AppError::NoSelection)?;
        if index >= self.entries.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }

        service.remove_from_queue(index).await?;
        self.refresh(service).await
    }

    pub async fn refresh<S: RemoteService>(&mut self, service: &S) -> Result<(), AppError> {
        self.entries = service.get_queue().await?;
        Ok(())
    }

    /// Delegates draining the queue to the service and returns its summary.
    pub async fn process_all<S: RemoteService>(
        &self,
        service: &S,
        save_path: &str,
        threads: ThreadConfig,
    ) -> Result<String, AppError> {
        let message = service.process_queue(save_path, threads).await?;
        info!(pending = self.entries.len(), "Queue handed to service");
        Ok(message)
    }
}
