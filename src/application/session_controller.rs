use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::history::HistoryLog;
use super::poll_loop::{PollConfig, PollEvent, PollEvents, PollLoop};
use super::queue::QueueManager;
use crate::api::RemoteService;
use crate::domain::{AppError, DownloadSession, DownloadStatus, HistoryRecord, ThreadConfig};

/// What a poll result did to the active session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// The result belonged to a session that is no longer active.
    Ignored,
    Progress(DownloadSession),
    /// Terminal status reached; the session is released and history refreshed.
    Finished(DownloadSession),
    /// The service no longer knows the id.
    Lost(String),
    /// The status request failed; polling continues.
    PollFailed(AppError),
}

/// Owns the single active download, the poll subscription that tracks it,
/// and the cached queue and history views.
///
/// All mutation goes through `&mut self`, so a controller has exactly one
/// writer. Share it behind a mutex when more than one task needs it.
pub struct SessionController<S: RemoteService> {
    service: Arc<S>,
    session: Option<DownloadSession>,
    poll: PollLoop,
    sink: mpsc::UnboundedSender<PollEvent>,
    queue: QueueManager,
    history: HistoryLog,
}

impl<S: RemoteService> SessionController<S> {
    pub fn new(service: Arc<S>, poll_config: PollConfig) -> (Self, PollEvents) {
        let (sink, events) = PollEvents::channel();
        let controller = Self {
            service,
            session: None,
            poll: PollLoop::new(poll_config),
            sink,
            queue: QueueManager::new(),
            history: HistoryLog::new(),
        };
        (controller, events)
    }

    pub fn session(&self) -> Option<&DownloadSession> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.poll.is_running()
    }

    pub fn queue(&self) -> &[String] {
        self.queue.entries()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        self.history.records()
    }

    /// Ask the service to start a download and begin tracking it.
    ///
    /// Only one download may be tracked at a time; a second call while one is
    /// active fails with [`AppError::SessionActive`] without contacting the service.
    pub async fn start_download(
        &mut self,
        url: &str,
        save_path: &str,
        threads: ThreadConfig,
    ) -> Result<String, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::EmptyUrl);
        }
        if let Some(active) = &self.session {
            return Err(AppError::SessionActive(active.id.clone()));
        }

        let session_id = self
            .service
            .start_download(url, save_path, threads)
            .await?;
        info!(%session_id, url, save_path, "Download started");

        self.session = Some(DownloadSession::pending(session_id.clone()));
        self.poll
            .start(session_id.clone(), self.service.clone(), self.sink.clone());
        Ok(session_id)
    }

    /// Request cancellation of the active download.
    ///
    /// The displayed status is left alone; the next poll result carries the
    /// authoritative outcome.
    pub async fn cancel_active_download(&mut self) -> Result<(), AppError> {
        let Some(session_id) = self.session.as_ref().map(|s| s.id.clone()) else {
            return Ok(());
        };

        self.service.cancel_download(&session_id).await?;
        info!(%session_id, "Cancel requested");

        // A poll may have ended the session while the request was in flight.
        if let Some(session) = self.session.as_mut().filter(|s| s.id == session_id) {
            session.cancel_requested = true;
        }
        Ok(())
    }

    pub async fn on_poll_result(&mut self, event: PollEvent) -> SessionUpdate {
        let PollEvent { session_id, result } = event;

        let Some(session) = self.session.as_mut().filter(|s| s.id == session_id) else {
            debug!(%session_id, "Discarding stale poll result");
            return SessionUpdate::Ignored;
        };

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(%session_id, error = %e, "Status request failed");
                return SessionUpdate::PollFailed(e);
            }
        };

        match report.status {
            DownloadStatus::NotFound => {
                self.poll.stop();
                self.session = None;
                info!(%session_id, "Service lost track of download");
                SessionUpdate::Lost(session_id)
            }
            status if status.is_terminal() => {
                session.apply(&report);
                let finished = session.clone();
                self.session = None;
                self.poll.stop();
                info!(%session_id, status = status.label(), "Download finished");

                self.history.invalidate();
                if let Err(e) = self.history.ensure_fresh(&*self.service).await {
                    warn!(error = %e, "History refresh failed");
                }
                SessionUpdate::Finished(finished)
            }
            _ => {
                session.apply(&report);
                SessionUpdate::Progress(session.clone())
            }
        }
    }

    pub async fn default_save_path(&self) -> Result<String, AppError> {
        Ok(self.service.default_path().await?)
    }

    pub async fn add_to_queue(&mut self, url: &str) -> Result<(), AppError> {
        self.queue.add(&*self.service, url).await
    }

    pub async fn remove_from_queue(&mut self, index: Option<usize>) -> Result<(), AppError> {
        self.queue.remove_at(&*self.service, index).await
    }

    pub async fn refresh_queue(&mut self) -> Result<(), AppError> {
        self.queue.refresh(&*self.service).await
    }

    pub async fn process_queue(
        &mut self,
        save_path: &str,
        threads: ThreadConfig,
    ) -> Result<String, AppError> {
        let message = self
            .queue
            .process_all(&*self.service, save_path, threads)
            .await?;
        // The service consumes entries as it drains; show what is left.
        if let Err(e) = self.queue.refresh(&*self.service).await {
            warn!(error = %e, "Queue refresh failed");
        }
        Ok(message)
    }

    pub async fn refresh_history(&mut self) -> Result<(), AppError> {
        self.history.refresh(&*self.service).await
    }

    pub async fn clear_history(&mut self) -> Result<(), AppError> {
        self.history.clear(&*self.service).await
    }

    /// Folders cannot be opened from here; returns the path for display.
    pub async fn show_folder(&self, path: &str) -> Result<String, AppError> {
        if path.is_empty() {
            return Err(AppError::NoSelection);
        }
        Ok(self.service.show_folder(path).await?)
    }
}
