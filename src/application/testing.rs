//! Scripted in-memory stand-in for the download service.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::client::Result;
use crate::api::{ApiError, RemoteService};
use crate::domain::{DownloadStatus, HistoryRecord, StatusReport, ThreadConfig};

#[derive(Default)]
struct FakeState {
    next_id: usize,
    reject_start: Option<String>,
    offline: bool,
    statuses: VecDeque<StatusReport>,
    status_delay: Option<Duration>,
    history_delay: Option<Duration>,
    history_fails: bool,
    started: Vec<(String, String, ThreadConfig)>,
    status_calls: usize,
    cancelled: Vec<String>,
    queue: Vec<String>,
    processed: Vec<(String, ThreadConfig)>,
    history: Vec<HistoryRecord>,
    history_calls: usize,
    status_calls_during_history: usize,
}

pub struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn push_report(&self, report: StatusReport) {
        self.state.lock().unwrap().statuses.push_back(report);
    }

    pub fn push_status(&self, status: DownloadStatus, progress: f64) {
        let mut report = StatusReport::with_status(status);
        report.progress = progress;
        report.filename = "f.zip".into();
        self.push_report(report);
    }

    pub fn hang_status_for(&self, delay: Duration) {
        self.state.lock().unwrap().status_delay = Some(delay);
    }

    pub fn delay_history_for(&self, delay: Duration) {
        self.state.lock().unwrap().history_delay = Some(delay);
    }

    /// Make `get_history` fail while every other call keeps working.
    pub fn fail_history(&self, fail: bool) {
        self.state.lock().unwrap().history_fails = fail;
    }

    pub fn reject_start(&self, message: &str) {
        self.state.lock().unwrap().reject_start = Some(message.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn set_history(&self, history: Vec<HistoryRecord>) {
        self.state.lock().unwrap().history = history;
    }

    pub fn started(&self) -> Vec<(String, String, ThreadConfig)> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn processed(&self) -> Vec<(String, ThreadConfig)> {
        self.state.lock().unwrap().processed.clone()
    }

    pub fn status_calls(&self) -> usize {
        self.state.lock().unwrap().status_calls
    }

    pub fn history_calls(&self) -> usize {
        self.state.lock().unwrap().history_calls
    }

    /// Status requests that arrived while a history fetch was in flight.
    pub fn status_calls_during_history(&self) -> usize {
        self.state.lock().unwrap().status_calls_during_history
    }

    fn check_online(&self) -> Result<()> {
        if self.state.lock().unwrap().offline {
            return Err(ApiError::InvalidResponse("connection refused".into()));
        }
        Ok(())
    }
}

pub fn record(filename: &str, status: DownloadStatus) -> HistoryRecord {
    HistoryRecord {
        id: None,
        url: None,
        filename: filename.to_string(),
        total_size: 2048,
        date: "2024-01-01 10:00:00".to_string(),
        status,
        save_path: "/tmp".to_string(),
        file_path: None,
        duration: None,
    }
}

impl RemoteService for FakeService {
    async fn default_path(&self) -> Result<String> {
        self.check_online()?;
        Ok("/home/user/Downloads".to_string())
    }

    async fn start_download(
        &self,
        url: &str,
        save_path: &str,
        threads: ThreadConfig,
    ) -> Result<String> {
        self.check_online()?;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.reject_start.clone() {
            return Err(ApiError::ApiError(message));
        }
        state.next_id += 1;
        state
            .started
            .push((url.to_string(), save_path.to_string(), threads));
        Ok(format!("dl-{}", state.next_id))
    }

    async fn download_status(&self, _download_id: &str) -> Result<StatusReport> {
        let delay = self.state.lock().unwrap().status_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_online()?;
        let mut state = self.state.lock().unwrap();
        state.status_calls += 1;
        Ok(state
            .statuses
            .pop_front()
            .unwrap_or_else(|| StatusReport::with_status(DownloadStatus::Downloading)))
    }

    async fn cancel_download(&self, download_id: &str) -> Result<()> {
        self.check_online()?;
        self.state
            .lock()
            .unwrap()
            .cancelled
            .push(download_id.to_string());
        Ok(())
    }

    async fn add_to_queue(&self, url: &str) -> Result<()> {
        self.check_online()?;
        self.state.lock().unwrap().queue.push(url.to_string());
        Ok(())
    }

    async fn remove_from_queue(&self, index: usize) -> Result<()> {
        self.check_online()?;
        let mut state = self.state.lock().unwrap();
        if index >= state.queue.len() {
            return Err(ApiError::ApiError("Invalid queue index".into()));
        }
        state.queue.remove(index);
        Ok(())
    }

    async fn get_queue(&self) -> Result<Vec<String>> {
        self.check_online()?;
        Ok(self.state.lock().unwrap().queue.clone())
    }

    async fn process_queue(&self, save_path: &str, threads: ThreadConfig) -> Result<String> {
        self.check_online()?;
        self.state
            .lock()
            .unwrap()
            .processed
            .push((save_path.to_string(), threads));
        Ok("Queue processing started".to_string())
    }

    async fn get_history(&self) -> Result<Vec<HistoryRecord>> {
        let (delay, calls_before) = {
            let state = self.state.lock().unwrap();
            (state.history_delay, state.status_calls)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_online()?;
        let mut state = self.state.lock().unwrap();
        state.history_calls += 1;
        state.status_calls_during_history += state.status_calls - calls_before;
        if state.history_fails {
            return Err(ApiError::Timeout);
        }
        Ok(state.history.clone())
    }

    async fn clear_history(&self) -> Result<()> {
        self.check_online()?;
        self.state.lock().unwrap().history.clear();
        Ok(())
    }

    async fn show_folder(&self, path: &str) -> Result<String> {
        self.check_online()?;
        Ok(path.to_string())
    }
}
