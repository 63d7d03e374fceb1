use serde::{Deserialize, Serialize};

/// Status reported by the download service for a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    #[serde(alias = "starting")]
    Pending,
    Downloading,
    Completed,
    Error,
    Cancelled,
    NotFound,
    /// Any status this client does not recognise; treated as still running.
    #[serde(other)]
    Unknown,
}

impl DownloadStatus {
    /// Statuses after which polling stops and history is refreshed.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DownloadStatus::Completed | DownloadStatus::Error | DownloadStatus::Cancelled
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadStatus::Pending => "Pending",
            DownloadStatus::Downloading => "Downloading",
            DownloadStatus::Completed => "Completed",
            DownloadStatus::Error => "Error",
            DownloadStatus::Cancelled => "Cancelled",
            DownloadStatus::NotFound => "Not found",
            DownloadStatus::Unknown => "Working",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadConfig {
    pub thread_count: u32,
    pub use_threads: bool,
}

impl ThreadConfig {
    pub fn new(thread_count: u32, use_threads: bool) -> Self {
        Self {
            thread_count: thread_count.max(1),
            use_threads,
        }
    }
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self::new(4, true)
    }
}

/// Snapshot of one status poll.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusReport {
    pub status: DownloadStatus,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub downloaded_size: u64,
    #[serde(default)]
    pub total_size: u64,
}

impl StatusReport {
    #[cfg(test)]
    pub fn with_status(status: DownloadStatus) -> Self {
        Self {
            status,
            filename: String::new(),
            progress: 0.0,
            speed: 0.0,
            downloaded_size: 0,
            total_size: 0,
        }
    }
}

/// The transfer currently tracked by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSession {
    pub id: String,
    pub status: DownloadStatus,
    pub filename: String,
    pub total_size: u64,
    pub downloaded_size: u64,
    pub speed: f64,
    pub progress: f64,
    pub cancel_requested: bool,
}

impl DownloadSession {
    pub fn pending(id: String) -> Self {
        Self {
            id,
            status: DownloadStatus::Pending,
            filename: String::new(),
            total_size: 0,
            downloaded_size: 0,
            speed: 0.0,
            progress: 0.0,
            cancel_requested: false,
        }
    }

    pub fn apply(&mut self, report: &StatusReport) {
        self.status = report.status;
        self.filename.clone_from(&report.filename);
        self.total_size = report.total_size;
        self.downloaded_size = report.downloaded_size;
        self.speed = report.speed;
        self.progress = report.progress.clamp(0.0, 100.0);
    }
}

/// Server-owned summary of a finished download.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub date: String,
    pub status: DownloadStatus,
    #[serde(default)]
    pub save_path: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(DownloadStatus::Completed.is_terminal());
        assert!(DownloadStatus::Error.is_terminal());
        assert!(DownloadStatus::Cancelled.is_terminal());
        assert!(!DownloadStatus::NotFound.is_terminal());
        assert!(!DownloadStatus::Downloading.is_terminal());
    }

    #[test]
    fn test_starting_reads_as_pending() {
        let status: DownloadStatus = serde_json::from_str("\"starting\"").unwrap();
        assert_eq!(status, DownloadStatus::Pending);
    }

    #[test]
    fn test_unrecognised_status_keeps_polling() {
        let report: StatusReport =
            serde_json::from_str(r#"{"status": "paused", "progress": 12.5}"#).unwrap();
        assert_eq!(report.status, DownloadStatus::Unknown);
        assert_eq!(report.progress, 12.5);
        assert!(!report.status.is_terminal());
    }

    #[test]
    fn test_apply_clamps_progress() {
        let mut session = DownloadSession::pending("abc".into());
        let mut report = StatusReport::with_status(DownloadStatus::Downloading);
        report.progress = 140.0;
        report.filename = "f.zip".into();
        session.apply(&report);
        assert_eq!(session.progress, 100.0);
        assert_eq!(session.filename, "f.zip");
        assert_eq!(session.status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_thread_count_at_least_one() {
        assert_eq!(ThreadConfig::new(0, true).thread_count, 1);
    }
}
