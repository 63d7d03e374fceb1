use iced::{
    widget::{button, column, progress_bar, row, scrollable, text, text_input, Column, Space},
    Element, Length,
};

use crate::domain::{DownloadSession, DownloadStatus, HistoryRecord, ThreadConfig};
use crate::utils::{format_size, format_speed};

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub save_path: String,
    pub thread_count: String,
    pub use_threads: bool,
    pub status_message: String,
    pub session: Option<DownloadSession>,
    pub queue: Vec<String>,
    pub selected_queue: Option<usize>,
    pub history: Vec<HistoryRecord>,
    pub selected_history: Option<usize>,
}

impl DownloadView {
    pub fn new(threads: ThreadConfig) -> Self {
        Self {
            url: String::new(),
            save_path: String::new(),
            thread_count: threads.thread_count.to_string(),
            use_threads: threads.use_threads,
            status_message: "Enter a URL to download".to_string(),
            session: None,
            queue: Vec::new(),
            selected_queue: None,
            history: Vec::new(),
            selected_history: None,
        }
    }

    pub fn thread_config(&self) -> ThreadConfig {
        ThreadConfig::new(self.thread_count.parse().unwrap_or(1), self.use_threads)
    }

    pub fn selected_folder(&self) -> String {
        self.selected_history
            .and_then(|i| self.history.get(i))
            .map(|record| record.save_path.clone())
            .unwrap_or_default()
    }

    pub fn set_queue(&mut self, queue: Vec<String>) {
        self.queue = queue;
        self.selected_queue = None;
    }

    pub fn set_history(&mut self, history: Vec<HistoryRecord>) {
        self.history = history;
        self.selected_history = None;
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    SavePathChanged(String),
    ThreadCountChanged(String),
    UseThreadsToggled,
    BrowsePressed,
    DownloadPressed,
    CancelPressed,
    AddToQueuePressed,
    QueueEntrySelected(usize),
    RemoveFromQueuePressed,
    ProcessQueuePressed,
    HistoryEntrySelected(usize),
    RefreshHistoryPressed,
    ClearHistoryPressed,
    ShowFolderPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::SavePathChanged(path) => {
                self.save_path = path;
            }
            DownloadMessage::ThreadCountChanged(count) => {
                self.thread_count = count.chars().filter(char::is_ascii_digit).collect();
            }
            DownloadMessage::UseThreadsToggled => {
                self.use_threads = !self.use_threads;
            }
            DownloadMessage::QueueEntrySelected(index) => {
                self.selected_queue = Some(index);
            }
            DownloadMessage::HistoryEntrySelected(index) => {
                self.selected_history = Some(index);
            }
            // Will be handled by the app
            _ => {}
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let busy = self.session.is_some();

        column![
            text("Download Manager").size(32),
            Space::new().height(Length::Fixed(10.0)),
            text("URL:").size(16),
            text_input("https://example.com/file.zip", &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(10),
            text("Save to:").size(16),
            row![
                text_input("Default download folder", &self.save_path)
                    .on_input(DownloadMessage::SavePathChanged)
                    .padding(10),
                button("Browse...")
                    .on_press(DownloadMessage::BrowsePressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            row![
                text("Threads:").size(16),
                text_input("1", &self.thread_count)
                    .on_input(DownloadMessage::ThreadCountChanged)
                    .width(Length::Fixed(60.0))
                    .padding(5),
                button(text(if self.use_threads {
                    "Multi-threaded: on"
                } else {
                    "Multi-threaded: off"
                }))
                .on_press(DownloadMessage::UseThreadsToggled),
            ]
            .spacing(10),
            row![
                button("Download")
                    .on_press_maybe((!busy).then_some(DownloadMessage::DownloadPressed))
                    .padding([10, 20]),
                button("Cancel")
                    .on_press_maybe(busy.then_some(DownloadMessage::CancelPressed))
                    .padding([10, 20]),
                button("Add to queue")
                    .on_press(DownloadMessage::AddToQueuePressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            self.progress_panel(),
            text(&self.status_message).size(14),
            Space::new().height(Length::Fixed(10.0)),
            self.queue_panel(),
            self.history_panel(),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }

    fn progress_panel(&self) -> Element<'_, DownloadMessage> {
        let Some(session) = &self.session else {
            return Space::new().height(Length::Fixed(0.0)).into();
        };

        let filename = if session.filename.is_empty() {
            "Fetching file info..."
        } else {
            session.filename.as_str()
        };
        let status = if session.cancel_requested && !session.status.is_terminal() {
            "Cancelling..."
        } else {
            session.status.label()
        };

        column![
            text(format!("File: {}", filename)).size(16),
            progress_bar(0.0..=100.0, session.progress as f32),
            text(format!(
                "{} | {:.1}% | {} of {} | {}",
                status,
                session.progress,
                format_size(session.downloaded_size, 2),
                format_size(session.total_size, 2),
                format_speed(session.speed),
            ))
            .size(14),
        ]
        .spacing(5)
        .into()
    }

    fn queue_panel(&self) -> Element<'_, DownloadMessage> {
        let entries = self.queue.iter().enumerate().map(|(i, url)| {
            list_entry(
                url.clone(),
                self.selected_queue == Some(i),
                DownloadMessage::QueueEntrySelected(i),
            )
        });

        column![
            text(format!("Queue ({})", self.queue.len())).size(20),
            scrollable(Column::with_children(entries).spacing(2)).height(Length::Fixed(120.0)),
            row![
                button("Remove").on_press(DownloadMessage::RemoveFromQueuePressed),
                button("Start queue").on_press(DownloadMessage::ProcessQueuePressed),
            ]
            .spacing(10),
        ]
        .spacing(5)
        .into()
    }

    fn history_panel(&self) -> Element<'_, DownloadMessage> {
        let list: Element<'_, DownloadMessage> = if self.history.is_empty() {
            text("Download history is empty").size(14).into()
        } else {
            let entries = self.history.iter().enumerate().map(|(i, record)| {
                list_entry(
                    history_line(record),
                    self.selected_history == Some(i),
                    DownloadMessage::HistoryEntrySelected(i),
                )
            });
            scrollable(Column::with_children(entries).spacing(2))
                .height(Length::Fixed(160.0))
                .into()
        };

        column![
            text("History").size(20),
            list,
            row![
                button("Refresh").on_press(DownloadMessage::RefreshHistoryPressed),
                button("Show folder").on_press(DownloadMessage::ShowFolderPressed),
                button("Clear history").on_press(DownloadMessage::ClearHistoryPressed),
            ]
            .spacing(10),
        ]
        .spacing(5)
        .into()
    }
}

fn list_entry(
    label: String,
    selected: bool,
    on_press: DownloadMessage,
) -> Element<'static, DownloadMessage> {
    let label = if selected {
        format!("> {}", label)
    } else {
        label
    };
    button(text(label))
        .width(Length::Fill)
        .on_press(on_press)
        .into()
}

fn history_line(record: &HistoryRecord) -> String {
    let status = match record.status {
        DownloadStatus::Completed | DownloadStatus::Error | DownloadStatus::Cancelled => {
            record.status.label()
        }
        _ => "Unknown",
    };
    format!(
        "{} | {} | {} | {} | {}",
        record.filename,
        format_size(record.total_size, 2),
        record.date,
        status,
        record.save_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_count_input_keeps_digits() {
        let mut view = DownloadView::new(ThreadConfig::default());
        view.update(DownloadMessage::ThreadCountChanged("1a2".into()));
        assert_eq!(view.thread_count, "12");
        assert_eq!(view.thread_config().thread_count, 12);

        view.update(DownloadMessage::ThreadCountChanged(String::new()));
        assert_eq!(view.thread_config().thread_count, 1);
    }

    #[test]
    fn test_selected_folder() {
        let mut view = DownloadView::new(ThreadConfig::default());
        assert_eq!(view.selected_folder(), "");

        view.set_history(vec![HistoryRecord {
            id: None,
            url: None,
            filename: "a.bin".into(),
            total_size: 1024,
            date: "2024-01-01 10:00:00".into(),
            status: DownloadStatus::Completed,
            save_path: "/srv/files".into(),
            file_path: None,
            duration: None,
        }]);
        view.update(DownloadMessage::HistoryEntrySelected(0));
        assert_eq!(view.selected_folder(), "/srv/files");
        assert!(history_line(&view.history[0]).contains("1.00 KB"));
    }
}
