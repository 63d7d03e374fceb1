use std::path::PathBuf;
use std::sync::Arc;

use iced::Task;
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult};
use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::application::{PollEvent, SessionController, SessionUpdate};
use crate::config::Settings;
use crate::domain::{AppError, DownloadSession, DownloadStatus, HistoryRecord};
use crate::ui::{DownloadMessage, DownloadView};

type Controller = Arc<Mutex<SessionController<ApiClient>>>;

pub struct DownloadApp {
    view: DownloadView,
    // Poll results and user intents reach the controller from separate tasks.
    controller: Controller,
}

impl DownloadApp {
    pub fn boot(service: Arc<ApiClient>, settings: &Settings) -> (Self, Task<Message>) {
        let (controller, events) = SessionController::new(service, settings.poll_config());
        let app = Self {
            view: DownloadView::new(settings.thread_config()),
            controller: Arc::new(Mutex::new(controller)),
        };

        let controller = app.controller.clone();
        let load_default_path = Task::perform(
            async move {
                let controller = controller.lock().await;
                // Bind before returning so the future is dropped ahead of the guard.
                let path = controller.default_save_path().await;
                path
            },
            Message::DefaultPathLoaded,
        );

        let tasks = Task::batch([
            Task::stream(events.into_stream()).map(Message::Polled),
            load_default_path,
            refresh_queue(app.controller.clone()),
            refresh_history(app.controller.clone()),
        ]);
        (app, tasks)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    DefaultPathLoaded(Result<String, AppError>),
    FolderPicked(Option<PathBuf>),
    DownloadStarted(Result<Option<DownloadSession>, AppError>),
    CancelRequested(Result<(), AppError>),
    Polled(PollEvent),
    /// Outcome of a poll result plus the history snapshot after it
    SessionUpdated(SessionUpdate, Vec<HistoryRecord>),
    QueueUpdated(Result<Vec<String>, AppError>),
    QueueProcessed(Result<(String, Vec<String>), AppError>),
    HistoryUpdated(Result<Vec<HistoryRecord>, AppError>),
    /// `None` when the user declined the confirmation
    HistoryCleared(Option<(Result<(), AppError>, Vec<HistoryRecord>)>),
    FolderShown(Result<String, AppError>),
}

fn refresh_queue(controller: Controller) -> Task<Message> {
    Task::perform(
        async move {
            let mut controller = controller.lock().await;
            let refreshed = controller.refresh_queue().await;
            refreshed.map(|_| controller.queue().to_vec())
        },
        Message::QueueUpdated,
    )
}

fn refresh_history(controller: Controller) -> Task<Message> {
    Task::perform(
        async move {
            let mut controller = controller.lock().await;
            let refreshed = controller.refresh_history().await;
            refreshed.map(|_| controller.history().to_vec())
        },
        Message::HistoryUpdated,
    )
}

fn handle_intent(app: &mut DownloadApp, intent: DownloadMessage) -> Task<Message> {
    let controller = app.controller.clone();

    match intent {
        DownloadMessage::BrowsePressed => Task::perform(
            async {
                AsyncFileDialog::new()
                    .pick_folder()
                    .await
                    .map(|handle| handle.path().to_path_buf())
            },
            Message::FolderPicked,
        ),
        DownloadMessage::DownloadPressed => {
            let url = app.view.url.clone();
            let save_path = app.view.save_path.clone();
            let threads = app.view.thread_config();
            app.view.status_message = "Starting download...".to_string();

            Task::perform(
                async move {
                    let mut controller = controller.lock().await;
                    let started = controller.start_download(&url, &save_path, threads).await;
                    started.map(|_| controller.session().cloned())
                },
                Message::DownloadStarted,
            )
        }
        DownloadMessage::CancelPressed => Task::perform(
            async move {
                let mut controller = controller.lock().await;
                let cancelled = controller.cancel_active_download().await;
                cancelled
            },
            Message::CancelRequested,
        ),
        DownloadMessage::AddToQueuePressed => {
            let url = app.view.url.clone();
            Task::perform(
                async move {
                    let mut controller = controller.lock().await;
                    let added = controller.add_to_queue(&url).await;
                    added.map(|_| controller.queue().to_vec())
                },
                Message::QueueUpdated,
            )
        }
        DownloadMessage::RemoveFromQueuePressed => {
            let index = app.view.selected_queue;
            Task::perform(
                async move {
                    let mut controller = controller.lock().await;
                    let removed = controller.remove_from_queue(index).await;
                    removed.map(|_| controller.queue().to_vec())
                },
                Message::QueueUpdated,
            )
        }
        DownloadMessage::ProcessQueuePressed => {
            let save_path = app.view.save_path.clone();
            let threads = app.view.thread_config();
            Task::perform(
                async move {
                    let mut controller = controller.lock().await;
                    let message = controller.process_queue(&save_path, threads).await?;
                    Ok::<_, AppError>((message, controller.queue().to_vec()))
                },
                Message::QueueProcessed,
            )
        }
        DownloadMessage::RefreshHistoryPressed => refresh_history(controller),
        DownloadMessage::ClearHistoryPressed => Task::perform(
            async move {
                let answer = AsyncMessageDialog::new()
                    .set_title("Clear history")
                    .set_description("Remove all entries from the download history?")
                    .set_buttons(MessageButtons::YesNo)
                    .show()
                    .await;
                if !matches!(answer, MessageDialogResult::Yes) {
                    return None;
                }

                let mut controller = controller.lock().await;
                let cleared = controller.clear_history().await;
                Some((cleared, controller.history().to_vec()))
            },
            Message::HistoryCleared,
        ),
        DownloadMessage::ShowFolderPressed => {
            let path = app.view.selected_folder();
            Task::perform(
                async move {
                    let controller = controller.lock().await;
                    let shown = controller.show_folder(&path).await;
                    shown
                },
                Message::FolderShown,
            )
        }
        _ => Task::none(),
    }
}

fn describe_error(err: &AppError) -> String {
    match err {
        e if e.is_local() => e.to_string(),
        AppError::Remote(message) => format!("Error: {}", message),
        _ => "Could not reach the download service.".to_string(),
    }
}

fn finished_message(session: &DownloadSession) -> String {
    match session.status {
        DownloadStatus::Completed => format!("Download complete: {}", session.filename),
        DownloadStatus::Cancelled => "Download cancelled".to_string(),
        _ => format!("Download failed: {}", session.filename),
    }
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());
            return handle_intent(app, ui_msg);
        }
        Message::DefaultPathLoaded(result) => match result {
            Ok(path) => {
                if app.view.save_path.is_empty() {
                    app.view.save_path = path;
                }
            }
            Err(e) => {
                app.view.status_message =
                    format!("Failed to load default folder: {}", describe_error(&e));
            }
        },
        Message::FolderPicked(path_opt) => {
            if let Some(path) = path_opt {
                app.view.save_path = path.display().to_string();
            }
        }
        Message::DownloadStarted(result) => match result {
            Ok(session) => {
                app.view.session = session;
                app.view.status_message = "Download started".to_string();
            }
            Err(e) => {
                app.view.status_message = describe_error(&e);
            }
        },
        Message::CancelRequested(result) => match result {
            Ok(()) => {
                if let Some(session) = app.view.session.as_mut() {
                    session.cancel_requested = true;
                }
            }
            Err(e) => {
                app.view.status_message = format!("Cancel failed: {}", describe_error(&e));
            }
        },
        Message::Polled(event) => {
            let controller = app.controller.clone();
            return Task::perform(
                async move {
                    let mut controller = controller.lock().await;
                    let update = controller.on_poll_result(event).await;
                    (update, controller.history().to_vec())
                },
                |(update, history)| Message::SessionUpdated(update, history),
            );
        }
        Message::SessionUpdated(update, history) => match update {
            SessionUpdate::Progress(session) => {
                app.view.session = Some(session);
            }
            SessionUpdate::Finished(session) => {
                app.view.session = None;
                app.view.status_message = finished_message(&session);
                app.view.set_history(history);
            }
            SessionUpdate::Lost(_) => {
                app.view.session = None;
            }
            SessionUpdate::Ignored | SessionUpdate::PollFailed(_) => {}
        },
        Message::QueueUpdated(result) => match result {
            Ok(queue) => app.view.set_queue(queue),
            Err(e) => app.view.status_message = describe_error(&e),
        },
        Message::QueueProcessed(result) => match result {
            Ok((message, queue)) => {
                app.view.status_message = message;
                app.view.set_queue(queue);
            }
            Err(e) => app.view.status_message = describe_error(&e),
        },
        Message::HistoryUpdated(result) => match result {
            Ok(history) => app.view.set_history(history),
            Err(e) => app.view.status_message = describe_error(&e),
        },
        Message::HistoryCleared(result) => match result {
            Some((cleared, history)) => {
                app.view.set_history(history);
                if let Err(e) = cleared {
                    app.view.status_message = describe_error(&e);
                }
            }
            None => {}
        },
        Message::FolderShown(result) => match result {
            Ok(path) => {
                app.view.status_message = format!(
                    "Opening folders is not supported here. Folder path: {}",
                    path
                );
            }
            Err(e) => app.view.status_message = describe_error(&e),
        },
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
