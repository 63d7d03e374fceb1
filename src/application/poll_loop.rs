use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::api::{ApiError, RemoteService};
use crate::domain::{AppError, StatusReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    /// Upper bound for a single status request.
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

/// One status result, tagged with the session it was requested for.
#[derive(Debug, Clone)]
pub struct PollEvent {
    pub session_id: String,
    pub result: Result<StatusReport, AppError>,
}

/// Receiving half of the poll channel.
pub struct PollEvents {
    rx: mpsc::UnboundedReceiver<PollEvent>,
}

impl PollEvents {
    pub fn channel() -> (mpsc::UnboundedSender<PollEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    #[cfg(test)]
    pub async fn next(&mut self) -> Option<PollEvent> {
        self.rx.recv().await
    }

    pub fn into_stream(self) -> BoxStream<'static, PollEvent> {
        stream::unfold(self.rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })
        .boxed()
    }
}

/// Timer task that polls one session's status and forwards every result.
///
/// The loop never touches session state itself; the controller is the only
/// writer and decides what each [`PollEvent`] means.
pub struct PollLoop {
    config: PollConfig,
    handle: Option<JoinHandle<()>>,
}

impl PollLoop {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    pub fn start<S: RemoteService>(
        &mut self,
        session_id: String,
        service: Arc<S>,
        sink: mpsc::UnboundedSender<PollEvent>,
    ) {
        self.stop();

        let PollConfig {
            interval,
            request_timeout,
        } = self.config;
        debug!(%session_id, ?interval, "Starting status polling");

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; wait a full period before the first query.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let request = service.download_status(&session_id);
                let result = match tokio::time::timeout(request_timeout, request).await {
                    Ok(result) => result.map_err(AppError::from),
                    Err(_) => Err(AppError::from(ApiError::Timeout)),
                };

                let event = PollEvent {
                    session_id: session_id.clone(),
                    result,
                };
                if sink.send(event).is_err() {
                    debug!(%session_id, "Poll receiver dropped, stopping");
                    break;
                }
            }
        }));
    }

    /// Cancel the timer. Calling this with nothing running does nothing.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Stopped status polling");
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeService;
    use crate::domain::DownloadStatus;

    fn fast_config() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(10),
            request_timeout: Duration::from_millis(200),
        }
    }

    async fn next_event(events: &mut PollEvents) -> PollEvent {
        tokio::time::timeout(Duration::from_secs(2), events.next())
            .await
            .expect("poll event within deadline")
            .expect("channel open")
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut poll = PollLoop::new(fast_config());
        poll.stop();
        poll.stop();
        assert!(!poll.is_running());
    }

    #[tokio::test]
    async fn test_stop_twice_after_start() {
        let service = Arc::new(FakeService::new());
        let (tx, _events) = PollEvents::channel();
        let mut poll = PollLoop::new(fast_config());

        poll.start("abc".into(), service, tx);
        assert!(poll.is_running());

        poll.stop();
        poll.stop();
        assert!(!poll.is_running());
    }

    #[tokio::test]
    async fn test_delivers_tagged_results() {
        let service = Arc::new(FakeService::new());
        service.push_status(DownloadStatus::Downloading, 40.0);
        let (tx, mut events) = PollEvents::channel();
        let mut poll = PollLoop::new(fast_config());

        poll.start("abc".into(), service.clone(), tx);
        let event = next_event(&mut events).await;

        assert_eq!(event.session_id, "abc");
        let report = event.result.unwrap();
        assert_eq!(report.status, DownloadStatus::Downloading);
        assert_eq!(report.progress, 40.0);
        poll.stop();
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_subscription() {
        let service = Arc::new(FakeService::new());
        let (tx, mut events) = PollEvents::channel();
        let mut poll = PollLoop::new(fast_config());

        poll.start("first".into(), service.clone(), tx.clone());
        poll.start("second".into(), service.clone(), tx);

        // Drain anything the first task sent before it was aborted.
        let mut event = next_event(&mut events).await;
        while event.session_id == "first" {
            event = next_event(&mut events).await;
        }
        for _ in 0..3 {
            assert_eq!(next_event(&mut events).await.session_id, "second");
        }
        poll.stop();
    }

    #[tokio::test]
    async fn test_hanging_request_times_out() {
        let service = Arc::new(FakeService::new());
        service.hang_status_for(Duration::from_secs(5));
        let (tx, mut events) = PollEvents::channel();
        let mut poll = PollLoop::new(PollConfig {
            interval: Duration::from_millis(10),
            request_timeout: Duration::from_millis(30),
        });

        poll.start("abc".into(), service, tx);
        let event = next_event(&mut events).await;

        assert!(matches!(event.result, Err(AppError::Transport(_))));
        poll.stop();
    }

    #[tokio::test]
    async fn test_loop_ends_when_receiver_dropped() {
        let service = Arc::new(FakeService::new());
        let (tx, events) = PollEvents::channel();
        let mut poll = PollLoop::new(fast_config());

        poll.start("abc".into(), service, tx);
        drop(events);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!poll.is_running());
    }
}
