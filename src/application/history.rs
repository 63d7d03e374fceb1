use crate::api::RemoteService;
use crate::domain::{AppError, HistoryRecord};

/// Last-fetched snapshot of the service's download history.
#[derive(Debug, Default)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
    stale: bool,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    #[cfg(test)]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Replace the snapshot with the service's current record set.
    pub async fn refresh<S: RemoteService>(&mut self, service: &S) -> Result<(), AppError> {
        self.records = service.get_history().await?;
        self.stale = false;
        Ok(())
    }

    pub async fn ensure_fresh<S: RemoteService>(&mut self, service: &S) -> Result<(), AppError> {
        if self.stale {
            self.refresh(service).await?;
        }
        Ok(())
    }

    pub async fn clear<S: RemoteService>(&mut self, service: &S) -> Result<(), AppError> {
        service.clear_history().await?;
        // The service has nothing left; never show the old records again.
        self.records.clear();
        self.invalidate();
        self.refresh(service).await
    }
}
