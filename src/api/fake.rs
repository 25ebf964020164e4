//! In-memory backend used by controller and poller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use super::{BackendApi, DownloadRequest, FolderChoice, HistoryEntry, ProgressSnapshot};
use crate::errors::{AppError, Result};

#[derive(Default)]
pub struct FakeBackend {
    pub folder_choices: Mutex<VecDeque<Result<FolderChoice>>>,
    pub download_status: Mutex<Option<Result<u16>>>,
    pub submitted: Mutex<Vec<DownloadRequest>>,
    pub progress: Mutex<Option<ProgressSnapshot>>,
    pub progress_delay: Option<Duration>,
    pub history: Mutex<Option<Vec<HistoryEntry>>>,
    pub progress_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_delay(delay: Duration) -> Self {
        Self {
            progress_delay: Some(delay),
            ..Self::default()
        }
    }

    pub async fn push_folder(&self, choice: Result<FolderChoice>) {
        self.folder_choices.lock().await.push_back(choice);
    }

    pub async fn set_download_status(&self, status: Result<u16>) {
        *self.download_status.lock().await = Some(status);
    }

    pub async fn set_progress(&self, snapshot: Option<ProgressSnapshot>) {
        *self.progress.lock().await = snapshot;
    }

    pub async fn set_history(&self, entries: Option<Vec<HistoryEntry>>) {
        *self.history.lock().await = entries;
    }

    pub fn progress_calls(&self) -> usize {
        self.progress_calls.load(Ordering::SeqCst)
    }
}

fn unreachable_backend() -> AppError {
    AppError::Api("backend unreachable".to_string())
}

#[async_trait::async_trait]
impl BackendApi for FakeBackend {
    async fn choose_folder(&self) -> Result<FolderChoice> {
        self.folder_choices
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(FolderChoice::default()))
    }

    async fn submit_download(&self, request: &DownloadRequest) -> Result<u16> {
        self.submitted.lock().await.push(request.clone());
        match self.download_status.lock().await.take() {
            Some(status) => status,
            None => Ok(200),
        }
    }

    async fn progress(&self) -> Result<ProgressSnapshot> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.progress_delay {
            tokio::time::sleep(delay).await;
        }

        let result = self.progress.lock().await.clone().ok_or_else(unreachable_backend);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.history.lock().await.clone().ok_or_else(unreachable_backend)
    }
}
