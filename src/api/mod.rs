pub mod client;
#[cfg(test)]
pub mod fake;

use serde::{Deserialize, Deserializer, Serialize};
use crate::errors::Result;

/// Response of `GET /choose_folder`. `path` is absent or empty when the user
/// cancelled the native dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FolderChoice {
    #[serde(default)]
    pub path: Option<String>,
}

impl FolderChoice {
    pub fn usable_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|path| !path.is_empty())
    }
}

/// Body of `POST /download`. Field order is the wire order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    pub mp3: bool,
    pub folder: String,
}

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ProgressSnapshot {
    /// CSS width of the progress bar, e.g. `"42%"`.
    pub fn bar_width(&self) -> String {
        format!("{}%", self.percent)
    }

    /// `status`, plus ` - title` when a non-empty title is present.
    pub fn label(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => format!("{} - {}", self.status, title),
            _ => self.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub time: String,
    pub title: String,
}

impl HistoryEntry {
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.time, self.title)
    }
}

/// The download service as seen by the controller.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    async fn choose_folder(&self) -> Result<FolderChoice>;
    /// Returns the HTTP status of the response; the body is not inspected.
    async fn submit_download(&self, request: &DownloadRequest) -> Result<u16>;
    async fn progress(&self) -> Result<ProgressSnapshot>;
    async fn history(&self) -> Result<Vec<HistoryEntry>>;
}
