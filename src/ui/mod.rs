pub mod memory;
pub mod terminal;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::AppError;

/// Two-state visual theme. Exactly one body class is active at any time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Label of the toggle button: a sun while dark is active, a moon otherwise.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Visible,
}

/// Elements of the page the controller binds to, addressed by their DOM ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    ThemeToggle,
    FolderBtn,
    FolderPath,
    DownloadBtn,
    UrlInput,
    FormatSelect,
    Mp3Check,
    ProgressBar,
    ProgressText,
    HistoryBtn,
    HistoryModal,
    Close,
    HistoryList,
}

impl ElementId {
    pub const ALL: [ElementId; 13] = [
        ElementId::ThemeToggle,
        ElementId::FolderBtn,
        ElementId::FolderPath,
        ElementId::DownloadBtn,
        ElementId::UrlInput,
        ElementId::FormatSelect,
        ElementId::Mp3Check,
        ElementId::ProgressBar,
        ElementId::ProgressText,
        ElementId::HistoryBtn,
        ElementId::HistoryModal,
        ElementId::Close,
        ElementId::HistoryList,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementId::ThemeToggle => "theme-toggle",
            ElementId::FolderBtn => "folder-btn",
            ElementId::FolderPath => "folder-path",
            ElementId::DownloadBtn => "download-btn",
            ElementId::UrlInput => "url-input",
            ElementId::FormatSelect => "format-select",
            ElementId::Mp3Check => "mp3-check",
            ElementId::ProgressBar => "progress-bar",
            ElementId::ProgressText => "progress-text",
            ElementId::HistoryBtn => "history-btn",
            ElementId::HistoryModal => "history-modal",
            ElementId::Close => ".close",
            ElementId::HistoryList => "history-list",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown element: {}", s)))
    }
}

/// Current values of the download form controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DownloadForm {
    pub url: String,
    pub format_id: String,
    pub mp3: bool,
}

/// The page surface the controller renders into and reads form state from.
///
/// Implementations use interior mutability; the controller and the progress
/// poller share one view.
pub trait View: Send + Sync {
    fn apply_theme(&self, theme: Theme);
    fn set_folder_text(&self, path: &str);
    fn form(&self) -> DownloadForm;
    fn set_form(&self, form: DownloadForm);
    /// `width` is a CSS width such as `"42%"`.
    fn set_progress_width(&self, width: &str);
    fn set_progress_text(&self, text: &str);
    fn alert(&self, message: &str);
    /// Replaces the whole history list.
    fn render_history(&self, items: &[String]);
    fn set_modal(&self, state: ModalState);
}
