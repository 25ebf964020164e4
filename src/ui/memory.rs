use std::sync::{Mutex, MutexGuard};
use super::{DownloadForm, ModalState, Theme, View};

/// Snapshot of every element the controller touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub body_class: &'static str,
    pub theme_icon: &'static str,
    pub folder_text: String,
    pub form: DownloadForm,
    pub progress_width: String,
    pub progress_text: String,
    pub history_items: Vec<String>,
    pub modal: ModalState,
    pub alerts: Vec<String>,
}

/// In-memory page. Backs the terminal view and stands in for the DOM in tests.
pub struct MemoryView {
    state: Mutex<PageState>,
}

impl MemoryView {
    pub fn new(theme: Theme, format_id: &str) -> Self {
        let state = PageState {
            body_class: theme.body_class(),
            theme_icon: theme.toggle_icon(),
            form: DownloadForm {
                format_id: format_id.to_string(),
                ..DownloadForm::default()
            },
            progress_width: "0%".to_string(),
            ..PageState::default()
        };

        Self {
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        // Every write leaves the page consistent, so poisoning is recoverable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl View for MemoryView {
    fn apply_theme(&self, theme: Theme) {
        let mut state = self.lock();
        state.body_class = theme.body_class();
        state.theme_icon = theme.toggle_icon();
    }

    fn set_folder_text(&self, path: &str) {
        self.lock().folder_text = path.to_string();
    }

    fn form(&self) -> DownloadForm {
        self.lock().form.clone()
    }

    fn set_form(&self, form: DownloadForm) {
        self.lock().form = form;
    }

    fn set_progress_width(&self, width: &str) {
        self.lock().progress_width = width.to_string();
    }

    fn set_progress_text(&self, text: &str) {
        self.lock().progress_text = text.to_string();
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn render_history(&self, items: &[String]) {
        let mut state = self.lock();
        state.history_items.clear();
        state.history_items.extend_from_slice(items);
    }

    fn set_modal(&self, modal: ModalState) {
        self.lock().modal = modal;
    }
}
