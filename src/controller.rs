use std::sync::Arc;
use log::{debug, info, warn};
use tokio::sync::{Mutex, RwLock};

use crate::api::{BackendApi, DownloadRequest};
use crate::errors::{AppError, Result};
use crate::ui::{ElementId, ModalState, Theme, View};
use crate::validation::InputValidator;

pub const EMPTY_URL_ALERT: &str = "Paste a URL!";
pub const STARTING_TEXT: &str = "Starting...";

/// Result of a click on the download button.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form was rejected locally; no request was sent.
    Rejected,
    /// The server answered with `status`. Its body is not inspected.
    Submitted { status: u16 },
}

/// Owns all page state and wires element events to the backend.
pub struct UiController {
    api: Arc<dyn BackendApi>,
    view: Arc<dyn View>,
    validator: InputValidator,
    theme: Mutex<Theme>,
    selected_folder: RwLock<String>,
    modal: Mutex<ModalState>,
}

impl UiController {
    pub fn new(api: Arc<dyn BackendApi>, view: Arc<dyn View>, theme: Theme, strict_urls: bool) -> Self {
        view.apply_theme(theme);

        Self {
            api,
            view,
            validator: InputValidator::new(strict_urls),
            theme: Mutex::new(theme),
            selected_folder: RwLock::new(String::new()),
            modal: Mutex::new(ModalState::Hidden),
        }
    }

    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.lock().await
    }

    pub async fn selected_folder(&self) -> String {
        self.selected_folder.read().await.clone()
    }

    pub async fn modal_state(&self) -> ModalState {
        *self.modal.lock().await
    }

    /// Routes a click: the element's own handler first, then the window-level
    /// backdrop check of the history modal.
    pub async fn handle_click(&self, target: ElementId) -> Result<()> {
        let result = match target {
            ElementId::ThemeToggle => {
                self.toggle_theme().await;
                Ok(())
            }
            ElementId::FolderBtn => self.choose_folder().await.map(|_| ()),
            ElementId::DownloadBtn => self.submit_download().await.map(|_| ()),
            ElementId::HistoryBtn => self.open_history().await.map(|_| ()),
            ElementId::Close => {
                self.close_history().await;
                Ok(())
            }
            _ => Ok(()),
        };

        self.window_click(target).await;
        result
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut theme = self.theme.lock().await;
        *theme = theme.toggled();
        self.view.apply_theme(*theme);
        debug!("Theme switched to {}", theme.body_class());
        *theme
    }

    /// Asks the server for a folder. Returns the new folder, or `None` when the
    /// chooser was cancelled and the previous folder is kept.
    pub async fn choose_folder(&self) -> Result<Option<String>> {
        let choice = self.api.choose_folder().await.map_err(|e| {
            warn!("Folder chooser failed: {}", e);
            e
        })?;

        match choice.usable_path() {
            Some(path) => {
                *self.selected_folder.write().await = path.to_string();
                self.view.set_folder_text(path);
                info!("Selected folder: {}", path);
                Ok(Some(path.to_string()))
            }
            None => {
                debug!("Folder chooser returned no path; keeping current folder");
                Ok(None)
            }
        }
    }

    pub async fn submit_download(&self) -> Result<SubmitOutcome> {
        let form = self.view.form();

        let url = match self.validator.normalize_url(&form.url) {
            Some(url) => url,
            None => {
                self.view.alert(EMPTY_URL_ALERT);
                return Ok(SubmitOutcome::Rejected);
            }
        };

        if let Err(e) = self.validator.validate_url(&url) {
            match e {
                AppError::Validation(reason) => self.view.alert(&reason),
                other => self.view.alert(&other.to_string()),
            }
            return Ok(SubmitOutcome::Rejected);
        }

        let request = DownloadRequest {
            url,
            format_id: form.format_id,
            mp3: form.mp3,
            folder: self.selected_folder().await,
        };

        info!("Submitting download: {} (format {}, mp3 {})", request.url, request.format_id, request.mp3);

        match self.api.submit_download(&request).await {
            Ok(status) => {
                if !(200..300).contains(&status) {
                    warn!("Download request answered with HTTP {}", status);
                }
                self.view.set_progress_text(STARTING_TEXT);
                Ok(SubmitOutcome::Submitted { status })
            }
            Err(e) => {
                warn!("Download request failed: {}", e);
                self.view.alert(&format!("Download request failed: {}", e));
                Err(e)
            }
        }
    }

    /// One progress tick: fetch and render. On error the previous render stays.
    pub async fn poll_progress(&self) -> Result<()> {
        let snapshot = self.api.progress().await?;
        self.view.set_progress_width(&snapshot.bar_width());
        self.view.set_progress_text(&snapshot.label());
        Ok(())
    }

    /// Fetches history, renders it and shows the modal. Returns the entry count.
    pub async fn open_history(&self) -> Result<usize> {
        let entries = match self.api.history().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load history: {}", e);
                self.view.alert(&format!("Could not load history: {}", e));
                return Err(e);
            }
        };

        let items: Vec<String> = entries.iter().map(|entry| entry.display_line()).collect();
        self.view.render_history(&items);
        self.set_modal(ModalState::Visible).await;
        Ok(items.len())
    }

    pub async fn close_history(&self) {
        self.set_modal(ModalState::Hidden).await;
    }

    async fn window_click(&self, target: ElementId) {
        if target == ElementId::HistoryModal {
            self.close_history().await;
        }
    }

    async fn set_modal(&self, state: ModalState) {
        let mut modal = self.modal.lock().await;
        *modal = state;
        self.view.set_modal(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::api::{FolderChoice, HistoryEntry, ProgressSnapshot};
    use crate::ui::memory::MemoryView;
    use crate::ui::DownloadForm;

    fn setup() -> (Arc<FakeBackend>, Arc<MemoryView>, UiController) {
        setup_with(false)
    }

    fn setup_with(strict_urls: bool) -> (Arc<FakeBackend>, Arc<MemoryView>, UiController) {
        let api = Arc::new(FakeBackend::new());
        let view = Arc::new(MemoryView::new(Theme::Light, "best"));
        let controller = UiController::new(api.clone(), view.clone(), Theme::Light, strict_urls);
        (api, view, controller)
    }

    fn fill_form(view: &MemoryView, url: &str, format_id: &str, mp3: bool) {
        view.set_form(DownloadForm {
            url: url.to_string(),
            format_id: format_id.to_string(),
            mp3,
        });
    }

    #[tokio::test]
    async fn theme_toggle_keeps_class_and_icon_in_step() {
        let (_, view, controller) = setup();
        assert_eq!(view.snapshot().body_class, "light");
        assert_eq!(view.snapshot().theme_icon, "🌙");

        for clicks in 1..=6 {
            controller.handle_click(ElementId::ThemeToggle).await.unwrap();
            let page = view.snapshot();
            let dark = clicks % 2 == 1;
            assert_eq!(page.body_class, if dark { "dark" } else { "light" });
            assert_eq!(page.theme_icon == "☀️", dark);
            assert_eq!(controller.theme().await == Theme::Dark, dark);
        }
    }

    #[tokio::test]
    async fn chosen_folder_is_displayed_and_sent() {
        let (api, view, controller) = setup();
        api.push_folder(Ok(FolderChoice { path: Some("/music".to_string()) })).await;

        controller.handle_click(ElementId::FolderBtn).await.unwrap();
        assert_eq!(view.snapshot().folder_text, "/music");
        assert_eq!(controller.selected_folder().await, "/music");

        fill_form(&view, "http://example.com/v", "best", true);
        controller.handle_click(ElementId::DownloadBtn).await.unwrap();
        assert_eq!(api.submitted.lock().await[0].folder, "/music");
    }

    #[tokio::test]
    async fn cancelled_chooser_keeps_previous_folder() {
        let (api, view, controller) = setup();
        api.push_folder(Ok(FolderChoice { path: Some("/music".to_string()) })).await;
        api.push_folder(Ok(FolderChoice { path: Some(String::new()) })).await;
        api.push_folder(Ok(FolderChoice { path: None })).await;

        assert_eq!(controller.choose_folder().await.unwrap().as_deref(), Some("/music"));
        assert_eq!(controller.choose_folder().await.unwrap(), None);
        assert_eq!(controller.choose_folder().await.unwrap(), None);

        assert_eq!(controller.selected_folder().await, "/music");
        assert_eq!(view.snapshot().folder_text, "/music");
        assert!(view.snapshot().alerts.is_empty());
    }

    #[tokio::test]
    async fn folder_failure_is_returned_without_alert() {
        let (api, view, controller) = setup();
        api.push_folder(Err(AppError::Api("down".to_string()))).await;

        assert!(controller.handle_click(ElementId::FolderBtn).await.is_err());
        assert_eq!(controller.selected_folder().await, "");
        assert!(view.snapshot().alerts.is_empty());
    }

    #[tokio::test]
    async fn blank_url_alerts_without_network() {
        let (api, view, controller) = setup();
        for blank in ["", "   ", "\t\n "] {
            fill_form(&view, blank, "best", false);
            assert_eq!(controller.submit_download().await.unwrap(), SubmitOutcome::Rejected);
        }

        assert!(api.submitted.lock().await.is_empty());
        assert_eq!(view.snapshot().alerts, vec![EMPTY_URL_ALERT; 3]);
        assert_eq!(view.snapshot().progress_text, "");
    }

    #[tokio::test]
    async fn submit_sends_exact_payload_and_shows_starting() {
        let (api, view, controller) = setup();
        api.push_folder(Ok(FolderChoice { path: Some("/out".to_string()) })).await;
        controller.choose_folder().await.unwrap();

        fill_form(&view, "  http://example.com/v  ", "best", false);
        let outcome = controller.submit_download().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted { status: 200 });

        let submitted = api.submitted.lock().await;
        assert_eq!(submitted.len(), 1);
        assert_eq!(
            serde_json::to_string(&submitted[0]).unwrap(),
            r#"{"url":"http://example.com/v","format_id":"best","mp3":false,"folder":"/out"}"#
        );
        assert_eq!(view.snapshot().progress_text, STARTING_TEXT);
    }

    #[tokio::test]
    async fn submit_without_folder_sends_empty_folder() {
        let (api, view, controller) = setup();
        fill_form(&view, "http://example.com/v", "bestaudio", true);
        controller.submit_download().await.unwrap();

        let submitted = api.submitted.lock().await;
        assert_eq!(submitted[0].folder, "");
        assert!(submitted[0].mp3);
        assert_eq!(submitted[0].format_id, "bestaudio");
    }

    #[tokio::test]
    async fn server_error_status_still_shows_starting() {
        let (api, view, controller) = setup();
        api.set_download_status(Ok(500)).await;
        fill_form(&view, "http://example.com/v", "best", false);

        let outcome = controller.submit_download().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted { status: 500 });
        assert_eq!(view.snapshot().progress_text, STARTING_TEXT);
        assert!(view.snapshot().alerts.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let (api, view, controller) = setup();
        api.set_download_status(Err(AppError::Api("connection refused".to_string()))).await;
        fill_form(&view, "http://example.com/v", "best", false);

        assert!(controller.submit_download().await.is_err());
        let page = view.snapshot();
        assert_eq!(page.progress_text, "");
        assert_eq!(page.alerts.len(), 1);
        assert!(page.alerts[0].starts_with("Download request failed"));
    }

    #[tokio::test]
    async fn strict_mode_rejects_malformed_url_locally() {
        let (api, view, controller) = setup_with(true);
        fill_form(&view, "not a url", "best", false);

        assert_eq!(controller.submit_download().await.unwrap(), SubmitOutcome::Rejected);
        assert!(api.submitted.lock().await.is_empty());
        assert_eq!(view.snapshot().alerts.len(), 1);
        assert!(view.snapshot().alerts[0].starts_with("Invalid URL: "));

        fill_form(&view, "ftp://example.com/v", "best", false);
        assert_eq!(controller.submit_download().await.unwrap(), SubmitOutcome::Rejected);
        assert_eq!(view.snapshot().alerts[1], "Invalid URL: unsupported scheme ftp");
    }

    #[tokio::test]
    async fn poll_renders_progress_and_keeps_it_on_failure() {
        let (api, view, controller) = setup();
        api.set_progress(Some(ProgressSnapshot {
            percent: 42.0,
            status: "Downloading".to_string(),
            title: Some("Song A".to_string()),
        }))
        .await;

        controller.poll_progress().await.unwrap();
        assert_eq!(view.snapshot().progress_width, "42%");
        assert_eq!(view.snapshot().progress_text, "Downloading - Song A");

        api.set_progress(None).await;
        assert!(controller.poll_progress().await.is_err());
        assert_eq!(view.snapshot().progress_width, "42%");
        assert_eq!(view.snapshot().progress_text, "Downloading - Song A");

        api.set_progress(Some(ProgressSnapshot {
            percent: 100.0,
            status: "Done".to_string(),
            title: None,
        }))
        .await;
        controller.poll_progress().await.unwrap();
        assert_eq!(view.snapshot().progress_width, "100%");
        assert_eq!(view.snapshot().progress_text, "Done");
    }

    #[tokio::test]
    async fn history_opens_and_closes() {
        let (api, view, controller) = setup();
        api.set_history(Some(vec![HistoryEntry {
            time: "10:00".to_string(),
            title: "X".to_string(),
        }]))
        .await;
        assert_eq!(controller.modal_state().await, ModalState::Hidden);

        controller.handle_click(ElementId::HistoryBtn).await.unwrap();
        assert_eq!(view.snapshot().history_items, vec!["10:00 - X".to_string()]);
        assert_eq!(view.snapshot().modal, ModalState::Visible);

        controller.handle_click(ElementId::HistoryList).await.unwrap();
        assert_eq!(controller.modal_state().await, ModalState::Visible);

        controller.handle_click(ElementId::Close).await.unwrap();
        assert_eq!(controller.modal_state().await, ModalState::Hidden);
        assert_eq!(view.snapshot().modal, ModalState::Hidden);

        controller.handle_click(ElementId::HistoryBtn).await.unwrap();
        controller.handle_click(ElementId::HistoryModal).await.unwrap();
        assert_eq!(view.snapshot().modal, ModalState::Hidden);
    }

    #[tokio::test]
    async fn reopening_history_replaces_the_list() {
        let (api, view, controller) = setup();
        api.set_history(Some(vec![
            HistoryEntry { time: "09:00".to_string(), title: "A".to_string() },
            HistoryEntry { time: "09:30".to_string(), title: "B".to_string() },
        ]))
        .await;
        assert_eq!(controller.open_history().await.unwrap(), 2);
        controller.close_history().await;

        api.set_history(Some(Vec::new())).await;
        assert_eq!(controller.open_history().await.unwrap(), 0);
        assert!(view.snapshot().history_items.is_empty());
        assert_eq!(view.snapshot().modal, ModalState::Visible);
    }

    #[tokio::test]
    async fn history_failure_alerts_and_leaves_modal_hidden() {
        let (_, view, controller) = setup();

        assert!(controller.handle_click(ElementId::HistoryBtn).await.is_err());
        let page = view.snapshot();
        assert_eq!(page.modal, ModalState::Hidden);
        assert!(page.alerts[0].starts_with("Could not load history"));
    }
}
