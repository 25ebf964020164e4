use indicatif::{ProgressBar, ProgressStyle};
use super::memory::MemoryView;
use super::{DownloadForm, ModalState, Theme, View};

/// Renders the page to the terminal. Page state lives in a [`MemoryView`];
/// this type only mirrors changes to stdout and an `indicatif` bar.
pub struct TerminalView {
    page: MemoryView,
    bar: ProgressBar,
}

impl TerminalView {
    pub fn new(theme: Theme, format_id: &str) -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        bar.set_style(style);

        Self {
            page: MemoryView::new(theme, format_id),
            bar,
        }
    }

    /// Prints a line above the progress bar without tearing it.
    pub fn println(&self, line: impl AsRef<str>) {
        self.bar.println(line.as_ref());
    }

    pub fn finish(&self) {
        self.bar.abandon();
    }
}

/// Parses a CSS percentage width into a bar position.
fn width_to_position(width: &str) -> u64 {
    width
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .map(|percent| percent.clamp(0.0, 100.0).round() as u64)
        .unwrap_or(0)
}

/// Lines printed when the history modal changes state. Closing an already
/// hidden modal prints nothing.
fn modal_lines(previous: ModalState, next: ModalState, items: &[String]) -> Vec<String> {
    match (previous, next) {
        (_, ModalState::Visible) => {
            let mut lines = vec![format!("── History ({}) ──", items.len())];
            lines.extend(items.iter().map(|item| format!("  • {}", item)));
            lines
        }
        (ModalState::Visible, ModalState::Hidden) => vec!["── History closed ──".to_string()],
        (ModalState::Hidden, ModalState::Hidden) => Vec::new(),
    }
}

impl View for TerminalView {
    fn apply_theme(&self, theme: Theme) {
        self.page.apply_theme(theme);
        self.println(format!("{} theme: {}", theme.toggle_icon(), theme.body_class()));
    }

    fn set_folder_text(&self, path: &str) {
        self.page.set_folder_text(path);
        self.println(format!("📁 Folder: {}", path));
    }

    fn form(&self) -> DownloadForm {
        self.page.form()
    }

    fn set_form(&self, form: DownloadForm) {
        self.page.set_form(form);
    }

    fn set_progress_width(&self, width: &str) {
        self.page.set_progress_width(width);
        self.bar.set_position(width_to_position(width));
    }

    fn set_progress_text(&self, text: &str) {
        self.page.set_progress_text(text);
        self.bar.set_message(text.to_string());
    }

    fn alert(&self, message: &str) {
        self.page.alert(message);
        self.println(format!("⚠️  {}", message));
    }

    fn render_history(&self, items: &[String]) {
        self.page.render_history(items);
    }

    fn set_modal(&self, state: ModalState) {
        let previous = self.page.snapshot().modal;
        self.page.set_modal(state);
        for line in modal_lines(previous, state, &self.page.snapshot().history_items) {
            self.println(line);
        }
    }
}
