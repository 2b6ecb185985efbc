//! Viewer overlay state: the loading indicator and the info text.

const INFO_HEADER: &str = "Current Animation";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    loading_visible: bool,
    info_text: String,
}

impl UiState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_loading(&mut self) {
        self.loading_visible = true;
    }

    pub fn hide_loading(&mut self) {
        self.loading_visible = false;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading_visible
    }

    /// Names the clip now playing.
    pub fn set_current_clip(&mut self, name: &str) {
        self.info_text = format!("{INFO_HEADER}\n{name}");
    }

    pub fn clear_info(&mut self) {
        self.info_text.clear();
    }

    #[must_use]
    pub fn info_text(&self) -> &str {
        &self.info_text
    }

    /// Single-line rendering of the overlay for a window title.
    #[must_use]
    pub fn window_title(&self, base: &str) -> String {
        if self.loading_visible {
            return format!("{base} | Loading...");
        }
        match self.info_text.split_once('\n') {
            Some((_, clip)) => format!("{base} | {clip}"),
            None => base.to_string(),
        }
    }
}
