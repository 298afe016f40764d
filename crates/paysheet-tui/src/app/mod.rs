mod update;

use paysheet_core::{FlowState, Intent, IntentSender, Mode, PaymentType};

use crate::theme::Theme;

/// Which screen is currently displayed. Derived from the flow snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    /// The payment sheet is presented over the main screen.
    Sheet,
    Finished,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Main application state: the latest flow snapshot plus purely visual state.
pub struct App {
    /// Last snapshot published by the flow store.
    pub flow: FlowState,
    /// Where intents go. `None` renders without a backing flow.
    pub intents: Option<IntentSender>,
    pub input_mode: InputMode,
    /// Search text being typed; pushed to the flow on every keystroke.
    pub search_input: String,
    /// Row under the cursor in the filtered list.
    pub list_cursor: usize,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    pub fn new(flow: FlowState, theme: Theme) -> Self {
        Self {
            flow,
            intents: None,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            list_cursor: 0,
            tick: 0,
            theme,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.flow.mode() {
            Mode::Finished => Screen::Finished,
            Mode::Active if self.flow.modal_open() => Screen::Sheet,
            Mode::Active => Screen::Main,
        }
    }

    /// Replace the snapshot, keeping the cursor inside the filtered list.
    pub fn apply_snapshot(&mut self, flow: FlowState) {
        self.flow = flow;
        if !self.flow.modal_open() {
            self.input_mode = InputMode::Normal;
        }
        self.clamp_cursor();
    }

    /// The filtered item under the cursor, if the list is showing.
    pub fn item_at_cursor(&self) -> Option<&PaymentType> {
        if self.flow.is_loading() {
            return None;
        }
        self.flow.filtered_items().get(self.list_cursor).copied()
    }

    pub(super) fn clamp_cursor(&mut self) {
        let len = self.flow.filtered_items().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    pub(super) fn send(&self, intent: Intent) {
        if let Some(tx) = &self.intents
            && !tx.send(intent)
        {
            tracing::warn!("flow stopped; intent dropped");
        }
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        match self.screen() {
            Screen::Finished => crate::view::finished::render(f, &self.theme),
            Screen::Main => crate::view::main_screen::render(f, self),
            Screen::Sheet => {
                crate::view::main_screen::render(f, self);
                crate::view::sheet::render(f, self);
            }
        }
    }
}
