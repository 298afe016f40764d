use paysheet_core::Intent;

use super::{App, InputMode, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            _ => {}
        }

        match self.screen() {
            Screen::Finished => {}
            Screen::Main => self.update_main(action),
            Screen::Sheet => match self.input_mode {
                InputMode::Normal => self.update_sheet(action),
                InputMode::Search => self.update_search(action),
            },
        }
        false
    }

    fn update_main(&mut self, action: Action) {
        match action {
            Action::DrillIn | Action::OpenPayment => self.send(Intent::OpenModal),
            // The Finish button only exists once something is selected.
            Action::Finish if self.flow.can_finish() => self.send(Intent::Finish),
            _ => {}
        }
    }

    fn update_sheet(&mut self, action: Action) {
        match action {
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::GoTop => self.list_cursor = 0,
            Action::GoBottom => {
                self.list_cursor = self.flow.filtered_items().len().saturating_sub(1);
            }
            Action::DrillIn | Action::ToggleSelect => {
                if let Some(item) = self.item_at_cursor().cloned() {
                    self.send(Intent::ToggleSelect(item));
                }
            }
            Action::Refresh => self.send(Intent::Refresh),
            Action::Done if self.flow.can_confirm() => self.send(Intent::ConfirmInModal),
            Action::NavigateBack => self.send(Intent::DismissModal),
            Action::StartSearch => {
                self.search_input = self.flow.search_text().to_string();
                self.input_mode = InputMode::Search;
            }
            _ => {}
        }
    }

    fn update_search(&mut self, action: Action) {
        match action {
            Action::SearchInput(c) => {
                self.search_input.push(c);
                self.list_cursor = 0;
                self.send(Intent::SetSearchText(self.search_input.clone()));
            }
            Action::SearchBackspace => {
                if self.search_input.pop().is_some() {
                    self.list_cursor = 0;
                    self.send(Intent::SetSearchText(self.search_input.clone()));
                }
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
            }
            Action::SearchCancel => {
                self.input_mode = InputMode::Normal;
                if !self.search_input.is_empty() {
                    self.search_input.clear();
                    self.list_cursor = 0;
                    self.send(Intent::SetSearchText(String::new()));
                }
            }
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.flow.filtered_items().len();
        if len == 0 {
            self.list_cursor = 0;
            return;
        }
        self.list_cursor = self
            .list_cursor
            .saturating_add_signed(delta)
            .min(len - 1);
    }
}
