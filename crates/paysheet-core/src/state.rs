//! The flow's single source of truth and every rule that mutates it.
//!
//! [`FlowState`] is plain data with synchronous methods. It knows nothing about
//! timers or tasks: the [`store`](crate::store) actor owns one instance and feeds
//! it ticks, load resolutions and user intents one at a time.

use tracing::{debug, info, trace, warn};

use crate::filter::filtered_items;
use crate::intent::Intent;
use crate::{LoadError, PaymentType};

/// Identifies one repository call, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadId(pub u64);

/// Top-level mode the presentation layer switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Active,
    /// Terminal: the whole view is replaced and the flow is no longer consulted.
    Finished,
}

/// Snapshot of one flow session.
///
/// Fields are read through accessors; only the methods below mutate them, so
/// the finished latch cannot be reset from outside:
///
/// ```compile_fail
/// let mut state = paysheet_core::FlowState::default();
/// state.is_finished = false;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    /// Seconds left on the countdown. Never negative, never increases.
    countdown_seconds: u32,
    /// Set when a load starts, cleared when any load resolves.
    is_loading: bool,
    /// Replaced wholesale by each successful load.
    items: Vec<PaymentType>,
    search_text: String,
    selected: Option<PaymentType>,
    /// One-way latch.
    is_finished: bool,
    modal_open: bool,
    outstanding_loads: usize,
    next_load_id: u64,
}

impl FlowState {
    pub fn new(countdown_seconds: u32) -> Self {
        Self {
            countdown_seconds,
            is_loading: false,
            items: Vec::new(),
            search_text: String::new(),
            selected: None,
            is_finished: false,
            modal_open: false,
            outstanding_loads: 0,
            next_load_id: 0,
        }
    }

    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn items(&self) -> &[PaymentType] {
        &self.items
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected(&self) -> Option<&PaymentType> {
        self.selected.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    /// One timer period elapsed. Idempotent once the countdown reaches zero.
    pub fn tick(&mut self) {
        if self.countdown_seconds > 0 {
            self.countdown_seconds -= 1;
            trace!(remaining = self.countdown_seconds, "countdown tick");
        }
    }

    /// Mark a load as started and hand out its id.
    ///
    /// Overlapping loads are allowed; nothing is deduplicated or cancelled.
    pub fn begin_load(&mut self) -> LoadId {
        self.next_load_id += 1;
        let id = LoadId(self.next_load_id);
        self.outstanding_loads += 1;
        self.is_loading = true;
        info!(load = id.0, outstanding = self.outstanding_loads, "loading payment types");
        id
    }

    /// Apply the outcome of a load. The last resolution to arrive wins.
    ///
    /// A failure keeps the previous items and only reaches the log.
    pub fn resolve_load(&mut self, id: LoadId, result: Result<Vec<PaymentType>, LoadError>) {
        self.outstanding_loads = self.outstanding_loads.saturating_sub(1);
        match result {
            Ok(items) => {
                info!(load = id.0, count = items.len(), "payment types loaded");
                self.items = items;
            }
            Err(e) => {
                warn!(load = id.0, error = %e, "failed to load payment types");
            }
        }
        if self.outstanding_loads > 0 {
            debug!(
                load = id.0,
                outstanding = self.outstanding_loads,
                "load resolved while others are still in flight"
            );
        }
        self.is_loading = false;
    }

    /// Loads issued but not yet resolved.
    pub fn outstanding_loads(&self) -> usize {
        self.outstanding_loads
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn dismiss_modal(&mut self) {
        self.modal_open = false;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Select `item`, or deselect it when it is already the selection.
    pub fn toggle_select(&mut self, item: &PaymentType) {
        if self.selected.as_ref() == Some(item) {
            self.selected = None;
        } else {
            self.selected = Some(item.clone());
        }
    }

    pub fn is_selected(&self, item: &PaymentType) -> bool {
        self.selected.as_ref() == Some(item)
    }

    /// Whether "Done" is offered in the sheet.
    pub fn can_confirm(&self) -> bool {
        self.selected.is_some()
    }

    /// Close the sheet if something is selected. Returns whether it closed.
    pub fn confirm_in_modal(&mut self) -> bool {
        if !self.can_confirm() {
            debug!("confirm ignored: nothing selected");
            return false;
        }
        self.modal_open = false;
        true
    }

    /// Whether "Finish" is offered.
    pub fn can_finish(&self) -> bool {
        self.selected.is_some()
    }

    /// Latch the finished state if something is selected. Returns whether it latched.
    pub fn finish(&mut self) -> bool {
        if !self.can_finish() {
            debug!("finish ignored: nothing selected");
            return false;
        }
        self.is_finished = true;
        self.modal_open = false;
        info!(selected = ?self.selected, "flow finished");
        true
    }

    pub fn mode(&self) -> Mode {
        if self.is_finished {
            Mode::Finished
        } else {
            Mode::Active
        }
    }

    /// The items to display for the current search text. Recomputed on every call.
    pub fn filtered_items(&self) -> Vec<&PaymentType> {
        filtered_items(&self.items, &self.search_text)
    }

    /// Apply a user intent.
    ///
    /// Returns the id of a load the caller must now issue (only for
    /// [`Intent::Refresh`]). Intents arriving after the flow finished are dropped.
    pub fn apply(&mut self, intent: Intent) -> Option<LoadId> {
        if self.is_finished {
            debug!(?intent, "ignoring intent after finish");
            return None;
        }
        match intent {
            Intent::OpenModal => self.open_modal(),
            Intent::DismissModal => self.dismiss_modal(),
            Intent::Refresh => return Some(self.begin_load()),
            Intent::ToggleSelect(item) => self.toggle_select(&item),
            Intent::SetSearchText(text) => self.set_search_text(text),
            Intent::ConfirmInModal => {
                self.confirm_in_modal();
            }
            Intent::Finish => {
                self.finish();
            }
        }
        None
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(crate::DEFAULT_COUNTDOWN_SECS)
    }
}
