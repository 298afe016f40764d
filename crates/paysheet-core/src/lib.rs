use std::time::Duration;

use thiserror::Error;

pub mod config_file;
pub mod filter;
pub mod intent;
pub mod repository;
pub mod state;
pub mod store;

// Re-export for convenience
pub use filter::filtered_items;
pub use intent::{Intent, Message};
pub use repository::{PaymentTypeRepository, SimulatedRepository};
pub use state::{FlowState, LoadId, Mode};
pub use store::{FlowConfig, FlowHandle, FlowStore, IntentSender};

/// Seconds on the countdown when a session starts.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Period of the countdown timer.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Simulated network latency of [`SimulatedRepository`].
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_secs(2);

/// A selectable payment option as delivered by the repository.
///
/// Immutable once received. Two values are equal only when both `id` and
/// `name` match, which is what selection and checkmark rendering compare on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentType {
    pub id: u32,
    pub name: String,
}

impl PaymentType {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The repository could not produce the list of payment types.
///
/// This is the only failure the flow models. It is logged where the load
/// resolves and never shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("payment types unavailable: {0}")]
    Unavailable(String),
}
