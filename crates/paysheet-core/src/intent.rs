use tokio::sync::oneshot;

use crate::state::{FlowState, LoadId};
use crate::{LoadError, PaymentType};

/// A user request to mutate the flow, dispatched by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Present the payment sheet.
    OpenModal,
    /// Close the sheet without confirming (swipe-down / Esc).
    DismissModal,
    /// Reload the payment types.
    Refresh,
    /// Select `item`, or clear the selection if it is already selected.
    ToggleSelect(PaymentType),
    /// Replace the search text.
    SetSearchText(String),
    /// "Done" in the sheet: close it, keeping the selection.
    ConfirmInModal,
    /// Promote the session to the finished state.
    Finish,
}

/// Everything that flows through the store's serialized mutation queue.
#[derive(Debug)]
pub enum Message {
    Intent(Intent),
    /// One period of the countdown timer elapsed.
    Tick,
    /// A repository call started by `begin_load` has resolved.
    LoadResolved {
        id: LoadId,
        result: Result<Vec<PaymentType>, LoadError>,
    },
    /// Reply with the state once every earlier message has been applied.
    Flush(oneshot::Sender<FlowState>),
}
