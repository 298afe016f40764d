//! The flow actor: one task owns [`FlowState`] and applies every mutation in
//! arrival order.
//!
//! ```text
//! presentation ──Intent──┐
//! timer task ────Tick────┼──▶ mpsc queue ──▶ actor (FlowState) ──▶ watch snapshots
//! load tasks ──Resolved──┘
//! ```
//!
//! The timer and load tasks hold only a weak sender. When the [`FlowHandle`] is
//! dropped the cancellation token fires, the actor exits, and any late tick or
//! load result is discarded instead of touching a defunct state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

use crate::intent::{Intent, Message};
use crate::repository::PaymentTypeRepository;
use crate::state::{FlowState, LoadId};
use crate::{DEFAULT_COUNTDOWN_SECS, DEFAULT_TICK_PERIOD};

/// Parameters fixed for the lifetime of one flow session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    pub countdown_secs: u32,
    pub tick_period: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

/// Entry point for starting a flow session.
pub struct FlowStore;

impl FlowStore {
    /// Start the actor, the countdown timer and the initial load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: FlowConfig, repository: Arc<dyn PaymentTypeRepository>) -> FlowHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let weak_tx = tx.downgrade();
        let cancel = CancellationToken::new();

        let mut state = FlowState::new(config.countdown_secs);
        let initial_load = state.begin_load();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.clone());

        spawn_load(initial_load, Arc::clone(&repository), weak_tx.clone());

        let timer = tokio::spawn(run_timer(
            config.tick_period,
            weak_tx.clone(),
            cancel.clone(),
        ));

        let actor = FlowActor {
            state,
            rx,
            weak_tx,
            snapshot_tx,
            repository,
            cancel: cancel.clone(),
        };
        let actor = tokio::spawn(actor.run());

        info!(
            countdown = config.countdown_secs,
            tick = ?config.tick_period,
            "flow store started"
        );

        FlowHandle {
            tx,
            snapshots: snapshot_rx,
            actor,
            timer,
            cancel: cancel.drop_guard(),
        }
    }
}

/// Owning handle to a running flow. Dropping it tears the session down.
pub struct FlowHandle {
    tx: mpsc::UnboundedSender<Message>,
    snapshots: watch::Receiver<FlowState>,
    actor: JoinHandle<()>,
    timer: JoinHandle<()>,
    cancel: DropGuard,
}

impl FlowHandle {
    /// Queue an intent. Returns false once the flow has stopped.
    pub fn dispatch(&self, intent: Intent) -> bool {
        self.tx.send(Message::Intent(intent)).is_ok()
    }

    /// A cloneable sender for dispatching intents from elsewhere.
    pub fn intents(&self) -> IntentSender {
        IntentSender {
            tx: self.tx.clone(),
        }
    }

    /// Receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.snapshots.clone()
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> FlowState {
        self.snapshots.borrow().clone()
    }

    /// The state after every message queued before this call has been applied.
    ///
    /// `None` if the flow has stopped.
    pub async fn flush(&self) -> Option<FlowState> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Message::Flush(reply)).ok()?;
        rx.await.ok()
    }

    /// Cancel the timer and the actor and wait for both to exit.
    pub async fn shutdown(self) {
        let FlowHandle {
            tx,
            actor,
            timer,
            cancel,
            ..
        } = self;
        drop(cancel);
        drop(tx);
        let _ = actor.await;
        let _ = timer.await;
    }
}

/// Cloneable intent sender detached from the handle's lifetime management.
///
/// Holding one keeps the queue open but does not keep the timer alive: once the
/// [`FlowHandle`] is dropped, sends still succeed or fail quietly and have no effect.
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: mpsc::UnboundedSender<Message>,
}

impl IntentSender {
    /// A sender wired to a bare queue instead of a running store, for driving a
    /// presentation layer without timers or loads.
    pub fn unattached() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, intent: Intent) -> bool {
        self.tx.send(Message::Intent(intent)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

struct FlowActor {
    state: FlowState,
    rx: mpsc::UnboundedReceiver<Message>,
    weak_tx: mpsc::WeakUnboundedSender<Message>,
    snapshot_tx: watch::Sender<FlowState>,
    repository: Arc<dyn PaymentTypeRepository>,
    cancel: CancellationToken,
}

impl FlowActor {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
            }
        }
        // Close the queue so stray IntentSenders observe the shutdown.
        self.rx.close();
        info!(
            remaining = self.state.countdown_seconds(),
            finished = self.state.is_finished(),
            "flow store stopped"
        );
    }

    fn handle(&mut self, msg: Message) {
        match msg {
            Message::Intent(intent) => {
                debug!(?intent, "applying intent");
                if let Some(id) = self.state.apply(intent) {
                    spawn_load(id, Arc::clone(&self.repository), self.weak_tx.clone());
                }
            }
            Message::Tick => self.state.tick(),
            Message::LoadResolved { id, result } => self.state.resolve_load(id, result),
            Message::Flush(reply) => {
                let _ = reply.send(self.state.clone());
                return;
            }
        }
        self.publish();
    }

    fn publish(&self) {
        let state = &self.state;
        self.snapshot_tx.send_if_modified(|current| {
            if current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }
}

/// Run one repository call and post its outcome back into the queue.
fn spawn_load(
    id: LoadId,
    repository: Arc<dyn PaymentTypeRepository>,
    weak_tx: mpsc::WeakUnboundedSender<Message>,
) {
    tokio::spawn(async move {
        let result = repository.get_types().await;
        match weak_tx.upgrade() {
            Some(tx) => {
                if tx.send(Message::LoadResolved { id, result }).is_err() {
                    debug!(load = id.0, "flow stopped, dropping load result");
                }
            }
            None => debug!(load = id.0, "flow gone, dropping load result"),
        }
    });
}

/// Post a [`Message::Tick`] every `period`, starting one period from now.
async fn run_timer(
    period: Duration,
    weak_tx: mpsc::WeakUnboundedSender<Message>,
    cancel: CancellationToken,
) {
    // interval_at panics on a zero period.
    let period = period.max(Duration::from_millis(1));
    let Some(start) = Instant::now().checked_add(period) else {
        // Too long to ever elapse.
        cancel.cancelled().await;
        debug!("countdown timer stopped");
        return;
    };
    let mut interval = interval_at(start, period);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(tx) = weak_tx.upgrade() else { break };
                if tx.send(Message::Tick).is_err() {
                    break;
                }
            }
        }
    }
    debug!("countdown timer stopped");
}
