//! Integration tests for the [`FlowStore`] actor.
//!
//! All tests run on tokio's paused clock, so one-second ticks and multi-second
//! loads advance instantly and deterministically. Sleeps land on half-second
//! offsets to stay clear of the tick boundaries.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use paysheet_core::repository::mock::{MockRepository, MockResponse};
use paysheet_core::{FlowConfig, FlowStore, Intent, Mode, PaymentType};

fn visa() -> PaymentType {
    PaymentType::new(1, "Visa")
}

fn paypal() -> PaymentType {
    PaymentType::new(2, "PayPal")
}

fn two_second_repo() -> Arc<MockRepository> {
    Arc::new(MockRepository::new(
        Duration::from_secs(2),
        MockResponse::Items(vec![visa(), paypal()]),
    ))
}

async fn sleep_secs(secs: f64) {
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

fn alive_tasks() -> usize {
    tokio::runtime::Handle::current()
        .metrics()
        .num_alive_tasks()
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn fresh_flow_is_loading_with_full_countdown() {
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());
    let state = handle.flush().await.expect("flow running");
    assert_eq!(state.countdown_seconds(), 60);
    assert!(state.is_loading());
    assert!(state.items().is_empty());
    assert_eq!(state.mode(), Mode::Active);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn countdown_reaches_zero_and_stays() {
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());

    sleep_secs(30.5).await;
    assert_eq!(handle.flush().await.unwrap().countdown_seconds(), 30);

    sleep_secs(30.0).await;
    assert_eq!(handle.flush().await.unwrap().countdown_seconds(), 0);

    // A 61st tick (and many more) must not go below zero.
    sleep_secs(10.0).await;
    assert_eq!(handle.flush().await.unwrap().countdown_seconds(), 0);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn initial_load_resolves_after_delay() {
    let repo = two_second_repo();
    let handle = FlowStore::spawn(FlowConfig::default(), repo.clone());

    sleep_secs(1.5).await;
    assert!(handle.flush().await.unwrap().is_loading());

    sleep_secs(1.0).await;
    let state = handle.flush().await.unwrap();
    assert!(!state.is_loading());
    assert_eq!(state.items(), vec![visa(), paypal()]);
    assert_eq!(repo.call_count(), 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn load_does_not_pause_countdown() {
    let repo = Arc::new(MockRepository::new(
        Duration::from_secs(10),
        MockResponse::Items(vec![visa()]),
    ));
    let handle = FlowStore::spawn(FlowConfig::default(), repo);

    sleep_secs(5.5).await;
    let state = handle.flush().await.unwrap();
    assert!(state.is_loading());
    assert_eq!(state.countdown_seconds(), 55);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_load_clears_loading_and_keeps_items() {
    let repo = Arc::new(MockRepository::with_script(vec![
        (Duration::from_secs(2), MockResponse::Items(vec![visa()])),
        (Duration::from_secs(2), MockResponse::Fail("offline".into())),
    ]));
    let handle = FlowStore::spawn(FlowConfig::default(), repo);

    sleep_secs(2.5).await;
    assert_eq!(handle.flush().await.unwrap().items(), vec![visa()]);

    assert!(handle.dispatch(Intent::Refresh));
    assert!(handle.flush().await.unwrap().is_loading());

    sleep_secs(2.5).await;
    let state = handle.flush().await.unwrap();
    assert!(!state.is_loading());
    assert_eq!(state.items(), vec![visa()]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn overlapping_refresh_last_resolution_wins() {
    // Initial load is slow and returns Visa; the refresh is fast and returns PayPal.
    let repo = Arc::new(MockRepository::with_script(vec![
        (Duration::from_secs(3), MockResponse::Items(vec![visa()])),
        (Duration::from_secs(1), MockResponse::Items(vec![paypal()])),
    ]));
    let handle = FlowStore::spawn(FlowConfig::default(), repo.clone());

    sleep_secs(0.5).await;
    handle.dispatch(Intent::Refresh);

    // t = 2.0: refresh resolved, initial still in flight.
    sleep_secs(1.5).await;
    let state = handle.flush().await.unwrap();
    assert_eq!(state.items(), vec![paypal()]);
    assert!(!state.is_loading());
    assert_eq!(state.outstanding_loads(), 1);

    // t = 3.5: the slower initial load resolved last and wins.
    sleep_secs(1.5).await;
    let state = handle.flush().await.unwrap();
    assert_eq!(state.items(), vec![visa()]);
    assert!(!state.is_loading());
    assert_eq!(state.outstanding_loads(), 0);
    assert_eq!(repo.call_count(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn refresh_while_loading_settles() {
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());
    for _ in 0..3 {
        handle.dispatch(Intent::Refresh);
    }
    assert_eq!(handle.flush().await.unwrap().outstanding_loads(), 4);

    sleep_secs(2.5).await;
    let state = handle.flush().await.unwrap();
    assert!(!state.is_loading());
    assert_eq!(state.outstanding_loads(), 0);
    assert_eq!(state.items(), vec![visa(), paypal()]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn select_confirm_and_finish_through_the_queue() {
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());
    sleep_secs(2.5).await;

    handle.dispatch(Intent::OpenModal);
    handle.dispatch(Intent::SetSearchText("pay".into()));
    let state = handle.flush().await.unwrap();
    assert!(state.modal_open());
    assert_eq!(state.filtered_items(), vec![&paypal()]);

    // Confirm is gated on a selection.
    handle.dispatch(Intent::ConfirmInModal);
    assert!(handle.flush().await.unwrap().modal_open());

    handle.dispatch(Intent::ToggleSelect(paypal()));
    handle.dispatch(Intent::ConfirmInModal);
    let state = handle.flush().await.unwrap();
    assert!(!state.modal_open());
    assert_eq!(state.selected(), Some(&paypal()));

    handle.dispatch(Intent::Finish);
    let state = handle.flush().await.unwrap();
    assert_eq!(state.mode(), Mode::Finished);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn finish_without_selection_stays_active() {
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());
    sleep_secs(2.5).await;

    handle.dispatch(Intent::ToggleSelect(visa()));
    handle.dispatch(Intent::ToggleSelect(visa()));
    handle.dispatch(Intent::Finish);
    let state = handle.flush().await.unwrap();
    assert!(!state.is_finished());
    assert_eq!(state.selected(), None);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_each_tick() {
    let config = FlowConfig {
        countdown_secs: 3,
        ..FlowConfig::default()
    };
    let handle = FlowStore::spawn(config, two_second_repo());
    let mut rx = handle.subscribe();

    let mut seen = Vec::new();
    while seen.last() != Some(&0) {
        rx.changed().await.expect("flow running");
        let remaining = rx.borrow_and_update().countdown_seconds();
        if seen.last() != Some(&remaining) {
            seen.push(remaining);
        }
    }
    assert_eq!(seen, vec![2, 1, 0]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn custom_tick_period_is_honoured() {
    let config = FlowConfig {
        countdown_secs: 10,
        tick_period: Duration::from_millis(250),
    };
    let handle = FlowStore::spawn(config, two_second_repo());
    sleep_secs(1.1).await;
    assert_eq!(handle.flush().await.unwrap().countdown_seconds(), 6);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_closes_the_queue() {
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());
    let intents = handle.intents();
    assert!(intents.send(Intent::OpenModal));

    handle.shutdown().await;

    assert!(intents.is_closed());
    assert!(!intents.send(Intent::OpenModal));
}

#[tokio::test(start_paused = true)]
async fn load_resolving_after_drop_is_discarded() {
    let repo = two_second_repo();
    let handle = FlowStore::spawn(FlowConfig::default(), repo.clone());
    let rx = handle.subscribe();
    drop(handle);

    // The pending load and the timer both outlive the handle; neither may panic
    // or publish anything.
    sleep_secs(5.0).await;
    assert!(rx.has_changed().is_err());
    assert_eq!(repo.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_ends_every_task() {
    let before = alive_tasks();
    let handle = FlowStore::spawn(FlowConfig::default(), two_second_repo());
    tokio::task::yield_now().await;
    // Actor, timer and the initial load.
    assert_eq!(alive_tasks(), before + 3);

    drop(handle);
    sleep_secs(2.5).await;
    assert_eq!(alive_tasks(), before);
}

#[tokio::test(start_paused = true)]
async fn timer_stops_on_drop_without_a_pending_load() {
    let repo = Arc::new(MockRepository::new(Duration::ZERO, MockResponse::Items(vec![visa()])));
    let before = alive_tasks();
    let handle = FlowStore::spawn(FlowConfig::default(), repo);
    sleep_secs(1.5).await;
    assert_eq!(handle.flush().await.unwrap().items(), vec![visa()]);
    assert_eq!(alive_tasks(), before + 2);

    drop(handle);
    tokio::task::yield_now().await;
    sleep_secs(0.5).await;
    assert_eq!(alive_tasks(), before);
}

#[tokio::test(start_paused = true)]
async fn huge_tick_period_is_logged_whole_and_never_ticks() {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let capture = capture.clone();
            move || capture.clone()
        })
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = FlowConfig {
        countdown_secs: 10,
        tick_period: Duration::MAX,
    };
    let handle = FlowStore::spawn(config, two_second_repo());
    sleep_secs(5.5).await;
    assert_eq!(handle.flush().await.unwrap().countdown_seconds(), 10);
    handle.shutdown().await;

    let logs = capture.contents();
    assert!(logs.contains("flow store started"), "{logs}");
    assert!(logs.contains(&format!("tick={:?}", Duration::MAX)), "{logs}");
}
