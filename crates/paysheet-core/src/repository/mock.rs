//! Mock repository for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{PaymentTypeRepository, TypesFuture};
use crate::{LoadError, PaymentType};

/// A scripted outcome for one [`MockRepository`] call.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Items(Vec<PaymentType>),
    Fail(String),
}

/// A hand-rolled mock implementing [`PaymentTypeRepository`] for tests.
///
/// Each call pops the next `(delay, response)` pair; once the script runs out
/// the last pair repeats. Calls are counted.
pub struct MockRepository {
    /// Stored reversed so the next call can `pop()`.
    script: Mutex<Vec<(Duration, MockResponse)>>,
    fallback: (Duration, MockResponse),
    call_count: AtomicUsize,
}

impl MockRepository {
    /// Always answer `response` after `delay`.
    pub fn new(delay: Duration, response: MockResponse) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            fallback: (delay, response),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Answer calls in order, repeating the last entry once exhausted.
    ///
    /// An empty script answers every call with an empty list immediately.
    pub fn with_script(mut script: Vec<(Duration, MockResponse)>) -> Self {
        script.reverse();
        let fallback = script
            .first()
            .cloned()
            .unwrap_or((Duration::ZERO, MockResponse::Items(Vec::new())));
        Self {
            script: Mutex::new(script),
            fallback,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `get_types()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> (Duration, MockResponse) {
        let mut script = match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        script.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl PaymentTypeRepository for MockRepository {
    fn get_types(&self) -> TypesFuture<'_> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let (delay, response) = self.next_response();

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match response {
                MockResponse::Items(items) => Ok(items),
                MockResponse::Fail(msg) => Err(LoadError::Unavailable(msg)),
            }
        })
    }
}
