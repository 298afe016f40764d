//! Sources of selectable payment types.

pub mod mock;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::{DEFAULT_LOAD_DELAY, LoadError, PaymentType};

/// Boxed future returned by [`PaymentTypeRepository::get_types`].
pub type TypesFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<PaymentType>, LoadError>> + Send + 'a>>;

/// Asynchronously supplies the list of payment types.
///
/// Each call resolves at most once. Calls may overlap and resolve in any order.
pub trait PaymentTypeRepository: Send + Sync {
    fn get_types(&self) -> TypesFuture<'_>;
}

/// Names served by [`SimulatedRepository::default`], with ids starting at 1.
pub const DEFAULT_PAYMENT_TYPES: &[&str] = &[
    "Visa",
    "Mastercard",
    "PayPal",
    "Apple Pay",
    "Google Pay",
    "Bank transfer",
];

/// Repository that serves a fixed catalogue after simulated network latency.
#[derive(Debug, Clone)]
pub struct SimulatedRepository {
    types: Vec<PaymentType>,
    delay: Duration,
    /// Probability in `[0, 1]` that a call fails instead of returning the catalogue.
    failure_rate: f64,
}

impl SimulatedRepository {
    pub fn new(types: Vec<PaymentType>, delay: Duration) -> Self {
        Self {
            types,
            delay,
            failure_rate: 0.0,
        }
    }

    /// Build a catalogue from names, numbering ids from 1 in order.
    pub fn from_names<S: AsRef<str>>(names: &[S], delay: Duration) -> Self {
        let types = names
            .iter()
            .zip(1u32..)
            .map(|(name, id)| PaymentType::new(id, name.as_ref()))
            .collect();
        Self::new(types, delay)
    }

    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    pub fn types(&self) -> &[PaymentType] {
        &self.types
    }
}

impl Default for SimulatedRepository {
    fn default() -> Self {
        Self::from_names(DEFAULT_PAYMENT_TYPES, DEFAULT_LOAD_DELAY)
    }
}

impl PaymentTypeRepository for SimulatedRepository {
    fn get_types(&self) -> TypesFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            if self.failure_rate > 0.0 && fastrand::f64() < self.failure_rate {
                return Err(LoadError::Unavailable(
                    "simulated network failure".to_string(),
                ));
            }
            Ok(self.types.clone())
        })
    }
}
