//! In-memory health-data source.
//!
//! [`SampleStoreProvider`] answers cumulative queries from time-stamped
//! samples held in memory. It stands in for a platform health store in
//! tests, examples, and local demos, and can simulate the store's failure
//! modes: the capability missing outright, per-category permission denial,
//! and slow queries.

use crate::snapshot::CategoryMap;
use crate::{Category, DayWindow, HealthProvider, ProviderError};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// A single recorded measurement in a category's canonical unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedSample {
    pub at: DateTime<Local>,
    pub value: f64,
}

#[derive(Default)]
pub struct SampleStoreProvider {
    samples: Mutex<CategoryMap<Vec<TimedSample>>>,
    denied: Mutex<CategoryMap<bool>>,
    latency: Mutex<CategoryMap<Option<Duration>>>,
    unavailable: AtomicBool,
}

impl SampleStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample for `category` at instant `at`.
    pub async fn record(&self, category: Category, at: DateTime<Local>, value: f64) {
        let mut samples = self.samples.lock().await;
        samples[category].push(TimedSample { at, value });
    }

    /// Deny read access for `category`; subsequent queries fail with
    /// [`ProviderError::PermissionDenied`].
    pub async fn deny(&self, category: Category) {
        self.denied.lock().await.set(category, true);
    }

    /// Mark the whole capability present or absent.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::Relaxed);
    }

    /// Delay every response for `category` by `latency`, to exercise slow
    /// and out-of-order completions.
    pub async fn delay_responses(&self, category: Category, latency: Duration) {
        self.latency.lock().await.set(category, Some(latency));
    }

    /// Remove all injected latency.
    pub async fn clear_delays(&self) {
        let mut latency = self.latency.lock().await;
        for category in Category::ALL {
            latency.set(category, None);
        }
    }
}

#[async_trait]
impl HealthProvider for SampleStoreProvider {
    fn is_data_available(&self) -> bool {
        !self.unavailable.load(Ordering::Relaxed)
    }

    async fn query_cumulative(
        &self,
        category: Category,
        window: DayWindow,
    ) -> Result<f64, ProviderError> {
        if !self.is_data_available() {
            return Err(ProviderError::Unavailable);
        }
        if self.denied.lock().await[category] {
            return Err(ProviderError::PermissionDenied(category));
        }
        let delay = self.latency.lock().await[category];
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let samples = self.samples.lock().await;
        Ok(samples[category]
            .iter()
            .filter(|s| window.contains(s.at))
            .map(|s| s.value)
            .sum())
    }
}
