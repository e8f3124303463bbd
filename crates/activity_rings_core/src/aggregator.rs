//! Day aggregation: fan one provider query per category out, fan the
//! completions back into a single snapshot.

use crate::snapshot::{ActivitySnapshot, CategoryMap};
use crate::window::DayWindow;
use crate::{Category, HealthProvider};
use chrono::{DateTime, Local, NaiveDate};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;

type ClockFn = dyn Fn() -> DateTime<Local> + Send + Sync;

struct AggregatorState {
    active_day: Option<NaiveDate>,
    snapshot: Option<ActivitySnapshot>,
}

/// Turns a requested calendar day into per-category totals.
///
/// Every [`aggregate`](ActivityAggregator::aggregate) call is a generation
/// tagged with its requested day. When navigation moves on before a
/// generation lands, the whole generation is discarded on arrival; in-flight
/// queries are never cancelled, their results just stop mattering. All state
/// mutation is serialized behind one mutex, so a snapshot is replaced whole
/// or not at all.
pub struct ActivityAggregator {
    provider: Arc<dyn HealthProvider>,
    state: Arc<Mutex<AggregatorState>>,
    clock: Arc<ClockFn>,
}

impl ActivityAggregator {
    pub fn new(provider: Arc<dyn HealthProvider>) -> Self {
        Self::with_clock(provider, Local::now)
    }

    /// Aggregator with an injected clock, so tests can pin "now".
    pub fn with_clock(
        provider: Arc<dyn HealthProvider>,
        clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static,
    ) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(AggregatorState {
                active_day: None,
                snapshot: None,
            })),
            clock: Arc::new(clock),
        }
    }

    /// The most recently applied snapshot, if any generation has landed yet.
    pub async fn snapshot(&self) -> Option<ActivitySnapshot> {
        self.state.lock().await.snapshot.clone()
    }

    /// Aggregate totals for `day`.
    ///
    /// Marks `day` active, queries all three categories concurrently, and
    /// applies the reduced snapshot only if `day` is still the active day
    /// once every completion is in. Returns `None` when a later call
    /// superseded this generation.
    pub async fn aggregate(&self, day: NaiveDate) -> Option<ActivitySnapshot> {
        {
            let mut state = self.state.lock().await;
            state.active_day = Some(day);
        }

        let snapshot = if self.provider.is_data_available() {
            self.fetch_day(day).await
        } else {
            tracing::warn!(%day, "health data unavailable; serving empty totals");
            metrics::counter!("activity_provider_unavailable").increment(1);
            ActivitySnapshot::unavailable(day)
        };

        self.apply(snapshot).await
    }

    async fn fetch_day(&self, day: NaiveDate) -> ActivitySnapshot {
        let window = DayWindow::for_day(day, (self.clock)());
        let fetches = Category::ALL.map(|category| {
            let provider = Arc::clone(&self.provider);
            async move { (category, provider.query_cumulative(category, window).await) }
        });
        let results = join_all(fetches).await;

        let mut totals = CategoryMap::<f64>::default();
        let mut availability = CategoryMap::filled(true);
        for (category, result) in results {
            match result {
                // A negative sum would wind a ring backwards; floor at zero.
                Ok(total) => totals.set(category, total.max(0.0)),
                Err(e) => {
                    tracing::warn!(
                        %day, %category, error = %e,
                        "category query failed; treating total as zero"
                    );
                    metrics::counter!(
                        "activity_query_failures",
                        "category" => category.to_string()
                    )
                    .increment(1);
                    availability.set(category, false);
                }
            }
        }

        ActivitySnapshot {
            day,
            totals,
            availability,
        }
    }

    /// Apply a completed generation unless a newer day took over while it
    /// was in flight.
    async fn apply(&self, snapshot: ActivitySnapshot) -> Option<ActivitySnapshot> {
        let mut state = self.state.lock().await;
        if state.active_day != Some(snapshot.day) {
            tracing::debug!(
                requested = %snapshot.day,
                active = ?state.active_day,
                "discarding superseded day totals"
            );
            metrics::counter!("activity_stale_generations_discarded").increment(1);
            return None;
        }
        state.snapshot = Some(snapshot.clone());
        Some(snapshot)
    }
}
