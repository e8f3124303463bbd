//! Top-level engine: wires day navigation to re-aggregation and exposes
//! reveal-time progress computation.

use crate::aggregator::ActivityAggregator;
use crate::cursor::DateCursor;
use crate::goals::GoalStore;
use crate::progress::{ProgressCalculator, ProgressResult};
use crate::snapshot::ActivitySnapshot;
use crate::{Category, HealthProvider};
use chrono::{DateTime, Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the displayed day, the aggregation pipeline, and the goal store.
///
/// Navigation methods mutate the cursor and immediately start a new
/// aggregation generation for the day they land on. A generation superseded
/// by faster navigation leaves the newer snapshot in place and surfaces as
/// `None`.
pub struct ActivityEngine {
    cursor: Mutex<DateCursor>,
    aggregator: ActivityAggregator,
    goals: Mutex<GoalStore>,
}

impl ActivityEngine {
    pub fn new(provider: Arc<dyn HealthProvider>, goals: GoalStore) -> Self {
        Self {
            cursor: Mutex::new(DateCursor::new()),
            aggregator: ActivityAggregator::new(provider),
            goals: Mutex::new(goals),
        }
    }

    /// Engine with a pinned clock; the cursor anchors "today" to it.
    pub fn with_clock(
        provider: Arc<dyn HealthProvider>,
        goals: GoalStore,
        clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static,
    ) -> Self {
        let today = clock().date_naive();
        Self {
            cursor: Mutex::new(DateCursor::anchored_at(today)),
            aggregator: ActivityAggregator::with_clock(provider, clock),
            goals: Mutex::new(goals),
        }
    }

    pub async fn displayed_day(&self) -> NaiveDate {
        self.cursor.lock().await.current()
    }

    /// Load totals for the currently displayed day (startup, or a manual
    /// refresh).
    pub async fn refresh(&self) -> Option<ActivitySnapshot> {
        let day = self.displayed_day().await;
        self.aggregator.aggregate(day).await
    }

    /// Page one day back and re-aggregate. Always moves.
    pub async fn page_backward(&self) -> Option<ActivitySnapshot> {
        let day = self.cursor.lock().await.step_backward();
        self.aggregator.aggregate(day).await
    }

    /// Page one day forward and re-aggregate. Bounded at today: at the bound
    /// nothing changes and no aggregation starts.
    pub async fn page_forward(&self) -> Option<ActivitySnapshot> {
        let day = self.cursor.lock().await.step_forward();
        match day {
            Some(day) => self.aggregator.aggregate(day).await,
            None => None,
        }
    }

    /// Jump back to today and re-aggregate.
    pub async fn return_to_today(&self) -> Option<ActivitySnapshot> {
        let day = self.cursor.lock().await.reset_to_today();
        self.aggregator.aggregate(day).await
    }

    /// Compute fresh progress rows for the current snapshot. Empty until a
    /// first generation has landed.
    pub async fn reveal(&self) -> Vec<ProgressResult> {
        match self.aggregator.snapshot().await {
            Some(snapshot) => {
                let goals = self.goals.lock().await;
                ProgressCalculator::compute(&snapshot, &goals)
            }
            None => Vec::new(),
        }
    }

    /// The snapshot currently backing the display, if any.
    pub async fn snapshot(&self) -> Option<ActivitySnapshot> {
        self.aggregator.snapshot().await
    }

    /// Update one goal; returns the quantized value actually stored.
    pub async fn set_goal(&self, category: Category, value: u32) -> u32 {
        self.goals.lock().await.set_goal(category, value)
    }

    pub async fn effective_goal(&self, category: Category) -> u32 {
        self.goals.lock().await.effective_goal(category)
    }
}
