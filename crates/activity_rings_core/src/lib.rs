//! Core engine behind a daily activity-rings display.
//!
//! The engine resolves a requested calendar day into a bounded query window,
//! aggregates time-stamped health samples into per-category totals, and turns
//! totals plus per-category goals into normalized ring progress. Rendering,
//! gestures, and layout are the consumer's problem; this crate only produces
//! [`ActivitySnapshot`]s and ordered [`ProgressResult`](progress::ProgressResult)
//! rows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aggregator;
pub mod cursor;
pub mod engine;
pub mod goals;
pub mod progress;
pub mod provider;
pub mod snapshot;
pub mod window;

pub use aggregator::ActivityAggregator;
pub use cursor::DateCursor;
pub use engine::ActivityEngine;
pub use goals::{GoalPersistence, GoalStore, InMemoryGoals, JsonFileGoals};
pub use progress::{ProgressCalculator, ProgressResult};
pub use provider::{SampleStoreProvider, TimedSample};
pub use snapshot::{ActivitySnapshot, CategoryMap};
pub use window::DayWindow;

/// Errors a health-data source can surface while answering a query.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The health-data capability is absent or not authorized on this
    /// platform.
    #[error("health data unavailable")]
    Unavailable,
    /// Read access for one category was denied.
    #[error("permission denied for {0}")]
    PermissionDenied(Category),
    /// The underlying query failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// Errors from the goal persistence backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One tracked activity metric. The set is closed; every dispatch over it is
/// an exhaustive match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Energy,
    Steps,
    Distance,
}

impl Category {
    /// Every category, in fixed display order (outermost ring first).
    pub const ALL: [Category; 3] = [Category::Energy, Category::Steps, Category::Distance];

    /// Canonical unit each category is queried and totalled in. Not
    /// configurable.
    pub fn unit(self) -> Unit {
        match self {
            Category::Energy => Unit::LargeCalorie,
            Category::Steps => Unit::Count,
            Category::Distance => Unit::Mile,
        }
    }

    /// Short uppercase label the ring display uses for this metric.
    pub fn label(self) -> &'static str {
        match self {
            Category::Energy => "WORK",
            Category::Steps => "STEPS",
            Category::Distance => "MOVE",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Energy => write!(f, "energy"),
            Category::Steps => write!(f, "steps"),
            Category::Distance => write!(f, "distance"),
        }
    }
}

/// Unit of measure a category's samples and totals are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    LargeCalorie,
    Count,
    Mile,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::LargeCalorie => "kcal",
            Unit::Count => "steps",
            Unit::Mile => "mi",
        }
    }
}

/// Read-side capability of a platform health store.
///
/// The engine never implements a real store; it depends only on this
/// contract. A window with no samples answers `Ok(0.0)`, not an error.
#[async_trait]
pub trait HealthProvider: Send + Sync + 'static {
    /// Whether the platform can serve health data at all. Checked before a
    /// generation of queries is issued.
    fn is_data_available(&self) -> bool;

    /// Cumulative sum over `window` for `category`, in the category's
    /// canonical unit.
    async fn query_cumulative(
        &self,
        category: Category,
        window: DayWindow,
    ) -> Result<f64, ProviderError>;
}
