//! Ring progress derivation: totals plus goals, reduced to ordered display
//! rows.

use crate::Category;
use crate::goals::GoalStore;
use crate::snapshot::ActivitySnapshot;
use serde::Serialize;

/// Derived progress for one category. Computed fresh on every reveal, never
/// cached.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressResult {
    pub category: Category,
    /// Aggregated total in the category's canonical unit.
    pub total: f64,
    /// Effective goal the total is measured against.
    pub goal: u32,
    /// `total / goal`, unclamped; exceeds 1.0 when the goal is beaten.
    pub ratio: f64,
    /// Ring-fill driver, clamped to `[0, 1]`.
    pub fill_fraction: f64,
    /// Rounded whole percent, unclamped ("120%" stays 120).
    pub percent: u32,
    /// Whether the underlying total was actually measured.
    pub available: bool,
}

impl ProgressResult {
    /// The displayed amount: energy to the whole unit, distance to two
    /// decimals, steps as a whole count (or thousands in compact mode).
    pub fn display_total(&self, compact: bool) -> String {
        match self.category {
            Category::Energy => format!("{:.0}", self.total),
            Category::Steps if compact => format_thousands(self.total),
            Category::Steps => format!("{:.0}", self.total),
            Category::Distance => format!("{:.2}", self.total),
        }
    }

    pub fn display_goal(&self, compact: bool) -> String {
        match self.category {
            Category::Steps if compact => format_thousands(f64::from(self.goal)),
            _ => self.goal.to_string(),
        }
    }

    /// Label line in the ring display's shape, e.g. `STEPS:  4.2k/5k | 84%`.
    pub fn summary(&self, compact: bool) -> String {
        format!(
            "{}:  {}/{} | {}%",
            self.category.label(),
            self.display_total(compact),
            self.display_goal(compact),
            self.percent
        )
    }
}

pub struct ProgressCalculator;

impl ProgressCalculator {
    /// One row per category, in fixed display order.
    pub fn compute(snapshot: &ActivitySnapshot, goals: &GoalStore) -> Vec<ProgressResult> {
        Category::ALL
            .iter()
            .map(|&category| {
                let total = snapshot.total(category);
                let goal = goals.effective_goal(category);
                let ratio = ratio_for(total, goal);
                ProgressResult {
                    category,
                    total,
                    goal,
                    ratio,
                    fill_fraction: ratio.clamp(0.0, 1.0),
                    percent: (ratio * 100.0).round() as u32,
                    available: snapshot.is_available(category),
                }
            })
            .collect()
    }
}

/// Effective goals are >= 1 by construction; a zero goal here means an
/// invariant broke upstream, so degrade to an empty ring instead of dividing
/// by zero.
fn ratio_for(total: f64, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (total / f64::from(goal)).max(0.0)
}

/// `4200 -> "4.2k"`, `5000 -> "5k"`: one decimal, trailing zero trimmed.
fn format_thousands(value: f64) -> String {
    let rendered = format!("{:.1}", value / 1000.0);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}k")
}
