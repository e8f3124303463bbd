//! Day navigation with a hard upper bound at "today".

use chrono::{Local, NaiveDate};

/// Tracks which calendar day is being displayed.
///
/// Paging backward is unbounded; paging forward stops at the anchored
/// "today", so the display can never show a future day. Mutating the cursor
/// has no side effects — deciding when to re-aggregate is the caller's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateCursor {
    today: NaiveDate,
    current: NaiveDate,
}

impl DateCursor {
    /// Cursor anchored at the current local date.
    pub fn new() -> Self {
        Self::anchored_at(Local::now().date_naive())
    }

    /// Cursor with an explicit "today" anchor, for callers that pin the
    /// bound (and for tests).
    pub fn anchored_at(today: NaiveDate) -> Self {
        Self {
            today,
            current: today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// Move one calendar day back. Always succeeds.
    pub fn step_backward(&mut self) -> NaiveDate {
        // Calendar-day arithmetic; a fixed 86 400 s offset drifts across DST
        // transitions.
        self.current = self.current.pred_opt().unwrap_or(self.current);
        self.current
    }

    /// Move one calendar day forward, unless that would pass today. At the
    /// bound this is a no-op returning `None`, not an error.
    pub fn step_forward(&mut self) -> Option<NaiveDate> {
        let next = self.current.succ_opt()?;
        if next > self.today {
            return None;
        }
        self.current = next;
        Some(next)
    }

    /// Jump straight back to today.
    pub fn reset_to_today(&mut self) -> NaiveDate {
        self.current = self.today;
        self.current
    }
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starts_at_today() {
        let cursor = DateCursor::anchored_at(day(2024, 6, 10));
        assert_eq!(cursor.current(), day(2024, 6, 10));
        assert_eq!(cursor.today(), day(2024, 6, 10));
    }

    #[test]
    fn step_forward_at_today_is_a_bounded_no_op() {
        let mut cursor = DateCursor::anchored_at(day(2024, 6, 10));
        assert_eq!(cursor.step_forward(), None);
        assert_eq!(cursor.current(), day(2024, 6, 10));
    }

    #[test]
    fn step_forward_from_yesterday_reaches_today() {
        let mut cursor = DateCursor::anchored_at(day(2024, 6, 10));
        cursor.step_backward();
        assert_eq!(cursor.step_forward(), Some(day(2024, 6, 10)));
        assert_eq!(cursor.current(), day(2024, 6, 10));
    }

    #[test]
    fn step_backward_always_succeeds() {
        let mut cursor = DateCursor::anchored_at(day(2024, 3, 1));
        assert_eq!(cursor.step_backward(), day(2024, 2, 29));
        assert_eq!(cursor.step_backward(), day(2024, 2, 28));
    }

    #[test]
    fn backward_across_month_boundaries_uses_calendar_days() {
        let mut cursor = DateCursor::anchored_at(day(2023, 3, 1));
        assert_eq!(cursor.step_backward(), day(2023, 2, 28));
    }

    #[test]
    fn reset_returns_to_today_from_anywhere() {
        let mut cursor = DateCursor::anchored_at(day(2024, 6, 10));
        for _ in 0..30 {
            cursor.step_backward();
        }
        assert_eq!(cursor.reset_to_today(), day(2024, 6, 10));
        assert_eq!(cursor.current(), day(2024, 6, 10));
    }
}
