//! Day-scoped query windows.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;

/// Half-open time interval `[start, end)` a day's samples are summed over.
///
/// `start` is always midnight-aligned to the local calendar and never later
/// than `end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DayWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl DayWindow {
    /// Window for `day`: starts at local midnight; ends at `now` when `day`
    /// is the current date ("so far today"), otherwise at the next local
    /// midnight.
    pub fn for_day(day: NaiveDate, now: DateTime<Local>) -> Self {
        let start = local_midnight(day);
        let end = if day == now.date_naive() {
            now
        } else {
            local_midnight(day.succ_opt().unwrap_or(day))
        };
        // A clock rewound past midnight would invert the interval; collapse
        // it to empty instead.
        let end = end.max(start);
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// First valid local instant of `day`.
///
/// Calendar arithmetic only; adding 86 400-second offsets drifts across DST
/// transitions.
fn local_midnight(day: NaiveDate) -> DateTime<Local> {
    let naive = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight fell inside a spring-forward gap; the day starts at the
        // first valid instant after it.
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .expect("an instant one hour past a DST gap resolves"),
    }
}
