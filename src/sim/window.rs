use chrono::NaiveTime;

/// A time-of-day range that repeats every calendar day.
///
/// Both ends are inclusive. When `start` is later than `end` the window wraps
/// over midnight, so `22:00..=02:00` covers late evening and early morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    /// First time of day inside the window (inclusive).
    pub start: NaiveTime,
    /// Last time of day inside the window (inclusive).
    pub end: NaiveTime,
}

impl DailyWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Builds a window from whole hours and minutes.
    ///
    /// Returns `None` if either time is not a valid time of day.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self::new(
            NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        ))
    }

    /// Returns `true` when `time` falls within the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            time >= self.start && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }

    /// Returns `true` when the window wraps over midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }
}
