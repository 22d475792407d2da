//! Local time-of-day and time-range types.
//!
//! All scheduling decisions work at minute resolution on a single local
//! timezone; times are minutes since local midnight and ranges are
//! half-open `[start, end)` intervals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// Minutes in a full day. A range end of `24:00` is legal so windows can
/// cover the whole day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Local time of day at minute resolution.
///
/// Serialized as an `"HH:MM"` string (`"24:00"` is the exclusive
/// end-of-day bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Create from minutes since local midnight. Fails beyond `24:00`.
    pub fn from_minutes(minutes: u16) -> EngineResult<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(EngineError::InvalidTimeOfDay(format!(
                "{} minutes",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    /// Create from hour and minute components.
    pub fn from_hm(hour: u16, minute: u16) -> EngineResult<Self> {
        // Widen before multiplying: a parsed hour is unbounded u16 and
        // must not overflow on the way to the range check.
        let total = u32::from(hour) * 60 + u32::from(minute);
        if minute > 59 || total > u32::from(MINUTES_PER_DAY) {
            return Err(EngineError::InvalidTimeOfDay(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self(total as u16))
    }

    /// Minutes since local midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Shift earlier by `minutes`, clamping at midnight.
    pub fn saturating_sub(&self, minutes: u16) -> Self {
        Self(self.0.saturating_sub(minutes))
    }

    /// Shift later by `minutes`, clamping at end of day.
    pub fn saturating_add(&self, minutes: u16) -> Self {
        Self(self.0.saturating_add(minutes).min(MINUTES_PER_DAY))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidTimeOfDay(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-open `[start, end)` time range with the `start < end` invariant.
///
/// The invariant also holds for deserialized values: inverted or empty
/// ranges are rejected at the serde boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange", into = "RawTimeRange")]
pub struct TimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Serialize, Deserialize)]
struct RawTimeRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = EngineError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl From<TimeRange> for RawTimeRange {
    fn from(range: TimeRange) -> Self {
        RawTimeRange {
            start: range.start,
            end: range.end,
        }
    }
}

impl TimeRange {
    /// Create a range; `end <= start` is a hard error, not a rejection.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> EngineResult<Self> {
        if end <= start {
            return Err(EngineError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse from `"HH:MM"` bounds; convenience for tests and config.
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Range length in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Strict interval overlap: `a.start < b.end && b.start < a.end`.
    ///
    /// Touching ranges (`a.end == b.start`) do NOT overlap. Off-by-one here
    /// silently creates or destroys valid slots, so both boundary cases are
    /// pinned down by tests.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Expand both bounds by `buffer` minutes, clamped to the day.
    pub fn expanded(&self, buffer: u16) -> TimeRange {
        TimeRange {
            start: self.start.saturating_sub(buffer),
            end: self.end.saturating_add(buffer),
        }
    }

    /// Remove `other` from this range, returning the surviving portions
    /// (zero, one, or two fragments) in ascending order.
    pub fn subtract(&self, other: &TimeRange) -> Vec<TimeRange> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut fragments = Vec::new();
        if self.start < other.start {
            fragments.push(TimeRange {
                start: self.start,
                end: other.start,
            });
        }
        if other.end < self.end {
            fragments.push(TimeRange {
                start: other.end,
                end: self.end,
            });
        }
        fragments
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_time_of_day_parse() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t.minutes(), 9 * 60 + 30);
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn test_time_of_day_end_of_day() {
        let t: TimeOfDay = "24:00".parse().unwrap();
        assert_eq!(t.minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_time_of_day_rejects_garbage() {
        assert!("9h30".parse::<TimeOfDay>().is_err());
        assert!("24:01".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_time_of_day_rejects_huge_hour_without_overflow() {
        // hour * 60 would wrap u16; must come back as a parse error, not a
        // panic or a wrapped-around valid time.
        assert!("1100:00".parse::<TimeOfDay>().is_err());
        assert!("65535:00".parse::<TimeOfDay>().is_err());
        assert!(TimeOfDay::from_hm(1100, 0).is_err());
    }

    #[test]
    fn test_range_invariant() {
        assert!(TimeRange::parse("10:00", "09:00").is_err());
        assert!(TimeRange::parse("10:00", "10:00").is_err());
        assert!(TimeRange::parse("09:00", "10:00").is_ok());
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = range("09:00", "10:00");
        let b = range("10:00", "11:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_one_minute_overlap_detected() {
        let a = range("09:00", "10:01");
        let b = range("10:00", "11:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_containment() {
        let outer = range("09:00", "17:00");
        assert!(outer.contains(&range("09:00", "17:00")));
        assert!(outer.contains(&range("10:00", "11:00")));
        assert!(!outer.contains(&range("08:00", "10:00")));
        assert!(!outer.contains(&range("16:00", "17:30")));
    }

    #[test]
    fn test_expanded_clamps_at_day_bounds() {
        let r = range("00:10", "23:55").expanded(30);
        assert_eq!(r.start().minutes(), 0);
        assert_eq!(r.end().minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_expanded_with_huge_buffer_saturates() {
        // Buffers near u16::MAX must clamp, not overflow the addition.
        let r = range("09:00", "17:00").expanded(65000);
        assert_eq!(r.start().minutes(), 0);
        assert_eq!(r.end().minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_subtract_disjoint_keeps_whole_range() {
        let r = range("09:00", "12:00");
        assert_eq!(r.subtract(&range("13:00", "14:00")), vec![r]);
        // Touching is not overlap, so nothing is removed.
        assert_eq!(r.subtract(&range("12:00", "14:00")), vec![r]);
    }

    #[test]
    fn test_subtract_middle_splits_in_two() {
        let r = range("09:00", "17:00");
        let fragments = r.subtract(&range("10:00", "14:00"));
        assert_eq!(fragments, vec![range("09:00", "10:00"), range("14:00", "17:00")]);
    }

    #[test]
    fn test_subtract_covering_removes_everything() {
        let r = range("10:00", "11:00");
        assert!(r.subtract(&range("09:00", "12:00")).is_empty());
        assert!(r.subtract(&r).is_empty());
    }

    #[test]
    fn test_subtract_leading_and_trailing() {
        let r = range("09:00", "17:00");
        assert_eq!(r.subtract(&range("08:00", "10:00")), vec![range("10:00", "17:00")]);
        assert_eq!(r.subtract(&range("16:00", "18:00")), vec![range("09:00", "16:00")]);
    }

    #[test]
    fn test_serde_round_trip() {
        let r = range("09:30", "17:45");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"start":"09:30","end":"17:45"}"#);
        let back: TimeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let result: Result<TimeRange, _> =
            serde_json::from_str(r#"{"start":"17:00","end":"09:00"}"#);
        assert!(result.is_err());
    }
}
