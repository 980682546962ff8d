//! Integer timestamp codec
//!
//! Audit records and registry timelines are sorted by a single 64-bit
//! integer that encodes an absolute UTC instant at microsecond resolution:
//!
//! ```text
//! ((ordinal_day * 86400) + hour * 3600 + minute * 60 + second) * 1_000_000 + microsecond
//! ```
//!
//! `ordinal_day` is the proleptic Gregorian day number where 0001-01-01 is
//! day 1. Values compare in the same order as the instants they encode.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

const MICROS_PER_SECOND: i64 = 1_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Smallest encodable value: midnight of day 1 (0001-01-01T00:00:00).
pub const MIN_TIMESTAMP: i64 = SECONDS_PER_DAY * MICROS_PER_SECOND;

/// Microsecond-resolution instant encoded as a sortable integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wraps an already-encoded value without checking it
    #[must_use]
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Returns the encoded integer
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Encodes a naive UTC calendar instant
    ///
    /// Leap-second nanoseconds are clamped to the last microsecond of the
    /// second so the result never spills into the next second.
    #[must_use]
    pub fn encode(instant: &NaiveDateTime) -> Self {
        let ordinal_day = i64::from(instant.date().num_days_from_ce());
        let seconds = ordinal_day * SECONDS_PER_DAY
            + i64::from(instant.hour()) * 3600
            + i64::from(instant.minute()) * 60
            + i64::from(instant.second());
        let micros = i64::from((instant.nanosecond() / 1_000).min(999_999));
        Self(seconds * MICROS_PER_SECOND + micros)
    }

    /// Encodes a UTC instant
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self::encode(&instant.naive_utc())
    }

    /// Encodes the current UTC instant
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Decodes back into the naive UTC calendar instant
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimestamp` for values before
    /// 0001-01-01 (including negatives) or beyond the representable range.
    pub fn decode(&self) -> Result<NaiveDateTime, DomainError> {
        if self.0 < MIN_TIMESTAMP {
            return Err(DomainError::InvalidTimestamp(format!(
                "{} is before 0001-01-01",
                self.0
            )));
        }

        let micros = self.0 % MICROS_PER_SECOND;
        let rest = self.0 / MICROS_PER_SECOND;
        let (rest, seconds) = (rest / 60, rest % 60);
        let (rest, minutes) = (rest / 60, rest % 60);
        let (ordinal_day, hours) = (rest / 24, rest % 24);

        let ordinal_day = i32::try_from(ordinal_day).map_err(|_| {
            DomainError::InvalidTimestamp(format!("{} is out of range", self.0))
        })?;
        let date = NaiveDate::from_num_days_from_ce_opt(ordinal_day).ok_or_else(|| {
            DomainError::InvalidTimestamp(format!("{} is out of range", self.0))
        })?;

        // All components are bounded by the modulo steps above.
        date.and_hms_micro_opt(hours as u32, minutes as u32, seconds as u32, micros as u32)
            .ok_or_else(|| DomainError::InvalidTimestamp(format!("{} is not a valid time", self.0)))
    }

    /// Decodes into a UTC instant
    ///
    /// # Errors
    ///
    /// See [`Timestamp::decode`].
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, DomainError> {
        self.decode().map(|naive| naive.and_utc())
    }

    /// Microseconds elapsed between `earlier` and `self`
    #[must_use]
    pub fn micros_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::InvalidTimestamp(format!("'{s}': {e}")))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::from_datetime(instant)
    }
}

/// Clock handing out strictly increasing timestamps
///
/// Registry timelines resolve "current state" by the greatest timestamp, so
/// two writes from this process must never share one. When the wall clock
/// has not advanced past the last value handed out, the next value is
/// `last + 1`.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: AtomicI64,
}

impl MonotonicClock {
    /// Creates a clock with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next timestamp, strictly greater than any previous one
    pub fn now(&self) -> Timestamp {
        self.next_after(Timestamp::now())
    }

    fn next_after(&self, wall: Timestamp) -> Timestamp {
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let next = wall.as_i64().max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Timestamp(next),
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, us: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, us)
            .unwrap()
    }

    #[test]
    fn test_encode_first_day() {
        let ts = Timestamp::encode(&instant(1, 1, 1, 0, 0, 0, 0));
        assert_eq!(ts.as_i64(), MIN_TIMESTAMP);
    }

    #[test]
    fn test_encode_unix_epoch() {
        // 1970-01-01 is ordinal day 719163
        let ts = Timestamp::encode(&instant(1970, 1, 1, 0, 0, 0, 0));
        assert_eq!(ts.as_i64(), 719_163 * 86_400 * 1_000_000);
    }

    #[test]
    fn test_encode_time_components() {
        let base = Timestamp::encode(&instant(2024, 3, 1, 0, 0, 0, 0));
        let ts = Timestamp::encode(&instant(2024, 3, 1, 2, 3, 4, 5));
        assert_eq!(
            ts.micros_since(base),
            (2 * 3600 + 3 * 60 + 4) * 1_000_000 + 5
        );
    }

    #[test]
    fn test_roundtrip() {
        let samples = [
            instant(1, 1, 1, 0, 0, 0, 0),
            instant(1999, 12, 31, 23, 59, 59, 999_999),
            instant(2000, 2, 29, 12, 0, 0, 1),
            instant(2024, 7, 15, 8, 30, 15, 123_456),
            instant(9999, 12, 31, 23, 59, 59, 999_999),
        ];
        for sample in samples {
            let decoded = Timestamp::encode(&sample).decode().unwrap();
            assert_eq!(decoded, sample);
        }
    }

    #[test]
    fn test_ordering_follows_time() {
        let a = Timestamp::encode(&instant(2023, 12, 31, 23, 59, 59, 999_999));
        let b = Timestamp::encode(&instant(2024, 1, 1, 0, 0, 0, 0));
        assert!(a < b);
        assert_eq!(b.micros_since(a), 1);
    }

    #[test]
    fn test_decode_rejects_pre_epoch() {
        assert!(Timestamp::from_raw(-1).decode().is_err());
        assert!(Timestamp::from_raw(0).decode().is_err());
        assert!(Timestamp::from_raw(MIN_TIMESTAMP - 1).decode().is_err());
        assert!(Timestamp::from_raw(MIN_TIMESTAMP).decode().is_ok());
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert!(Timestamp::from_raw(i64::MAX).decode().is_err());
    }

    #[test]
    fn test_datetime_roundtrip() {
        let now = Utc::now();
        let ts = Timestamp::from_datetime(now);
        let back = ts.to_datetime().unwrap();
        assert_eq!(back.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_from_str() {
        let ts: Timestamp = "63842515200000000".parse().unwrap();
        assert_eq!(ts.as_i64(), 63_842_515_200_000_000);
        assert!("not-a-number".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let ts = Timestamp::from_raw(42);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "42");
        let back: Timestamp = serde_json::from_str("42").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_monotonic_clock_never_repeats() {
        let clock = MonotonicClock::new();
        let wall = Timestamp::from_raw(MIN_TIMESTAMP + 10);

        let first = clock.next_after(wall);
        let second = clock.next_after(wall);
        let third = clock.next_after(Timestamp::from_raw(MIN_TIMESTAMP));

        assert_eq!(first, wall);
        assert_eq!(second.as_i64(), wall.as_i64() + 1);
        assert_eq!(third.as_i64(), wall.as_i64() + 2);
    }

    #[test]
    fn test_monotonic_clock_follows_wall_clock() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b > a);
        assert!(a.decode().is_ok());
    }
}
