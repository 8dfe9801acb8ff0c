//! Time keeping module for PineTime

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// How often the clock ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Granularity {
    #[default]
    Seconds,
    Minutes,
}

impl Granularity {
    /// Tick period in seconds
    pub fn period_secs(self) -> u32 {
        match self {
            Granularity::Seconds => 1,
            Granularity::Minutes => 60,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Current Time Service payload shorter than 10 bytes
    TooShort,
    /// Payload fields do not form a valid date and time
    InvalidDateTime,
}

/// Largest timestamp `chrono::Duration` holds in seconds
const MAX_TIMESTAMP_SECS: u64 = i64::MAX as u64 / 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Local wall-clock time
    time: NaiveDateTime,
    /// Uptime in milliseconds at which `time` was valid
    uptime_ms: u64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            uptime_ms: 0,
        }
    }
}

impl TimeReference {
    /// Create new time reference from a Unix timestamp in seconds
    ///
    /// `utc_offset` is the offset of local time from UTC in seconds.
    pub fn from_timestamp(secs: i64, utc_offset: i32, uptime_ms: u64) -> Result<Self, Error> {
        let local = secs
            .checked_add(utc_offset as i64)
            .filter(|local| local.unsigned_abs() <= MAX_TIMESTAMP_SECS)
            .ok_or(Error::InvalidDateTime)?;
        let time = NaiveDateTime::UNIX_EPOCH
            .checked_add_signed(Duration::seconds(local))
            .ok_or(Error::InvalidDateTime)?;
        Ok(Self { time, uptime_ms })
    }

    /// Create new time reference from Current Time Service data
    ///
    /// The service carries the phone's local time, used as is.
    pub fn from_cts_bytes(bytes: &[u8], uptime_ms: u64) -> Result<Self, Error> {
        if bytes.len() < 10 {
            return Err(Error::TooShort);
        }
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // bytes[7] is the day of week, derived from the date instead
        let milli = bytes[8] as u32 * 1000 / 256; // Convert fractions_256 to milliseconds

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(Error::InvalidDateTime)?;

        Ok(Self { time, uptime_ms })
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Local time at the given uptime
    pub fn now(&self, uptime_ms: u64) -> NaiveDateTime {
        let elapsed = uptime_ms.saturating_sub(self.reference.uptime_ms) as i64;
        self.reference.time + Duration::milliseconds(elapsed)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        debug!(
            "Time reference set to {}:{}:{}",
            reference.time.hour(),
            reference.time.minute(),
            reference.time.second()
        );
        self.reference = reference;
    }
}

/// Milliseconds from `now` until the next tick boundary
///
/// Minute ticks land on the full minute, second ticks on the full second.
pub fn until_next_tick(now: NaiveDateTime, granularity: Granularity) -> u64 {
    let into_second = (now.nanosecond() % 1_000_000_000) as u64 / 1_000_000;
    let into_period = match granularity {
        Granularity::Seconds => into_second,
        Granularity::Minutes => now.second() as u64 * 1000 + into_second,
    };
    granularity.period_secs() as u64 * 1000 - into_period
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cts(year: u16, month: u8, day: u8, h: u8, m: u8, s: u8, fractions: u8) -> [u8; 10] {
        let y = year.to_le_bytes();
        [y[0], y[1], month, day, h, m, s, 1, fractions, 0]
    }

    #[test]
    fn test_cts_parsing() {
        let reference = TimeReference::from_cts_bytes(&cts(2024, 3, 3, 14, 5, 7, 128), 0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 500)
            .unwrap();
        assert_eq!(reference.time(), expected);
    }

    #[test]
    fn test_cts_rejects_bad_payloads() {
        assert_eq!(
            TimeReference::from_cts_bytes(&[0xe8, 0x07, 3], 0),
            Err(Error::TooShort)
        );
        assert_eq!(
            TimeReference::from_cts_bytes(&cts(2024, 13, 3, 14, 5, 7, 0), 0),
            Err(Error::InvalidDateTime)
        );
        assert_eq!(
            TimeReference::from_cts_bytes(&cts(2024, 3, 3, 25, 5, 7, 0), 0),
            Err(Error::InvalidDateTime)
        );
    }

    #[test]
    fn test_now_advances_with_uptime() {
        let reference = TimeReference::from_cts_bytes(&cts(2024, 3, 3, 14, 5, 7, 0), 10_000).unwrap();
        let manager = TimeManager::init(reference);
        let now = manager.now(12_500);
        assert_eq!((now.hour(), now.minute(), now.second()), (14, 5, 9));
        assert_eq!(now.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_phone_time_is_shown_unshifted() {
        let mut manager = TimeManager::init(TimeReference::from_timestamp(0, 3_600, 0).unwrap());
        manager.set_time(TimeReference::from_cts_bytes(&cts(2024, 3, 3, 14, 5, 7, 0), 0).unwrap());
        let now = manager.now(0);
        assert_eq!((now.hour(), now.minute(), now.second()), (14, 5, 7));
    }

    #[test]
    fn test_timestamp_is_shifted_to_local_time() {
        let reference = TimeReference::from_timestamp(13 * 3_600, 3_600, 0).unwrap();
        let now = TimeManager::init(reference).now(0);
        assert_eq!((now.hour(), now.minute()), (14, 0));

        let behind = TimeReference::from_timestamp(13 * 3_600, -5 * 3_600, 0).unwrap();
        assert_eq!(TimeManager::init(behind).now(0).hour(), 8);

        assert_eq!(
            TimeReference::from_timestamp(i64::MAX, 3_600, 0),
            Err(Error::InvalidDateTime)
        );
    }

    #[test]
    fn test_uptime_before_reference_is_clamped() {
        let reference = TimeReference::from_timestamp(0, 0, 5_000).unwrap();
        let manager = TimeManager::init(reference);
        assert_eq!(manager.now(1_000), NaiveDateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_until_next_tick() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 250)
            .unwrap();
        assert_eq!(until_next_tick(now, Granularity::Seconds), 750);
        assert_eq!(until_next_tick(now, Granularity::Minutes), 52_750);

        let on_boundary = NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(14, 6, 0)
            .unwrap();
        assert_eq!(until_next_tick(on_boundary, Granularity::Minutes), 60_000);
    }

    #[test]
    fn test_granularity_period() {
        assert_eq!(Granularity::Seconds.period_secs(), 1);
        assert_eq!(Granularity::Minutes.period_secs(), 60);
    }
}
