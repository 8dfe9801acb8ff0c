//! Time and date formatting
//!
//! Every function here is pure: the same date, locale and clock preference
//! always give the same strings.

use core::fmt::Write;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use heapless::String;

use crate::i18n::{DateOrder, Locale};

/// Maximum length of a formatted label in bytes
pub const LABEL_LEN: usize = 16;

/// Shown in place of a missing value
pub const PLACEHOLDER: &str = "-";

/// A formatted label
pub type Label = String<LABEL_LEN>;

/// Formats the time fields of a single tick
#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    time: NaiveDateTime,
    twelve_hour: bool,
    locale: Locale,
}

impl DateFormatter {
    pub fn new(twelve_hour: bool, time: NaiveDateTime, locale: Locale) -> Self {
        Self {
            time,
            twelve_hour,
            locale,
        }
    }

    /// Hours, `1..=12` on a 12-hour clock and `0..=23` otherwise, unpadded
    pub fn format_hours(&self) -> Label {
        let hour = if self.twelve_hour {
            self.time.hour12().1
        } else {
            self.time.hour()
        };
        number(hour)
    }

    /// Minutes, always two digits
    pub fn format_minutes(&self) -> Label {
        let mut label = Label::new();
        let _ = write!(label, "{:02}", self.time.minute());
        label
    }

    /// `AM`/`PM` on a 12-hour clock, empty otherwise
    pub fn format_am_pm(&self) -> Label {
        let mut label = Label::new();
        if self.twelve_hour {
            let _ = label.push_str(if self.time.hour12().0 { "PM" } else { "AM" });
        }
        label
    }

    pub fn format_weekday(&self) -> &'static str {
        weekday_label(self.time.weekday(), self.locale)
    }

    pub fn format_date(&self) -> Label {
        format_date(self.time.date(), self.locale)
    }
}

/// Localized weekday label
pub fn weekday_label(day: Weekday, locale: Locale) -> &'static str {
    locale.weekday(day)
}

/// Localized short calendar date, e.g. "Oct 19" or "19. Okt."
pub fn format_date(date: NaiveDate, locale: Locale) -> Label {
    let mut label = Label::new();
    let day = date.day();
    let month = locale.month(date.month0());
    let _ = match locale.date_order() {
        DateOrder::MonthDay => write!(label, "{} {}", month, day),
        DateOrder::DayMonth => write!(label, "{} {}", day, month),
        DateOrder::DayDotMonth => write!(label, "{}. {}", day, month),
    };
    label
}

/// Count label, or the placeholder when the value is absent or zero
pub fn format_count(value: Option<u32>) -> Label {
    match value {
        Some(count) if count > 0 => number(count),
        _ => placeholder(),
    }
}

pub fn placeholder() -> Label {
    let mut label = Label::new();
    let _ = label.push_str(PLACEHOLDER);
    label
}

fn number(value: u32) -> Label {
    let mut label = Label::new();
    let _ = write!(label, "{}", value);
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_afternoon_24h() {
        let f = DateFormatter::new(false, at(14, 5, 7), Locale::EnUs);
        assert_eq!(f.format_hours(), "14");
        assert_eq!(f.format_minutes(), "05");
        assert_eq!(f.format_am_pm(), "");
    }

    #[test]
    fn test_afternoon_12h() {
        let f = DateFormatter::new(true, at(14, 5, 7), Locale::EnUs);
        assert_eq!(f.format_hours(), "2");
        assert_eq!(f.format_minutes(), "05");
        assert_eq!(f.format_am_pm(), "PM");
    }

    #[test]
    fn test_midnight_and_noon_12h() {
        let midnight = DateFormatter::new(true, at(0, 0, 0), Locale::EnUs);
        assert_eq!(midnight.format_hours(), "12");
        assert_eq!(midnight.format_am_pm(), "AM");

        let noon = DateFormatter::new(true, at(12, 30, 0), Locale::EnUs);
        assert_eq!(noon.format_hours(), "12");
        assert_eq!(noon.format_am_pm(), "PM");
    }

    #[test]
    fn test_midnight_24h() {
        let f = DateFormatter::new(false, at(0, 9, 0), Locale::De);
        assert_eq!(f.format_hours(), "0");
        assert_eq!(f.format_minutes(), "09");
    }

    #[test]
    fn test_date_per_locale() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_date(date, Locale::EnUs), "Oct 19");
        assert_eq!(format_date(date, Locale::EnGb), "19 Oct");
        assert_eq!(format_date(date, Locale::De), "19. Okt.");
        assert_eq!(format_date(date, Locale::Fr), "19 oct.");
        assert_eq!(format_date(date, Locale::Es), "19 oct");
    }

    #[test]
    fn test_weekday_label() {
        // 2026-10-19 is a Monday
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let f = DateFormatter::new(false, monday, Locale::De);
        assert_eq!(f.format_weekday(), "Montag");
    }

    #[test]
    fn test_count_placeholder() {
        assert_eq!(format_count(Some(0)), PLACEHOLDER);
        assert_eq!(format_count(None), PLACEHOLDER);
        assert_eq!(format_count(Some(4321)), "4321");
    }

    proptest! {
        #[test]
        fn prop_hours_match_clock(h in 0u32..24, m in 0u32..60) {
            let twelve: u32 = DateFormatter::new(true, at(h, m, 0), Locale::EnUs)
                .format_hours()
                .parse()
                .unwrap();
            prop_assert!((1..=12).contains(&twelve));

            let twenty_four: u32 = DateFormatter::new(false, at(h, m, 0), Locale::EnUs)
                .format_hours()
                .parse()
                .unwrap();
            prop_assert_eq!(twenty_four, h);
        }

        #[test]
        fn prop_minutes_zero_padded(m in 0u32..60) {
            let minutes = DateFormatter::new(false, at(7, m, 0), Locale::EnUs).format_minutes();
            prop_assert_eq!(minutes.len(), 2);
            prop_assert_eq!(minutes.parse::<u32>().unwrap(), m);
        }

        #[test]
        fn prop_date_is_deterministic(days in 0i64..20_000, locale in 0usize..5) {
            let locale = [Locale::EnUs, Locale::EnGb, Locale::De, Locale::Fr, Locale::Es][locale];
            let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
                + chrono::Duration::days(days);
            prop_assert_eq!(format_date(date, locale), format_date(date, locale));
            prop_assert_eq!(
                weekday_label(date.weekday(), locale),
                weekday_label(date.weekday(), locale)
            );
        }
    }
}
