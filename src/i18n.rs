//! Locale tables for weekday and month names

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Locales the clock face has strings for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    De,
    Fr,
    Es,
}

/// Order of day and month in the short date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateOrder {
    /// "Oct 19"
    MonthDay,
    /// "19 Oct"
    DayMonth,
    /// "19. Okt."
    DayDotMonth,
}

/// Font size hint in points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontSize(pub u8);

/// Font sizes of the time labels for a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeFontSizes {
    pub hours: FontSize,
    pub minutes: FontSize,
}

const TIME_FONT_DEFAULT: TimeFontSizes = TimeFontSizes {
    hours: FontSize(24),
    minutes: FontSize(18),
};

// Long German weekday names need the smaller set
const TIME_FONT_COMPACT: TimeFontSizes = TimeFontSizes {
    hours: FontSize(18),
    minutes: FontSize(14),
};

const WEEKDAYS_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const WEEKDAYS_DE: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];
const WEEKDAYS_FR: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];
const WEEKDAYS_ES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_DE: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sep.", "Okt.", "Nov.", "Dez.",
];
const MONTHS_FR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];
const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

impl Locale {
    /// Parse a language tag such as `de-DE`, `en_GB` or `fr`.
    ///
    /// Unknown languages fall back to `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        let mut parts = tag.split(['-', '_']);
        let language = parts.next().unwrap_or("");
        let region = parts.next().unwrap_or("");

        if language.eq_ignore_ascii_case("de") {
            Locale::De
        } else if language.eq_ignore_ascii_case("fr") {
            Locale::Fr
        } else if language.eq_ignore_ascii_case("es") {
            Locale::Es
        } else if language.eq_ignore_ascii_case("en") && region.eq_ignore_ascii_case("gb") {
            Locale::EnGb
        } else {
            Locale::EnUs
        }
    }

    /// Language tag of the locale
    pub fn tag(self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::De => "de-DE",
            Locale::Fr => "fr-FR",
            Locale::Es => "es-ES",
        }
    }

    /// Localized weekday name
    pub fn weekday(self, day: Weekday) -> &'static str {
        let names = match self {
            Locale::EnUs | Locale::EnGb => &WEEKDAYS_EN,
            Locale::De => &WEEKDAYS_DE,
            Locale::Fr => &WEEKDAYS_FR,
            Locale::Es => &WEEKDAYS_ES,
        };
        names[day.num_days_from_monday() as usize]
    }

    /// Localized short month name, `month0` counting from January = 0
    pub fn month(self, month0: u32) -> &'static str {
        let names = match self {
            Locale::EnUs | Locale::EnGb => &MONTHS_EN,
            Locale::De => &MONTHS_DE,
            Locale::Fr => &MONTHS_FR,
            Locale::Es => &MONTHS_ES,
        };
        names[month0 as usize % 12]
    }

    pub fn date_order(self) -> DateOrder {
        match self {
            Locale::EnUs => DateOrder::MonthDay,
            Locale::EnGb | Locale::Fr | Locale::Es => DateOrder::DayMonth,
            Locale::De => DateOrder::DayDotMonth,
        }
    }

    /// Font sizes for the hour and minute labels
    pub fn time_font_sizes(self) -> TimeFontSizes {
        match self {
            Locale::De => TIME_FONT_COMPACT,
            _ => TIME_FONT_DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("de-DE"), Locale::De);
        assert_eq!(Locale::from_tag("DE_at"), Locale::De);
        assert_eq!(Locale::from_tag("en-GB"), Locale::EnGb);
        assert_eq!(Locale::from_tag("en-us"), Locale::EnUs);
        assert_eq!(Locale::from_tag("en"), Locale::EnUs);
        assert_eq!(Locale::from_tag("fr"), Locale::Fr);
        assert_eq!(Locale::from_tag("es-MX"), Locale::Es);
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(Locale::from_tag("ja-JP"), Locale::EnUs);
        assert_eq!(Locale::from_tag(""), Locale::EnUs);
    }

    #[test]
    fn test_tag_roundtrips_through_parser() {
        for locale in [Locale::EnUs, Locale::EnGb, Locale::De, Locale::Fr, Locale::Es] {
            assert_eq!(Locale::from_tag(locale.tag()), locale);
        }
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(Locale::EnUs.weekday(Weekday::Sun), "Sunday");
        assert_eq!(Locale::De.weekday(Weekday::Mon), "Montag");
        assert_eq!(Locale::Es.weekday(Weekday::Wed), "miércoles");
    }

    #[test]
    fn test_german_uses_compact_time_font() {
        assert_eq!(Locale::De.time_font_sizes(), TIME_FONT_COMPACT);
        assert_eq!(Locale::EnGb.time_font_sizes(), TIME_FONT_DEFAULT);
        assert!(TIME_FONT_COMPACT.hours < TIME_FONT_DEFAULT.hours);
    }
}
