//! User configuration
//!
//! Settings and preferences arrive from the companion app over BLE as
//! postcard-encoded structs.

use serde::{Deserialize, Serialize};

use crate::{i18n::Locale, ui::palette::Color};

/// Largest encoded size of any configuration struct
pub const MAX_ENCODED_LEN: usize = 16;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Payload is not a valid encoding
    Decode,
    /// Output buffer too small
    Encode,
}

impl From<postcard::Error> for Error {
    fn from(err: postcard::Error) -> Self {
        match err {
            postcard::Error::SerializeBufferFull => Error::Encode,
            _ => Error::Decode,
        }
    }
}

/// Clock face settings chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub bg_color: Color,
    pub fg_color: Color,
    /// Tick once a minute instead of once a second
    pub disable_seconds: bool,
    /// Hide the AM/PM label
    pub disable_meridiem: bool,
    /// Keep decorations visible when the display changes
    pub disable_neat: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bg_color: Color::Black,
            fg_color: Color::Aqua,
            disable_seconds: false,
            disable_meridiem: false,
            disable_neat: false,
        }
    }
}

/// 12 or 24 hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDisplay {
    TwelveHour,
    #[default]
    TwentyFourHour,
}

/// System-wide user preferences, read-only for the clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preferences {
    pub locale: Locale,
    pub clock_display: ClockDisplay,
}

impl Preferences {
    pub fn twelve_hour(&self) -> bool {
        self.clock_display == ClockDisplay::TwelveHour
    }
}

/// Decode a configuration struct from its wire format
pub fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, Error> {
    Ok(postcard::from_bytes(bytes)?)
}

/// Encode a configuration struct into `buf`, returning the used part
pub fn to_slice<'b, T: Serialize>(value: &T, buf: &'b mut [u8]) -> Result<&'b mut [u8], Error> {
    Ok(postcard::to_slice(value, buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_wire_format() {
        let settings = Settings {
            bg_color: Color::Plum,
            fg_color: Color::White,
            disable_seconds: true,
            disable_meridiem: false,
            disable_neat: true,
        };
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let used = to_slice(&settings, &mut buf).unwrap();
        // One varint per colour, one byte per flag
        assert_eq!(used, &[Color::Plum as u8, Color::White as u8, 1, 0, 1]);
        assert_eq!(from_bytes::<Settings>(used).unwrap(), settings);
    }

    #[test]
    fn test_preferences_wire_format() {
        let preferences = Preferences {
            locale: Locale::De,
            clock_display: ClockDisplay::TwelveHour,
        };
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let used = to_slice(&preferences, &mut buf).unwrap();
        assert_eq!(from_bytes::<Preferences>(used).unwrap(), preferences);
        assert!(preferences.twelve_hour());
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        assert_eq!(from_bytes::<Settings>(&[2, 0]), Err(Error::Decode));
        assert_eq!(from_bytes::<Settings>(&[]), Err(Error::Decode));
    }

    #[test]
    fn test_unknown_colour_is_rejected() {
        assert_eq!(from_bytes::<Settings>(&[99, 0, 0, 0, 0]), Err(Error::Decode));
    }

    #[test]
    fn test_small_buffer_is_an_encode_error() {
        let mut buf = [0u8; 2];
        assert_eq!(to_slice(&Settings::default(), &mut buf), Err(Error::Encode));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.fg_color, Color::Aqua);
        assert!(!settings.disable_neat);
        assert_eq!(Preferences::default().locale, Locale::EnUs);
        assert!(!Preferences::default().twelve_hour());
    }
}
