//! Named colours selectable in the settings

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use serde::{Deserialize, Serialize};

/// Colour names as the companion app sends them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    White,
    Black,
    Aqua,
    Blue,
    Cyan,
    Green,
    Lime,
    Mint,
    Orange,
    Peach,
    Pink,
    Plum,
    Purple,
    Red,
    Yellow,
}

const NAMES: [(Color, &str); 15] = [
    (Color::White, "white"),
    (Color::Black, "fb-black"),
    (Color::Aqua, "fb-aqua"),
    (Color::Blue, "fb-blue"),
    (Color::Cyan, "fb-cyan"),
    (Color::Green, "fb-green"),
    (Color::Lime, "fb-lime"),
    (Color::Mint, "fb-mint"),
    (Color::Orange, "fb-orange"),
    (Color::Peach, "fb-peach"),
    (Color::Pink, "fb-pink"),
    (Color::Plum, "fb-plum"),
    (Color::Purple, "fb-purple"),
    (Color::Red, "fb-red"),
    (Color::Yellow, "fb-yellow"),
];

impl Color {
    /// Look up a colour by its settings name, e.g. `fb-aqua`
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(color, _)| *color)
    }

    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(color, _)| *color == self)
            .map(|(_, name)| *name)
            .unwrap_or("white")
    }

    /// 24-bit value of the colour
    pub fn rgb888(self) -> Rgb888 {
        match self {
            Color::White => Rgb888::new(0xff, 0xff, 0xff),
            Color::Black => Rgb888::new(0x00, 0x00, 0x00),
            Color::Aqua => Rgb888::new(0x3b, 0xf7, 0xde),
            Color::Blue => Rgb888::new(0x3b, 0x82, 0xf7),
            Color::Cyan => Rgb888::new(0x14, 0xd3, 0xf5),
            Color::Green => Rgb888::new(0x00, 0xa6, 0x29),
            Color::Lime => Rgb888::new(0xbc, 0xd6, 0x33),
            Color::Mint => Rgb888::new(0x5b, 0xe3, 0x7d),
            Color::Orange => Rgb888::new(0xff, 0x75, 0x2d),
            Color::Peach => Rgb888::new(0xff, 0xcc, 0x33),
            Color::Pink => Rgb888::new(0xf8, 0x3c, 0x40),
            Color::Plum => Rgb888::new(0xa5, 0x10, 0x68),
            Color::Purple => Rgb888::new(0xc6, 0x58, 0xfb),
            Color::Red => Rgb888::new(0xfa, 0x48, 0x48),
            Color::Yellow => Rgb888::new(0xf1, 0xe7, 0x3d),
        }
    }

    /// Panel colour of the colour
    pub fn rgb565(self) -> Rgb565 {
        self.rgb888().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_name_lookup() {
        assert_eq!(Color::from_name("fb-aqua"), Some(Color::Aqua));
        assert_eq!(Color::from_name("FB-Red"), Some(Color::Red));
        assert_eq!(Color::from_name("white"), Some(Color::White));
        assert_eq!(Color::from_name("magenta"), None);
    }

    #[test]
    fn test_every_colour_has_a_name() {
        for (color, name) in NAMES {
            assert_eq!(color.name(), name);
            assert_eq!(Color::from_name(name), Some(color));
        }
    }

    #[test]
    fn test_rgb565_conversion() {
        assert_eq!(Color::White.rgb565(), Rgb565::WHITE);
        assert_eq!(Color::Black.rgb565(), Rgb565::BLACK);
    }
}
