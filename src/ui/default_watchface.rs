//! Default watchface

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    text::{Alignment, Text},
};
use profont::{
    PROFONT_10_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT,
    PROFONT_7_POINT, PROFONT_9_POINT,
};

use super::{
    binder::{Binder, ElementId, ElementSpec, Layout, Opacity, Shape},
    palette::Color,
    LCD_H, LCD_W,
};
use crate::i18n::FontSize;

/// Baseline of the separator line
pub const SEPARATOR_Y: i32 = 125;
/// Inset of the separator from the screen edge when fully extended
pub const SEPARATOR_INSET: i32 = 12;

const SEPARATOR_WIDTH: u32 = 2;
const TIME_Y: i32 = 110;
const STATS_Y: i32 = 212;
const CAPTION_Y: i32 = 230;

const fn text(
    id: ElementId,
    x: i32,
    y: i32,
    alignment: Alignment,
    font: u8,
    initial: &'static str,
    fill: Color,
) -> ElementSpec {
    ElementSpec {
        id,
        shape: Shape::Text {
            position: Point::new(x, y),
            alignment,
            font: FontSize(font),
        },
        text: initial,
        fill,
    }
}

/// Element placement on the 240x240 panel
pub const LAYOUT: Layout = Layout {
    size: Size::new(LCD_W, LCD_H),
    elements: [
        ElementSpec {
            id: ElementId::Background,
            shape: Shape::Fill,
            text: "",
            fill: Color::Black,
        },
        text(ElementId::Hours, 116, TIME_Y, Alignment::Right, 24, "--", Color::Aqua),
        text(ElementId::Minutes, 124, TIME_Y, Alignment::Left, 18, "--", Color::White),
        text(ElementId::AmPm, 124, TIME_Y - 26, Alignment::Left, 12, "", Color::White),
        text(ElementId::Day, 120, 152, Alignment::Center, 14, "", Color::White),
        text(ElementId::Date, 120, 174, Alignment::Center, 12, "", Color::White),
        ElementSpec {
            id: ElementId::Separator,
            shape: Shape::Line {
                y: SEPARATOR_Y,
                x1: SEPARATOR_INSET,
                x2: LCD_W as i32 - SEPARATOR_INSET,
            },
            text: "",
            fill: Color::Aqua,
        },
        text(ElementId::HeartRate, 40, STATS_Y, Alignment::Center, 14, "-", Color::White),
        text(ElementId::HeartRateCaption, 40, CAPTION_Y, Alignment::Center, 10, "bpm", Color::Aqua),
        text(ElementId::Steps, 120, STATS_Y, Alignment::Center, 14, "-", Color::White),
        text(ElementId::StepsCaption, 120, CAPTION_Y, Alignment::Center, 10, "steps", Color::Aqua),
        text(ElementId::Calories, 200, STATS_Y, Alignment::Center, 14, "-", Color::White),
        text(ElementId::CaloriesCaption, 200, CAPTION_Y, Alignment::Center, 10, "kcal", Color::Aqua),
    ],
};

/// Largest ProFont size not above the requested point size
fn font(size: FontSize) -> &'static MonoFont<'static> {
    match size.0 {
        0..=8 => &PROFONT_7_POINT,
        9 => &PROFONT_9_POINT,
        10..=11 => &PROFONT_10_POINT,
        12..=13 => &PROFONT_12_POINT,
        14..=17 => &PROFONT_14_POINT,
        18..=23 => &PROFONT_18_POINT,
        _ => &PROFONT_24_POINT,
    }
}

/// Mix `color` into `background` by `opacity`
fn blend(color: Rgb565, background: Rgb565, opacity: Opacity) -> Rgb565 {
    let a = opacity.0 as u16;
    let mix = |fg: u8, bg: u8| ((fg as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
    Rgb565::new(
        mix(color.r(), background.r()),
        mix(color.g(), background.g()),
        mix(color.b(), background.b()),
    )
}

/// Draw the whole face onto `target`
pub fn draw<D>(binder: &Binder, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let background = if binder.opacity(ElementId::Background).is_transparent() {
        Rgb565::BLACK
    } else {
        binder.fill(ElementId::Background)
    };
    target.clear(background)?;

    for (_, element) in binder.iter() {
        let opacity = element.opacity();
        if opacity.is_transparent() {
            continue;
        }
        let color = blend(element.fill(), background, opacity);

        match element.shape() {
            // Covered by the clear above
            Shape::Fill => {}
            Shape::Text {
                position,
                alignment,
                font: size,
            } => {
                if element.text().is_empty() {
                    continue;
                }
                let style = MonoTextStyle::new(font(size), color);
                Text::with_alignment(element.text(), position, style, alignment).draw(target)?;
            }
            Shape::Line { y, x1, x2 } => {
                Line::new(Point::new(x1, y), Point::new(x2, y))
                    .into_styled(PrimitiveStyle::with_stroke(color, SEPARATOR_WIDTH))
                    .draw(target)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_graphics::Pixel;

    /// Frame buffer standing in for the panel
    struct Canvas {
        pixels: Vec<Rgb565>,
    }

    impl Canvas {
        fn new() -> Self {
            Self {
                pixels: vec![Rgb565::new(1, 2, 3); (LCD_W * LCD_H) as usize],
            }
        }

        fn at(&self, x: i32, y: i32) -> Rgb565 {
            self.pixels[(y as u32 * LCD_W + x as u32) as usize]
        }

        fn count(&self, color: Rgb565) -> usize {
            self.pixels.iter().filter(|p| **p == color).count()
        }

        fn any_in_rows(&self, x: i32, rows: core::ops::RangeInclusive<i32>, color: Rgb565) -> bool {
            rows.into_iter().any(|y| self.at(x, y) == color)
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size {
            Size::new(LCD_W, LCD_H)
        }
    }

    impl DrawTarget for Canvas {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if point.x >= 0 && point.y >= 0 && (point.x as u32) < LCD_W && (point.y as u32) < LCD_H {
                    self.pixels[(point.y as u32 * LCD_W + point.x as u32) as usize] = color;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_font_mapping() {
        assert_eq!(font(FontSize(24)).character_size, PROFONT_24_POINT.character_size);
        assert_eq!(font(FontSize(45)).character_size, PROFONT_24_POINT.character_size);
        assert_eq!(font(FontSize(15)).character_size, PROFONT_14_POINT.character_size);
    }

    #[test]
    fn test_blend_extremes() {
        let red = Rgb565::RED;
        assert_eq!(blend(red, Rgb565::BLACK, Opacity::OPAQUE), red);
        assert_eq!(blend(red, Rgb565::BLACK, Opacity::TRANSPARENT), Rgb565::BLACK);
    }

    #[test]
    fn test_draw_clears_to_background() {
        let mut binder = Binder::new(&LAYOUT);
        binder.set_fill(ElementId::Background, Color::Blue.rgb565());
        let mut canvas = Canvas::new();
        draw(&binder, &mut canvas).unwrap();

        assert_eq!(canvas.at(0, 0), Color::Blue.rgb565());
        assert_eq!(canvas.count(Rgb565::new(1, 2, 3)), 0);
    }

    #[test]
    fn test_draw_separator_span() {
        let mut binder = Binder::new(&LAYOUT);
        binder.set_line_span(ElementId::Separator, 100, 140);
        let mut canvas = Canvas::new();
        draw(&binder, &mut canvas).unwrap();

        let accent = Color::Aqua.rgb565();
        let rows = SEPARATOR_Y - 1..=SEPARATOR_Y + 1;
        assert!(canvas.any_in_rows(120, rows.clone(), accent));
        assert!(!canvas.any_in_rows(60, rows.clone(), accent));
        assert!(!canvas.any_in_rows(180, rows, accent));
    }

    #[test]
    fn test_hidden_elements_are_not_drawn() {
        let mut binder = Binder::new(&LAYOUT);
        binder.set_text(ElementId::Steps, "4321");
        binder.set_fill(ElementId::Steps, Rgb565::RED);

        let mut canvas = Canvas::new();
        draw(&binder, &mut canvas).unwrap();
        assert!(canvas.count(Rgb565::RED) > 0);

        binder.toggle_neat_elements(false);
        let mut canvas = Canvas::new();
        draw(&binder, &mut canvas).unwrap();
        assert_eq!(canvas.count(Rgb565::RED), 0);
    }
}
