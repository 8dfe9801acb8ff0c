//! Display binder
//!
//! Retained state of every element on the clock face. Elements are addressed
//! through typed [`ElementId`] handles resolved once from a [`Layout`]; the
//! renderer reads this state back and draws it.

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    text::Alignment,
};

use super::palette::Color;
use crate::{format::Label, format::LABEL_LEN, i18n::FontSize};

/// Number of elements on the clock face
pub const ELEMENT_COUNT: usize = 13;

/// Handle of a single on-screen element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ElementId {
    Background,
    Hours,
    Minutes,
    AmPm,
    Day,
    Date,
    /// Seconds indicator line between time and date
    Separator,
    HeartRate,
    HeartRateCaption,
    Steps,
    StepsCaption,
    Calories,
    CaloriesCaption,
}

impl ElementId {
    /// All elements in drawing order
    pub const ALL: [ElementId; ELEMENT_COUNT] = [
        ElementId::Background,
        ElementId::Hours,
        ElementId::Minutes,
        ElementId::AmPm,
        ElementId::Day,
        ElementId::Date,
        ElementId::Separator,
        ElementId::HeartRate,
        ElementId::HeartRateCaption,
        ElementId::Steps,
        ElementId::StepsCaption,
        ElementId::Calories,
        ElementId::CaloriesCaption,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Named sets of elements that change together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Group {
    /// Filled with the background colour
    Background,
    /// Filled with the foreground (accent) colour
    Colored,
    /// Decorations hidden while neat mode is active
    Neat,
}

impl Group {
    pub fn members(self) -> &'static [ElementId] {
        match self {
            Group::Background => &[ElementId::Background],
            Group::Colored => &[
                ElementId::Hours,
                ElementId::Separator,
                ElementId::HeartRateCaption,
                ElementId::StepsCaption,
                ElementId::CaloriesCaption,
            ],
            Group::Neat => &[
                ElementId::Day,
                ElementId::Date,
                ElementId::HeartRate,
                ElementId::HeartRateCaption,
                ElementId::Steps,
                ElementId::StepsCaption,
                ElementId::Calories,
                ElementId::CaloriesCaption,
            ],
        }
    }
}

/// Element opacity, 0 is fully transparent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Opacity(pub u8);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(u8::MAX);
    pub const TRANSPARENT: Opacity = Opacity(0);

    pub fn is_transparent(self) -> bool {
        self.0 == 0
    }
}

/// Geometry of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Fills the whole screen
    Fill,
    /// Text anchored at its baseline
    Text {
        position: Point,
        alignment: Alignment,
        font: FontSize,
    },
    /// Horizontal line at `y` from `x1` to `x2`
    Line { y: i32, x1: i32, x2: i32 },
}

/// Initial state of one element
#[derive(Debug, Clone, Copy)]
pub struct ElementSpec {
    pub id: ElementId,
    pub shape: Shape,
    pub text: &'static str,
    pub fill: Color,
}

/// Screen size plus the initial state of every element
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub size: Size,
    pub elements: [ElementSpec; ELEMENT_COUNT],
}

/// Retained state of one element
#[derive(Debug, Clone)]
pub struct Element {
    shape: Shape,
    text: Label,
    fill: Rgb565,
    opacity: Opacity,
}

impl Element {
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn fill(&self) -> Rgb565 {
        self.fill
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }
}

/// Holds every element of the clock face
pub struct Binder {
    size: Size,
    elements: [Element; ELEMENT_COUNT],
    /// Whether anything changed since the last render
    dirty: bool,
}

impl Binder {
    /// Resolve the layout into element state
    pub fn new(layout: &Layout) -> Self {
        let elements = core::array::from_fn(|i| {
            let id = ElementId::ALL[i];
            // Fall back to the slot order if the layout lists ids out of order
            let spec = layout
                .elements
                .iter()
                .find(|spec| spec.id == id)
                .unwrap_or(&layout.elements[i]);
            Element {
                shape: spec.shape,
                text: truncated(spec.text),
                fill: spec.fill.rgb565(),
                opacity: Opacity::OPAQUE,
            }
        });

        Self {
            size: layout.size,
            elements,
            dirty: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    /// Elements with their ids, in drawing order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        ElementId::ALL.iter().copied().zip(self.elements.iter())
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.element(id).text()
    }

    /// Replace the text of an element, truncating what does not fit
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        let element = &mut self.elements[id.index()];
        if element.text.as_str() != text {
            element.text = truncated(text);
            self.dirty = true;
        }
    }

    pub fn fill(&self, id: ElementId) -> Rgb565 {
        self.element(id).fill
    }

    pub fn set_fill(&mut self, id: ElementId, color: Rgb565) {
        let element = &mut self.elements[id.index()];
        if element.fill != color {
            element.fill = color;
            self.dirty = true;
        }
    }

    pub fn opacity(&self, id: ElementId) -> Opacity {
        self.element(id).opacity
    }

    pub fn set_opacity(&mut self, id: ElementId, opacity: Opacity) {
        let element = &mut self.elements[id.index()];
        if element.opacity != opacity {
            element.opacity = opacity;
            self.dirty = true;
        }
    }

    /// Change the font size of a text element, other shapes are left alone
    pub fn set_font_size(&mut self, id: ElementId, size: FontSize) {
        let element = &mut self.elements[id.index()];
        if let Shape::Text { font, .. } = &mut element.shape {
            if *font != size {
                *font = size;
                self.dirty = true;
            }
        }
    }

    /// Horizontal extent of a line element
    pub fn line_span(&self, id: ElementId) -> Option<(i32, i32)> {
        match self.element(id).shape {
            Shape::Line { x1, x2, .. } => Some((x1, x2)),
            _ => None,
        }
    }

    /// Move the endpoints of a line element, other shapes are left alone
    pub fn set_line_span(&mut self, id: ElementId, start: i32, end: i32) {
        let element = &mut self.elements[id.index()];
        if let Shape::Line { x1, x2, .. } = &mut element.shape {
            if (*x1, *x2) != (start, end) {
                *x1 = start;
                *x2 = end;
                self.dirty = true;
            }
        }
    }

    pub fn fill_group(&mut self, group: Group, color: Rgb565) {
        for id in group.members() {
            self.set_fill(*id, color);
        }
    }

    pub fn set_group_opacity(&mut self, group: Group, opacity: Opacity) {
        for id in group.members() {
            self.set_opacity(*id, opacity);
        }
    }

    /// Show or hide the neat-mode decorations
    pub fn toggle_neat_elements(&mut self, on: bool) {
        let opacity = if on {
            Opacity::OPAQUE
        } else {
            Opacity::TRANSPARENT
        };
        self.set_group_opacity(Group::Neat, opacity);
    }

    /// Paint the coloured elements with the foreground colour or plain white
    pub fn toggle_colored_elements(&mut self, on: bool, foreground: Color) {
        let color = if on { foreground } else { Color::White };
        self.fill_group(Group::Colored, color.rgb565());
    }

    /// Check if the face needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the face as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

fn truncated(text: &str) -> Label {
    let mut end = text.len().min(LABEL_LEN);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut label = Label::new();
    let _ = label.push_str(&text[..end]);
    label
}
