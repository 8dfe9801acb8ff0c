//! UI definitions module
//!
//! The binder keeps the retained state of every element, the default
//! watchface lays the elements out and draws them.

pub mod binder;
pub mod default_watchface;
pub mod palette;

pub use binder::{Binder, ElementId, Group, Opacity};
pub use default_watchface::{draw, LAYOUT};
pub use palette::Color;

/// Panel width of the PineTime
pub const LCD_W: u32 = 240;
/// Panel height of the PineTime
pub const LCD_H: u32 = 240;
