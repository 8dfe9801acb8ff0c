//! Board peripherals used by the clock face

pub(crate) mod backlight;
pub(crate) mod button;
pub(crate) mod display;
pub(crate) mod heartrate;
pub(crate) mod touch;
