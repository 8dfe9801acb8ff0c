//! Clock keeping and user configuration

pub mod settings;
pub mod time;
