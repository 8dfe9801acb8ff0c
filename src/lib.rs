//! Clock face for the PineTime
//!
//! Board-agnostic clock face logic: everything that turns ticks, sensor
//! readings and user settings into the state of the elements on screen.
//!
//! - Time and date formatting with a small set of locales
//! - Display binder holding typed handles to every on-screen element
//! - Sensor manager gating heart-rate sampling on body presence
//! - Presence and heart-rate reporting for the PPG sampling loop
//! - Settings and preferences with their BLE wire format
//! - The `Watchface` state struct that handles every host event
//!
//! The firmware crate under `firmware/` owns the hardware and feeds
//! events into [`Watchface::handle`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod activity;
pub mod format;
pub mod i18n;
pub mod sampling;
pub mod sensors;
pub mod system;
pub mod ui;
pub mod watchface;

pub use activity::Activity;
pub use sensors::{BodyPresenceSensor, HeartRateSensor, Permission, Permissions, SensorManager};
pub use system::{
    settings::{ClockDisplay, Preferences, Settings},
    time::{Granularity, TimeManager, TimeReference},
};
pub use watchface::{Event, Watchface};
