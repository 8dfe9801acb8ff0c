//! Touch controller module for PineTime

pub use cst816s::TouchGesture;

use cst816s::CST816S;
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_10, P0_28, TWISPI1},
    twim::Twim,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Delay;

/// I2C device on the bus shared with the heart-rate sensor
pub type SharedI2c = I2cDevice<'static, NoopRawMutex, Twim<'static, TWISPI1>>;

pub struct TouchController {
    touchpad: CST816S<SharedI2c, Input<'static, P0_28>, Output<'static, P0_10>>,
}

impl TouchController {
    /// Reset and configure the touchpad
    pub fn init(
        twi: SharedI2c,
        interrupt_pin: Input<'static, P0_28>,
        reset_pin: Output<'static, P0_10>,
    ) -> Result<Self, Error> {
        let mut touchpad = CST816S::new(twi, interrupt_pin, reset_pin);
        touchpad.setup(&mut Delay).map_err(|_| Error::Setup)?;
        Ok(Self { touchpad })
    }

    /// Check for new touch event
    pub fn try_event_detected(&mut self) -> Option<TouchGesture> {
        self.touchpad
            .read_one_touch_event(true)
            .map(|event| event.gesture)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Setup,
}
