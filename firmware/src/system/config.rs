//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::{self, InterruptExt, Priority},
};
use pinetime_watchface::{
    i18n::Locale,
    sensors::{Permission, Permissions},
    ClockDisplay, Preferences,
};

/// Offset of local time from UTC until the phone sends the time, in seconds
pub const UTC_OFFSET: i32 = 3_600;

/// Backlight level while the display is on (0–7)
pub const BRIGHTNESS_ON: u8 = 3;

/// Preferences used until the phone sends its own
pub const PREFERENCES: Preferences = Preferences {
    locale: Locale::EnUs,
    clock_display: ClockDisplay::TwentyFourHour,
};

/// Features the clock face may use on this board
pub struct BoardPermissions {
    pub heart_rate: bool,
    pub activity: bool,
}

pub const PERMISSIONS: BoardPermissions = BoardPermissions {
    heart_rate: true,
    activity: true,
};

impl Permissions for BoardPermissions {
    fn granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::HeartRate => self.heart_rate,
            Permission::Activity => self.activity,
        }
    }
}

pub struct SystemConfig {}

impl SystemConfig {
    /// Create new system configuration
    pub fn new() -> Config {
        // Generate default config, required because Config is set as
        // `non_exhaustive`
        let mut config = Config::default();

        // Set high-frequency and low-frequency clock sources to external
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Configure interrupt priorities to exclude 0 (default), 1, and 4,
        // which are reserved for the nrf SoftDevice
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }

    /// Move the bus interrupts off the levels reserved for the SoftDevice
    pub fn set_interrupt_priorities() {
        interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);
        interrupt::SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1.set_priority(Priority::P3);
    }
}
