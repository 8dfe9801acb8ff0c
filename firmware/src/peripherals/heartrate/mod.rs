//! Heartrate monitor module for PineTime
//!
//! One HRS3300 serves both as heart-rate and as body-presence sensor. The
//! clock face switches the two roles through [`HeartRateHandle`] and
//! [`PresenceHandle`]; the monitor task reads the flags on every sample.

mod ppg;

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use hrs3300::Hrs3300;
use pinetime_watchface::{
    sampling::{BpmReporter, PresenceDetector},
    BodyPresenceSensor, HeartRateSensor,
};

use crate::peripherals::touch::SharedI2c;
use ppg::Ppg;

pub use ppg::DELTA_T_MS;

static HEART_RATE_ON: AtomicBool = AtomicBool::new(false);
static PRESENCE_ON: AtomicBool = AtomicBool::new(false);
static REPORT_HZ: AtomicU8 = AtomicU8::new(1);

/// Reflected light above this means the watch is on a wrist, below
/// the second level it came off
const PRESENCE: PresenceDetector = PresenceDetector::new(3_000, 1_500);

/// Samples per second
const SAMPLE_HZ: u32 = 1000 / DELTA_T_MS as u32;

/// Heart-rate role of the sensor
pub struct HeartRateHandle;

impl HeartRateHandle {
    /// Report heart rate `frequency` times a second
    pub fn new(frequency: u8) -> Self {
        REPORT_HZ.store(frequency.max(1), Ordering::Relaxed);
        Self
    }
}

impl HeartRateSensor for HeartRateHandle {
    fn start(&mut self) {
        HEART_RATE_ON.store(true, Ordering::Relaxed);
    }

    fn stop(&mut self) {
        HEART_RATE_ON.store(false, Ordering::Relaxed);
    }
}

/// Body-presence role of the sensor
pub struct PresenceHandle;

impl BodyPresenceSensor for PresenceHandle {
    fn start(&mut self) {
        PRESENCE_ON.store(true, Ordering::Relaxed);
    }

    fn stop(&mut self) {
        PRESENCE_ON.store(false, Ordering::Relaxed);
    }
}

/// What one sample produced
#[derive(Default)]
pub struct Reading {
    /// Presence changed to this value, confirm delivery with
    /// [`HeartRateMonitor::acknowledge_presence`]
    pub presence: Option<bool>,
    /// Heart rate due for reporting
    pub bpm: Option<u16>,
}

pub struct HeartRateMonitor {
    sensor: Hrs3300<SharedI2c>,
    ppg: Ppg,
    enabled: bool,
    presence: PresenceDetector,
    reporter: BpmReporter,
}

impl HeartRateMonitor {
    /// Configure heart rate monitor settings on boot
    pub fn init(interface: SharedI2c) -> Result<Self, Error> {
        let mut sensor = Hrs3300::new(interface);
        sensor.init().map_err(|_| Error::Bus)?;
        Ok(Self {
            sensor,
            ppg: Ppg::new(),
            enabled: false,
            presence: PRESENCE,
            reporter: BpmReporter::new(SAMPLE_HZ, REPORT_HZ.load(Ordering::Relaxed)),
        })
    }

    /// Take one sample, call every [`DELTA_T_MS`]
    pub fn sample(&mut self) -> Result<Reading, Error> {
        let presence_on = PRESENCE_ON.load(Ordering::Relaxed);
        let heart_rate_on = HEART_RATE_ON.load(Ordering::Relaxed);
        self.set_enabled(presence_on || heart_rate_on)?;
        if !self.enabled {
            self.presence.reset();
            return Ok(Reading::default());
        }

        let hrs = self.sensor.read_hrs().map_err(|_| Error::Bus)?;
        let als = self.sensor.read_als().map_err(|_| Error::Bus)?;
        let mut reading = Reading::default();

        if presence_on {
            reading.presence = self.presence.update(hrs);
            if let Some(worn) = reading.presence {
                defmt::debug!("Presence: {} (hrs {})", worn, hrs);
            }
        }

        if !heart_rate_on {
            self.ppg.reset();
            self.reporter.reset();
            return Ok(reading);
        }
        if !self.ppg.push(hrs, als) {
            defmt::trace!("Ambient light too strong: {}", als);
            self.reporter.reset();
            return Ok(reading);
        }

        self.reporter
            .set_rate(SAMPLE_HZ, REPORT_HZ.load(Ordering::Relaxed));
        reading.bpm = self.reporter.push(self.ppg.heart_rate());
        Ok(reading)
    }

    /// The presence change from [`Reading`] reached the clock face
    pub fn acknowledge_presence(&mut self, worn: bool) {
        self.presence.acknowledge(worn);
    }

    fn set_enabled(&mut self, on: bool) -> Result<(), Error> {
        if on == self.enabled {
            return Ok(());
        }
        if on {
            self.sensor.enable_hrs().map_err(|_| Error::Bus)?;
            self.sensor.enable_oscillator().map_err(|_| Error::Bus)?;
        } else {
            self.sensor.disable_hrs().map_err(|_| Error::Bus)?;
            self.sensor.disable_oscillator().map_err(|_| Error::Bus)?;
        }
        self.ppg.reset();
        self.reporter.reset();
        self.enabled = on;
        defmt::info!("Heart rate sensor {}", if on { "enabled" } else { "disabled" });
        Ok(())
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Bus,
}
