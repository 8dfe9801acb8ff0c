//! Sensor manager
//!
//! Owns the heart-rate and body-presence handles and keeps heart-rate
//! sampling running only while the watch is worn.
//!
//! ```text
//!            presence: true
//!   Idle ──────────────────────▶ Present
//!    │   ◀── presence: false ──   │
//!    │ presence: false            │
//!    ▼                            │
//!   NotPresent ◀──────────────────┘
//! ```

use crate::{
    format::{self, PLACEHOLDER},
    ui::{Binder, ElementId},
};

/// Heart-rate sampling frequency in Hz
pub const HEART_RATE_FREQUENCY: u8 = 3;

/// Permissions the clock face may be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Permission {
    HeartRate,
    Activity,
}

/// Answers permission queries
pub trait Permissions {
    fn granted(&self, permission: Permission) -> bool;
}

/// Handle of a running heart-rate sensor
pub trait HeartRateSensor {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Handle of a body-presence sensor
pub trait BodyPresenceSensor {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Sensor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorState {
    /// No presence reading yet, or no presence sensor at all
    Idle,
    /// Presence sensor reports the watch is not worn
    NotPresent,
    /// Watch is worn, heart rate is sampled if a sensor exists
    Present,
}

pub struct SensorManager<H, P> {
    heart_rate: Option<H>,
    presence: Option<P>,
    state: SensorState,
}

impl<H, P> SensorManager<H, P>
where
    H: HeartRateSensor,
    P: BodyPresenceSensor,
{
    /// Allocate the sensors the permissions allow
    ///
    /// `heart_rate` receives the sampling frequency. A granted presence
    /// sensor is started right away; heart-rate sampling waits for the
    /// first presence reading.
    pub fn init(
        permissions: &impl Permissions,
        heart_rate: impl FnOnce(u8) -> H,
        presence: impl FnOnce() -> P,
    ) -> Self {
        let heart_rate = if permissions.granted(Permission::HeartRate) {
            info!("Heart rate sensor allocated at {} Hz", HEART_RATE_FREQUENCY);
            Some(heart_rate(HEART_RATE_FREQUENCY))
        } else {
            None
        };

        let presence = if permissions.granted(Permission::Activity) {
            let mut sensor = presence();
            sensor.start();
            info!("Body presence sensor started");
            Some(sensor)
        } else {
            None
        };

        Self {
            heart_rate,
            presence,
            state: SensorState::Idle,
        }
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn has_heart_rate(&self) -> bool {
        self.heart_rate.is_some()
    }

    pub fn has_presence(&self) -> bool {
        self.presence.is_some()
    }

    /// New heart-rate reading in bpm
    pub fn on_heart_rate(&mut self, bpm: u16, binder: &mut Binder) {
        // Late readings after the watch came off must not overwrite the placeholder
        if self.state != SensorState::Present || self.heart_rate.is_none() {
            trace!("Dropping heart rate reading while not worn");
            return;
        }
        binder.set_text(ElementId::HeartRate, &format::format_count(Some(bpm as u32)));
    }

    /// New presence reading
    pub fn on_presence(&mut self, present: bool, binder: &mut Binder) {
        if !present {
            if let Some(sensor) = self.heart_rate.as_mut() {
                sensor.stop();
            }
            binder.set_text(ElementId::HeartRate, PLACEHOLDER);
            self.state = SensorState::NotPresent;
            debug!("Watch taken off, heart rate stopped");
            return;
        }

        if let Some(sensor) = self.heart_rate.as_mut() {
            sensor.start();
        }
        self.state = SensorState::Present;
        debug!("Watch worn, heart rate started");
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Calls made on a mock sensor
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct Log {
        pub starts: u32,
        pub stops: u32,
        pub frequency: Option<u8>,
    }

    impl Log {
        pub fn running(&self) -> bool {
            self.starts > self.stops
        }
    }

    #[derive(Clone, Default)]
    pub struct MockSensor(pub Rc<RefCell<Log>>);

    impl HeartRateSensor for MockSensor {
        fn start(&mut self) {
            self.0.borrow_mut().starts += 1;
        }

        fn stop(&mut self) {
            self.0.borrow_mut().stops += 1;
        }
    }

    impl BodyPresenceSensor for MockSensor {
        fn start(&mut self) {
            self.0.borrow_mut().starts += 1;
        }

        fn stop(&mut self) {
            self.0.borrow_mut().stops += 1;
        }
    }

    pub struct Grants {
        pub heart_rate: bool,
        pub activity: bool,
    }

    impl Permissions for Grants {
        fn granted(&self, permission: Permission) -> bool {
            match permission {
                Permission::HeartRate => self.heart_rate,
                Permission::Activity => self.activity,
            }
        }
    }

    /// Manager plus handles onto the logs of both sensors
    pub fn manager(
        heart_rate: bool,
        activity: bool,
    ) -> (SensorManager<MockSensor, MockSensor>, MockSensor, MockSensor) {
        let hr = MockSensor::default();
        let body = MockSensor::default();
        let (hr_handle, body_handle) = (hr.clone(), body.clone());
        let manager = SensorManager::init(
            &Grants {
                heart_rate,
                activity,
            },
            move |frequency| {
                hr_handle.0.borrow_mut().frequency = Some(frequency);
                hr_handle
            },
            move || body_handle,
        );
        (manager, hr, body)
    }
}
