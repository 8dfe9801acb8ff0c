#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Core
use core::cell::RefCell;

// Device
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::{SPI2, TWISPI1},
    spim,
    twim::{self, Twim},
};
use embassy_sync::{
    blocking_mutex::{
        raw::{NoopRawMutex, ThreadModeRawMutex},
        Mutex,
    },
    channel::Channel,
    signal::Signal,
};
use embassy_time::{Duration, Instant, Ticker, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1 => twim::InterruptHandler<TWISPI1>;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::Backlight,
    button::Button,
    display::Display,
    heartrate::{HeartRateHandle, HeartRateMonitor, PresenceHandle, DELTA_T_MS},
    touch::{TouchController, TouchGesture},
};
use system::{
    bluetooth::{self, Server},
    config::{SystemConfig, BRIGHTNESS_ON, PERMISSIONS, PREFERENCES, UTC_OFFSET},
};

// Clock face
use pinetime_watchface::{
    system::time::until_next_tick, Event, Granularity, SensorManager, TimeManager, TimeReference,
    Watchface,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

type Face = Watchface<HeartRateHandle, PresenceHandle>;

// Communication channels
pub static EVENTS: Channel<ThreadModeRawMutex, Event, 8> = Channel::new();
static GRANULARITY: Signal<ThreadModeRawMutex, Granularity> = Signal::new();
pub static TIME_REFERENCE: Signal<ThreadModeRawMutex, TimeReference> = Signal::new();

static I2C_BUS: StaticCell<Mutex<NoopRawMutex, RefCell<Twim<'static, TWISPI1>>>> =
    StaticCell::new();

/// Queue an event from a task that must not block on a full queue
fn post(event: Event) {
    if EVENTS.try_send(event).is_err() {
        defmt::warn!("Event queue full, dropping event");
    }
}

/// Owns the clock face and the screen, applies every event in order
#[embassy_executor::task(pool_size = 1)]
async fn render(mut face: Face, mut display: Display, mut backlight: Backlight<'static>) {
    let mut granularity = face.granularity();
    loop {
        let event = EVENTS.receive().await;
        if let Event::DisplayChange { on } = event {
            switch_display(&mut display, &mut backlight, on);
        }

        face.handle(event);

        if face.granularity() != granularity {
            granularity = face.granularity();
            GRANULARITY.signal(granularity);
        }

        // A hidden screen keeps its changes until it comes back on
        if backlight.is_on() && face.binder().is_dirty() {
            match display.draw(face.binder()) {
                Ok(()) => face.binder_mut().mark_clean(),
                Err(err) => defmt::warn!("Drawing failed: {}", err),
            }
        }
    }
}

fn switch_display(display: &mut Display, backlight: &mut Backlight<'static>, on: bool) {
    if on {
        if let Err(err) = display.wake() {
            defmt::warn!("Waking display failed: {}", err);
        }
        if let Err(err) = backlight.set(BRIGHTNESS_ON) {
            defmt::warn!("Backlight: {}", err);
        }
    } else {
        backlight.off();
        if let Err(err) = display.sleep() {
            defmt::warn!("Putting display to sleep failed: {}", err);
        }
    }
}

/// Tick on every second or minute boundary
#[embassy_executor::task(pool_size = 1)]
async fn clock(reference: TimeReference) {
    let mut time = TimeManager::init(reference);
    let mut granularity = Granularity::default();
    loop {
        let now = time.now(Instant::now().as_millis());
        EVENTS.send(Event::Tick(now)).await;

        let wait = until_next_tick(now, granularity);
        match select3(
            Timer::after_millis(wait),
            GRANULARITY.wait(),
            TIME_REFERENCE.wait(),
        )
        .await
        {
            Either3::First(()) => {}
            Either3::Second(next) => {
                defmt::info!("Clock granularity: {}", next);
                granularity = next;
            }
            Either3::Third(reference) => time.set_time(reference),
        }
    }
}

/// Polls the button state every 10ms, a press toggles the display
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut button: Button<'static>) {
    let mut on = true;
    loop {
        if button.pressed().await {
            on = !on;
            post(Event::DisplayChange { on });
        }
        Timer::after_millis(10).await;
    }
}

/// Polls the touch controller every 10ms
#[embassy_executor::task(pool_size = 1)]
async fn poll_touch(mut touch: TouchController) {
    loop {
        if let Some(TouchGesture::SingleClick) = touch.try_event_detected() {
            post(Event::BackgroundTap);
        }
        Timer::after_millis(10).await;
    }
}

/// Samples the HRS3300 and forwards presence and heart rate
#[embassy_executor::task(pool_size = 1)]
async fn heart_rate(mut monitor: HeartRateMonitor) {
    let mut tick = Ticker::every(Duration::from_millis(DELTA_T_MS));
    loop {
        match monitor.sample() {
            Ok(reading) => {
                // Presence gates heart-rate sampling, it must not be dropped
                if let Some(present) = reading.presence {
                    EVENTS.send(Event::Presence(present)).await;
                    monitor.acknowledge_presence(present);
                }
                if let Some(bpm) = reading.bpm {
                    post(Event::HeartRate(bpm));
                }
            }
            Err(err) => defmt::warn!("Heart rate sensor: {}", err),
        }
        tick.next().await;
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    SystemConfig::set_interrupt_priorities();
    defmt::info!("Initializing");

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = unwrap!(Server::new(sd));
    let sd: &'static Softdevice = sd;

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        BRIGHTNESS_ON,
    ));

    // Initialize Button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize I2C
    let mut i2c_config = twim::Config::default();
    // Use I2C at 400KHz (the fastest clock available on the nRF52832),
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI1, Irqs, p.P0_06, p.P0_07, i2c_config);
    let i2c_bus: &'static _ = I2C_BUS.init(Mutex::new(RefCell::new(i2c)));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;
    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Initialize touch controller
    let touch = unwrap!(TouchController::init(
        I2cDevice::new(i2c_bus),
        Input::new(p.P0_28, Pull::Up), // Touchpad external interrupt pin: P0.28/AIN4 (TP_INT)
        Output::new(p.P0_10, Level::High, OutputDrive::Standard), // Touchpad reset pin: P0.10/NFC2 (TP_RESET)
    ));

    // Initialize heart rate sensor
    let monitor = unwrap!(HeartRateMonitor::init(I2cDevice::new(i2c_bus)));

    // Clock face
    let sensors = SensorManager::init(&PERMISSIONS, HeartRateHandle::new, || PresenceHandle);
    let face = Watchface::new(PREFERENCES, sensors);
    let reference = unwrap!(TimeReference::from_timestamp(
        UTC_EPOCH,
        UTC_OFFSET,
        Instant::now().as_millis()
    ));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(bluetooth::serve(sd, server)));
    unwrap!(spawner.spawn(render(face, display, backlight)));
    unwrap!(spawner.spawn(clock(reference)));
    unwrap!(spawner.spawn(poll_button(button)));
    unwrap!(spawner.spawn(poll_touch(touch)));
    unwrap!(spawner.spawn(heart_rate(monitor)));
}
