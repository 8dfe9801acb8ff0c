//! Heart rate from the photoplethysmogram
//!
//! Keeps the last 64 reflected-light samples, removes the trend, band-pass
//! filters the window and picks the strongest spectral peak between 30 and
//! 240 bpm.

use core::f32::consts::PI;

use microfft::complex::cfft_64;
use num_complex::Complex32;
use pinetime_watchface::sampling::Estimate;

/// Sampling period in milliseconds
pub const DELTA_T_MS: u64 = 100;
/// Window length, a power of two
const DATA_LENGTH: usize = 64;
/// New samples between two estimates
const OVERLAP_WINDOW: usize = 5;

/// Hz per bin: 10 Hz sampling over 64 samples
const FREQ_RES: f32 = 0.156_25;
/// First and last bin of the 30..240 bpm band
const ROI_BEGIN: usize = 3;
const ROI_END: usize = 26;
/// Peak must stand this far above the mean of the region of interest
const SN_THRESHOLD: f32 = 3.0;
/// Ambient light above this level drowns the signal
const ALS_LIMIT: u32 = 4_000;

pub struct Ppg {
    samples: [f32; DATA_LENGTH],
    len: usize,
    window: [f32; DATA_LENGTH],
}

impl Ppg {
    pub fn new() -> Self {
        let mut window = [0.0; DATA_LENGTH];
        for (i, w) in window.iter_mut().enumerate() {
            *w = 0.5 - 0.5 * libm::cosf(2.0 * PI * i as f32 / (DATA_LENGTH - 1) as f32);
        }
        Self {
            samples: [0.0; DATA_LENGTH],
            len: 0,
            window,
        }
    }

    /// Store one reading, false when ambient light spoils it
    pub fn push(&mut self, hrs: u32, als: u32) -> bool {
        if als > ALS_LIMIT {
            self.reset();
            return false;
        }
        if self.len < DATA_LENGTH {
            self.samples[self.len] = hrs as f32;
            self.len += 1;
        }
        true
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Heart rate in bpm once a full window is collected
    pub fn heart_rate(&mut self) -> Estimate {
        if self.len < DATA_LENGTH {
            return Estimate::Pending;
        }

        let mut signal = self.samples;
        detrend(&mut signal);
        band_pass(&mut signal);

        let mut buf = [Complex32::new(0.0, 0.0); DATA_LENGTH];
        for ((c, s), w) in buf.iter_mut().zip(signal.iter()).zip(self.window.iter()) {
            c.re = s * w;
        }
        let spectrum = cfft_64(&mut buf);

        let roi = &spectrum[ROI_BEGIN..=ROI_END];
        let mean = roi.iter().map(|c| c.norm_sqr()).sum::<f32>() / roi.len() as f32;
        let (peak, power) = roi
            .iter()
            .map(|c| c.norm_sqr())
            .enumerate()
            .fold((0, 0.0), |best, bin| if bin.1 > best.1 { bin } else { best });

        // Slide the window
        self.samples.copy_within(OVERLAP_WINDOW.., 0);
        self.len = DATA_LENGTH - OVERLAP_WINDOW;

        if mean <= 0.0 || libm::sqrtf(power / mean) < SN_THRESHOLD {
            return Estimate::Rejected;
        }
        let hz = (ROI_BEGIN + peak) as f32 * FREQ_RES;
        Estimate::Bpm(libm::roundf(hz * 60.0) as u16)
    }
}

/// Subtract the straight line through the first and last sample
fn detrend(signal: &mut [f32; DATA_LENGTH]) {
    let first = signal[0];
    let slope = (signal[DATA_LENGTH - 1] - first) / (DATA_LENGTH - 1) as f32;
    for (i, s) in signal.iter_mut().enumerate() {
        *s -= first + slope * i as f32;
    }
}

/// Exponential moving average band-pass, roughly 0.5 Hz to 4 Hz at 10 Hz
fn band_pass(signal: &mut [f32; DATA_LENGTH]) {
    for _ in 0..4 {
        let mut avg = signal[0];
        for s in signal.iter_mut() {
            avg = 0.816 * *s + (1.0 - 0.816) * avg;
            *s = avg;
        }
    }
    for _ in 0..4 {
        let mut avg = signal[0];
        for s in signal.iter_mut() {
            avg = 0.268 * *s + (1.0 - 0.268) * avg;
            *s -= avg;
        }
    }
}
