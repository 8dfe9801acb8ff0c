//! PPG sampling helpers
//!
//! The hardware loop reads the optical sensor; these types decide which
//! readings turn into presence and heart-rate events.

/// Outcome of one heart-rate estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Estimate {
    /// Window not full yet
    Pending,
    /// Window analysed but too noisy to trust
    Rejected,
    Bpm(u16),
}

/// Worn/not-worn decision on the reflected light level, with hysteresis
///
/// A change stays pending until [`PresenceDetector::acknowledge`] confirms
/// it was delivered, so a lost event is reported again on the next reading.
pub struct PresenceDetector {
    worn_above: u32,
    off_below: u32,
    reported: Option<bool>,
}

impl PresenceDetector {
    pub const fn new(worn_above: u32, off_below: u32) -> Self {
        Self {
            worn_above,
            off_below,
            reported: None,
        }
    }

    /// Presence to report for this level, `None` if nothing changed
    pub fn update(&self, level: u32) -> Option<bool> {
        let worn = match self.reported {
            Some(true) => level > self.off_below,
            _ => level > self.worn_above,
        };
        (self.reported != Some(worn)).then_some(worn)
    }

    /// The change was delivered
    pub fn acknowledge(&mut self, worn: bool) {
        self.reported = Some(worn);
    }

    /// Forget the last state, the next reading is reported again
    pub fn reset(&mut self) {
        self.reported = None;
    }
}

/// Reports the latest trusted estimate at a fixed rate
pub struct BpmReporter {
    /// Samples between two reports
    every: u32,
    samples: u32,
    latest: Option<u16>,
}

impl BpmReporter {
    pub fn new(sample_hz: u32, report_hz: u8) -> Self {
        let mut reporter = Self {
            every: 1,
            samples: 0,
            latest: None,
        };
        reporter.set_rate(sample_hz, report_hz);
        reporter
    }

    pub fn set_rate(&mut self, sample_hz: u32, report_hz: u8) {
        self.every = (sample_hz / report_hz.max(1) as u32).max(1);
    }

    /// Feed one sample's estimate, returns the bpm due for reporting
    pub fn push(&mut self, estimate: Estimate) -> Option<u16> {
        match estimate {
            Estimate::Bpm(bpm) => self.latest = Some(bpm),
            Estimate::Rejected => self.latest = None,
            Estimate::Pending => {}
        }
        self.samples = self.samples.wrapping_add(1);
        if self.samples % self.every == 0 {
            self.latest
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.samples = 0;
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_hysteresis() {
        let mut detector = PresenceDetector::new(3_000, 1_500);
        assert_eq!(detector.update(2_000), Some(false));
        detector.acknowledge(false);
        assert_eq!(detector.update(2_000), None);

        assert_eq!(detector.update(3_500), Some(true));
        detector.acknowledge(true);
        // Between the thresholds the watch stays worn
        assert_eq!(detector.update(2_000), None);
        assert_eq!(detector.update(1_000), Some(false));
    }

    #[test]
    fn test_undelivered_presence_is_reported_again() {
        let mut detector = PresenceDetector::new(3_000, 1_500);
        detector.acknowledge(true);

        assert_eq!(detector.update(500), Some(false));
        // Event was dropped, nothing acknowledged
        assert_eq!(detector.update(600), Some(false));
        detector.acknowledge(false);
        assert_eq!(detector.update(700), None);
    }

    #[test]
    fn test_presence_reset_reports_again() {
        let mut detector = PresenceDetector::new(3_000, 1_500);
        detector.acknowledge(true);
        detector.reset();
        assert_eq!(detector.update(4_000), Some(true));
    }

    #[test]
    fn test_reports_at_requested_rate() {
        let mut reporter = BpmReporter::new(10, 3);
        assert_eq!(reporter.push(Estimate::Bpm(70)), None);
        assert_eq!(reporter.push(Estimate::Pending), None);
        assert_eq!(reporter.push(Estimate::Pending), Some(70));
        assert_eq!(reporter.push(Estimate::Bpm(72)), None);
    }

    #[test]
    fn test_rejected_window_clears_estimate() {
        let mut reporter = BpmReporter::new(10, 10);
        assert_eq!(reporter.push(Estimate::Bpm(70)), Some(70));
        assert_eq!(reporter.push(Estimate::Pending), Some(70));
        assert_eq!(reporter.push(Estimate::Rejected), None);
        assert_eq!(reporter.push(Estimate::Pending), None);
        assert_eq!(reporter.push(Estimate::Bpm(75)), Some(75));
    }

    #[test]
    fn test_reporter_reset_forgets_estimate() {
        let mut reporter = BpmReporter::new(10, 10);
        assert_eq!(reporter.push(Estimate::Bpm(64)), Some(64));
        reporter.reset();
        assert_eq!(reporter.push(Estimate::Pending), None);
    }
}
