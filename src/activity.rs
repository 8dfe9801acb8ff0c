//! Today's activity totals

use serde::{Deserialize, Serialize};

/// Step count and calories of the current day
///
/// `None` means the source has no value yet; it renders the same as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Activity {
    pub steps: Option<u32>,
    pub calories: Option<u32>,
}

impl Activity {
    pub fn new(steps: u32, calories: u32) -> Self {
        Self {
            steps: Some(steps),
            calories: Some(calories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::settings::{from_bytes, to_slice, MAX_ENCODED_LEN};

    #[test]
    fn test_default_is_absent() {
        let activity = Activity::default();
        assert_eq!(activity.steps, None);
        assert_eq!(activity.calories, None);
    }

    #[test]
    fn test_wire_format() {
        let activity = Activity::new(4321, 180);
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let used = to_slice(&activity, &mut buf).unwrap();
        assert_eq!(from_bytes::<Activity>(used).unwrap(), activity);
    }
}
