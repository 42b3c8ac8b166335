//! Platform abstraction layer
//!
//! Handles browser/native differences for device feedback (vibration).

use crate::audio::FeedbackError;

/// Vibration strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vibration {
    /// Short tick when the player starts to fall
    Light,
    /// Longer buzz on game over
    Heavy,
}

impl Vibration {
    /// Pulse length in milliseconds
    pub fn duration_ms(&self) -> u32 {
        match self {
            Vibration::Light => 15,
            Vibration::Heavy => 40,
        }
    }
}

/// Anything that can vibrate the device
pub trait Haptics {
    fn vibrate(&mut self, strength: Vibration) -> Result<(), FeedbackError>;
}

/// The device's own vibration motor
#[derive(Debug, Default)]
pub struct DeviceHaptics;

impl Haptics for DeviceHaptics {
    #[cfg(target_arch = "wasm32")]
    fn vibrate(&mut self, strength: Vibration) -> Result<(), FeedbackError> {
        let window = web_sys::window().ok_or(FeedbackError::Unavailable("window"))?;
        if window
            .navigator()
            .vibrate_with_duration(strength.duration_ms())
        {
            Ok(())
        } else {
            Err(FeedbackError::Rejected("navigator.vibrate refused".into()))
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn vibrate(&mut self, strength: Vibration) -> Result<(), FeedbackError> {
        // No motor on desktop
        log::trace!("vibrate {:?} ({} ms)", strength, strength.duration_ms());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heavy_is_longer() {
        assert!(Vibration::Heavy.duration_ms() > Vibration::Light.duration_ms());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_vibrate_is_a_no_op() {
        let mut haptics = DeviceHaptics;
        assert_eq!(haptics.vibrate(Vibration::Heavy), Ok(()));
    }
}
