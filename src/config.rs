//! Construction-time configuration for buttons and encoders.
//!
//! Every field is fixed once a control is built. [`Default`] reproduces the
//! usual hardware: active-low buttons with a 25 ms debounce window and a
//! 450/350 ms long-press, detented encoders sending two's complement.

use embassy_time::Duration;

use crate::debounce::{Polarity, DEFAULT_DEBOUNCE_MS};
use crate::error::ConfigError;
use crate::relative::{RelativeMode, NORMAL_ENCODER};

/// Hold time before a held button starts auto-repeating, in milliseconds.
pub const LONG_PRESS_DELAY_MS: u64 = 450;

/// Interval between auto-repeats while held, in milliseconds.
pub const LONG_PRESS_REPEAT_MS: u64 = 350;

/// Button wiring and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Which pin level means pressed. Default: active-low.
    pub polarity: Polarity,
    /// Debounce window in milliseconds. Default: 25.
    pub debounce_ms: u64,
    /// Hold time before the first auto-repeat. Default: 450.
    pub long_press_delay_ms: u64,
    /// Interval between auto-repeats. Default: 350. Must be non-zero.
    pub long_press_repeat_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            polarity: Polarity::ActiveLow,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            long_press_delay_ms: LONG_PRESS_DELAY_MS,
            long_press_repeat_ms: LONG_PRESS_REPEAT_MS,
        }
    }
}

impl ButtonConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }

    pub fn long_press_repeat(&self) -> Duration {
        Duration::from_millis(self.long_press_repeat_ms)
    }

    /// Check the values a control cannot run with.
    ///
    /// A zero repeat interval would fire on every poll while held.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.long_press_repeat_ms == 0 {
            return Err(ConfigError::InvalidRepeatDelay);
        }
        Ok(())
    }
}

/// Rotary encoder scaling and wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Relative CC encoding understood by the receiver. Default: two's complement.
    pub mode: RelativeMode,
    /// Steps are multiplied by this before encoding. Default: 1. Must be ≥ 1.
    pub speed_multiplier: u8,
    /// Electrical pulses per detent. Default: 4 ([`NORMAL_ENCODER`]).
    /// Use [`JOG`](crate::relative::JOG) for full resolution. Must be ≥ 1.
    pub pulses_per_step: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mode: RelativeMode::TwosComplement,
            speed_multiplier: 1,
            pulses_per_step: NORMAL_ENCODER,
        }
    }
}

impl EncoderConfig {
    /// Reject a zero multiplier or a zero pulses-per-step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pulses_per_step == 0 {
            return Err(ConfigError::InvalidPulsesPerStep);
        }
        if self.speed_multiplier == 0 {
            return Err(ConfigError::InvalidSpeedMultiplier);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_button_config_values() {
        let c = ButtonConfig::default();
        assert_eq!(c.polarity, Polarity::ActiveLow);
        assert_eq!(c.debounce_window(), Duration::from_millis(25));
        assert_eq!(c.long_press_delay(), Duration::from_millis(450));
        assert_eq!(c.long_press_repeat(), Duration::from_millis(350));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_repeat_delay_is_rejected() {
        let c = ButtonConfig {
            long_press_repeat_ms: 0,
            ..ButtonConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::InvalidRepeatDelay));
    }

    #[test]
    fn default_encoder_config_values() {
        let c = EncoderConfig::default();
        assert_eq!(c.mode, RelativeMode::TwosComplement);
        assert_eq!(c.speed_multiplier, 1);
        assert_eq!(c.pulses_per_step, 4);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_pulses_per_step_is_rejected() {
        let c = EncoderConfig {
            pulses_per_step: 0,
            ..EncoderConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::InvalidPulsesPerStep));
    }

    #[test]
    fn zero_speed_multiplier_is_rejected() {
        let c = EncoderConfig {
            speed_multiplier: 0,
            ..EncoderConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::InvalidSpeedMultiplier));
    }
}
