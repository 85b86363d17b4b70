//! Relative Control Change value encodings.
//!
//! A relative CC carries a signed movement instead of an absolute position.
//! MIDI itself does not say how a negative number fits in a 7-bit data byte,
//! so receivers disagree. Three conventions cover every common DAW:
//!
//! | Mode | +1 | −1 | +3 | −3 | zero | range |
//! |---|---|---|---|---|---|---|
//! | [`TwosComplement`](RelativeMode::TwosComplement) | 1 | 127 | 3 | 125 | 0 | −64..=63 (wraps) |
//! | [`BinaryOffset`](RelativeMode::BinaryOffset) | 65 | 63 | 67 | 61 | 64 | −64..=63 (saturates) |
//! | [`SignMagnitude`](RelativeMode::SignMagnitude) | 1 | 65 | 3 | 67 | 0 | −63..=63 (saturates) |
//!
//! DAW-specific names are provided as aliases on [`RelativeMode`]
//! (`REAPER_RELATIVE_1`, `MACKIE_CONTROL_RELATIVE`, …); they are the same
//! values, not separate encodings.

use crate::config::EncoderConfig;
use crate::error::ConfigError;

/// Pulses per detent of a typical mechanical encoder.
pub const NORMAL_ENCODER: u8 = 4;

/// One step per pulse, for jog wheels and other high-resolution controls.
pub const JOG: u8 = 1;

const SIGN_BIT: u8 = 0b0100_0000;
const MAGNITUDE_MASK: u8 = 0b0011_1111;
const DATA_MASK: u8 = 0x7F;
const BINARY_OFFSET: i32 = 64;

/// How a signed delta is packed into a 7-bit data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelativeMode {
    /// Low 7 bits of the two's complement delta.
    TwosComplement,
    /// `delta + 64`; 64 means no movement.
    BinaryOffset,
    /// Bit 6 is the sign (set = negative), bits 0–5 the magnitude.
    SignMagnitude,
}

impl RelativeMode {
    /// REAPER "Relative 1" (127 = −1, 1 = +1).
    pub const REAPER_RELATIVE_1: Self = Self::TwosComplement;
    /// REAPER "Relative 2" (63 = −1, 65 = +1).
    pub const REAPER_RELATIVE_2: Self = Self::BinaryOffset;
    /// REAPER "Relative 3" (65 = −1, 1 = +1).
    pub const REAPER_RELATIVE_3: Self = Self::SignMagnitude;
    /// Tracktion / Waveform relative mode.
    pub const TRACKTION_RELATIVE: Self = Self::TwosComplement;
    /// Mackie Control V-Pot encoding.
    pub const MACKIE_CONTROL_RELATIVE: Self = Self::SignMagnitude;
}

/// Encode `delta` as a 7-bit relative CC value.
///
/// Two's complement wraps modulo 128. The other modes saturate at the
/// largest representable movement instead of wrapping into the sign.
///
/// Callers are expected to skip zero deltas: "no movement" is never sent.
///
/// # Example
/// ```
/// use spirant_controls::relative::{encode, RelativeMode};
///
/// assert_eq!(encode(-1, RelativeMode::TwosComplement), 127);
/// assert_eq!(encode(1, RelativeMode::BinaryOffset), 65);
/// assert_eq!(encode(1000, RelativeMode::SignMagnitude), 63);
/// ```
pub fn encode(delta: i32, mode: RelativeMode) -> u8 {
    match mode {
        RelativeMode::TwosComplement => (delta & i32::from(DATA_MASK)) as u8,
        RelativeMode::BinaryOffset => {
            let offset = delta.clamp(-BINARY_OFFSET, BINARY_OFFSET - 1) + BINARY_OFFSET;
            offset as u8
        }
        RelativeMode::SignMagnitude => {
            let magnitude = delta.unsigned_abs().min(u32::from(MAGNITUDE_MASK)) as u8;
            let sign = if delta < 0 { SIGN_BIT } else { 0 };
            sign | magnitude
        }
    }
}

/// Decode a 7-bit relative CC value back into a signed delta.
///
/// Inverse of [`encode`] for every delta inside the mode's range. Bit 7 of
/// `value` is ignored.
pub fn decode(value: u8, mode: RelativeMode) -> i8 {
    let value = value & DATA_MASK;
    match mode {
        RelativeMode::TwosComplement => {
            // Sign-extend bit 6 by shifting it into bit 7.
            ((value << 1) as i8) >> 1
        }
        RelativeMode::BinaryOffset => (i16::from(value) - BINARY_OFFSET as i16) as i8,
        RelativeMode::SignMagnitude => {
            let magnitude = (value & MAGNITUDE_MASK) as i8;
            if value & SIGN_BIT != 0 {
                -magnitude
            } else {
                magnitude
            }
        }
    }
}

/// Validated encoder scaling plus wire encoding for one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeCodec {
    mode: RelativeMode,
    speed_multiplier: i32,
    pulses_per_step: i32,
}

impl RelativeCodec {
    /// Build from an [`EncoderConfig`].
    ///
    /// # Errors
    /// * [`ConfigError::InvalidPulsesPerStep`] if `pulses_per_step == 0`
    /// * [`ConfigError::InvalidSpeedMultiplier`] if `speed_multiplier == 0`
    pub fn new(config: &EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            speed_multiplier: i32::from(config.speed_multiplier),
            pulses_per_step: i32::from(config.pulses_per_step),
        })
    }

    pub fn mode(&self) -> RelativeMode {
        self.mode
    }

    /// Always ≥ 1.
    pub fn pulses_per_step(&self) -> i32 {
        self.pulses_per_step
    }

    /// Apply the speed multiplier to a step count.
    pub fn scale(&self, steps: i32) -> i32 {
        steps.saturating_mul(self.speed_multiplier)
    }

    /// Scale and encode `steps`; `None` when there is no movement to send.
    pub fn encode_steps(&self, steps: i32) -> Option<u8> {
        let delta = self.scale(steps);
        if delta == 0 {
            return None;
        }
        Some(encode(delta, self.mode))
    }
}
