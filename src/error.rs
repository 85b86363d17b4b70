//! Error types for control construction and output buffering.

use core::fmt;

/// Configuration rejected at construction time.
///
/// Every variant indicates a wiring or configuration bug, never a transient
/// condition, so values are rejected instead of being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Controller number is outside `[0, 119]`.
    InvalidControllerNumber,
    /// MIDI channel is outside `[1, 16]`.
    InvalidChannel,
    /// Pulses per step must be at least 1.
    InvalidPulsesPerStep,
    /// Speed multiplier must be at least 1.
    InvalidSpeedMultiplier,
    /// Bank index is out of bounds (must be < number of banks).
    InvalidBankIndex,
    /// Long-press repeat delay must be non-zero.
    InvalidRepeatDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidControllerNumber => {
                write!(f, "Invalid controller number (must be 0-119)")
            }
            ConfigError::InvalidChannel => write!(f, "Invalid MIDI channel (must be 1-16)"),
            ConfigError::InvalidPulsesPerStep => write!(f, "Pulses per step must be at least 1"),
            ConfigError::InvalidSpeedMultiplier => {
                write!(f, "Speed multiplier must be at least 1")
            }
            ConfigError::InvalidBankIndex => write!(f, "Bank index out of range"),
            ConfigError::InvalidRepeatDelay => write!(f, "Long-press repeat delay must be non-zero"),
        }
    }
}

/// The output queue has no room left; the rejected message is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull<T>(pub T);

impl<T> fmt::Display for QueueFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MIDI output queue is full")
    }
}
