//! Rotary encoder position tracking.
//!
//! The hardware (a quadrature decoder peripheral, an interrupt handler, an
//! I2C encoder board) keeps a running pulse count. [`RelativeEncoder`] turns
//! that absolute count into whole steps since the last poll.

use core::cell::Cell;

use crate::error::ConfigError;

/// Source of an absolute, signed encoder pulse count.
///
/// The count may wrap around `i32`; differences are taken with wrapping
/// arithmetic.
pub trait PulseCounter {
    /// Current pulse count.
    fn read(&mut self) -> i32;
}

/// A count written by an interrupt handler or another poll into a [`Cell`].
impl PulseCounter for &Cell<i32> {
    fn read(&mut self) -> i32 {
        self.get()
    }
}

/// Converts a running pulse count into step deltas.
///
/// Only whole steps are consumed: with 4 pulses per step, a count that moves
/// by 6 yields 1 step now and carries the remaining 2 pulses into the next
/// poll. Partial steps round toward zero, so a single pulse of jitter in
/// either direction never produces a step.
pub struct RelativeEncoder<C> {
    counter: C,
    pulses_per_step: i32,
    /// Count at the last consumed whole step.
    consumed: i32,
}

impl<C> RelativeEncoder<C>
where
    C: PulseCounter,
{
    /// Create an encoder, taking the counter's current value as the baseline.
    ///
    /// # Errors
    /// [`ConfigError::InvalidPulsesPerStep`] if `pulses_per_step < 1`. The
    /// counter is not read in that case.
    pub fn new(mut counter: C, pulses_per_step: i32) -> Result<Self, ConfigError> {
        if pulses_per_step < 1 {
            return Err(ConfigError::InvalidPulsesPerStep);
        }
        let consumed = counter.read();
        Ok(Self {
            counter,
            pulses_per_step,
            consumed,
        })
    }

    /// Whole steps moved since the previous call (negative = counter-clockwise).
    ///
    /// # Example
    /// ```
    /// use core::cell::Cell;
    /// use spirant_controls::encoder::RelativeEncoder;
    ///
    /// let count = Cell::new(0);
    /// let mut encoder = RelativeEncoder::new(&count, 4).unwrap();
    ///
    /// count.set(6);
    /// assert_eq!(encoder.steps(), 1);
    /// count.set(8);
    /// assert_eq!(encoder.steps(), 1);
    /// count.set(7);
    /// assert_eq!(encoder.steps(), 0);
    /// ```
    pub fn steps(&mut self) -> i32 {
        let position = self.counter.read();
        let steps = position.wrapping_sub(self.consumed) / self.pulses_per_step;
        if steps != 0 {
            self.consumed = self
                .consumed
                .wrapping_add(steps.wrapping_mul(self.pulses_per_step));
        }
        steps
    }
}
