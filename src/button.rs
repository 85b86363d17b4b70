//! A debounced push button on a digital input pin.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

use crate::config::ButtonConfig;
use crate::debounce::{ButtonState, Debouncer};

/// A momentary push button: an [`InputPin`] plus its [`Debouncer`].
///
/// The pin must already be configured (pull-up/pull-down) by the HAL; this
/// type only reads it.
pub struct Button<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P> Button<P>
where
    P: InputPin,
{
    /// Create a button with the polarity and debounce window from `config`.
    pub fn new(pin: P, config: &ButtonConfig) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(config.polarity, config.debounce_window()),
        }
    }

    /// Read the pin and return the debounced state for this poll.
    ///
    /// A failed pin read is not an error for the caller: the sample is
    /// skipped and the current steady level is reported, so an edge can
    /// only be delayed, never invented.
    pub fn update(&mut self, now: Instant) -> ButtonState {
        match self.pin.is_high() {
            Ok(level) => self.debouncer.sample(level, now),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Button pin read failed; keeping steady state");
                self.debouncer.steady()
            }
        }
    }

    /// Time since the last accepted press or release.
    pub fn stable_duration(&self, now: Instant) -> Duration {
        self.debouncer.stable_duration(now)
    }

    /// Swap the pressed level of this one button.
    pub fn invert(&mut self) {
        self.debouncer.invert();
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}
