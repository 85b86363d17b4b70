//! Time-based switch debouncing with edge detection.
//!
//! [`Debouncer`] turns a noisy sampled level into a [`ButtonState`]: a
//! steady level on most polls, and a one-poll edge when a new level has
//! been held for the full debounce window.
//!
//! # Edge naming
//!
//! Edges are named after the pin level of an active-low button (pull-up,
//! switch to ground), which is how control surfaces are normally wired:
//!
//! ```text
//! pin:    ‾‾‾‾‾‾‾\_______________/‾‾‾‾‾‾‾
//! state:  Released  Falling  Pressed  Rising  Released
//!                   (press)           (release)
//! ```
//!
//! The names are kept for active-high buttons too: [`ButtonState::Falling`]
//! always means "just pressed".

use embassy_time::{Duration, Instant};

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 25;

/// Debounced button state for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Steady: pressed.
    Pressed,
    /// Steady: not pressed.
    Released,
    /// Edge: pressed on this poll.
    Falling,
    /// Edge: released on this poll.
    Rising,
}

/// How the raw pin level maps to "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pull-up resistor, switch to ground: low = pressed.
    #[default]
    ActiveLow,
    /// Pull-down resistor, switch to supply: high = pressed.
    ActiveHigh,
}

impl Polarity {
    /// Convert a raw pin level (`true` = high) into "is pressed".
    pub fn is_pressed(self, level: bool) -> bool {
        match self {
            Polarity::ActiveLow => !level,
            Polarity::ActiveHigh => level,
        }
    }

    /// The opposite polarity.
    pub fn inverted(self) -> Self {
        match self {
            Polarity::ActiveLow => Polarity::ActiveHigh,
            Polarity::ActiveHigh => Polarity::ActiveLow,
        }
    }
}

/// Debounce record for one switch.
///
/// A change of the raw level is accepted only once the raw level has stayed
/// put for at least `window`. Bounces shorter than the window restart the
/// wait and are never reported.
#[derive(Debug, Clone)]
pub struct Debouncer {
    polarity: Polarity,
    window: Duration,
    /// Last sampled level, normalised to "pressed".
    raw: bool,
    /// When `raw` last changed.
    raw_since: Instant,
    /// Last accepted level, normalised to "pressed".
    stable: bool,
    /// When `stable` last changed.
    stable_since: Instant,
}

impl Debouncer {
    /// Create a debouncer that starts released.
    ///
    /// # Arguments
    /// * `polarity` — How raw pin levels map to pressed/released
    /// * `window` — How long a new level must persist before it is accepted
    pub fn new(polarity: Polarity, window: Duration) -> Self {
        let origin = Instant::from_ticks(0);
        Self {
            polarity,
            window,
            raw: false,
            raw_since: origin,
            stable: false,
            stable_since: origin,
        }
    }

    /// Feed one raw sample taken at `now` and classify it.
    ///
    /// # Example
    /// ```
    /// use embassy_time::{Duration, Instant};
    /// use spirant_controls::{ButtonState, Debouncer, Polarity};
    ///
    /// let mut debouncer = Debouncer::new(Polarity::ActiveLow, Duration::from_millis(10));
    /// let t = Instant::from_millis;
    ///
    /// assert_eq!(debouncer.sample(true, t(0)), ButtonState::Released);
    /// // Pin pulled low: pressed, but not yet stable.
    /// assert_eq!(debouncer.sample(false, t(1)), ButtonState::Released);
    /// assert_eq!(debouncer.sample(false, t(11)), ButtonState::Falling);
    /// assert_eq!(debouncer.sample(false, t(12)), ButtonState::Pressed);
    /// ```
    pub fn sample(&mut self, level: bool, now: Instant) -> ButtonState {
        let pressed = self.polarity.is_pressed(level);

        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now;
        }

        if self.raw != self.stable && now.saturating_duration_since(self.raw_since) >= self.window
        {
            self.stable = self.raw;
            self.stable_since = now;
            #[cfg(feature = "defmt")]
            defmt::trace!("Debounced edge: pressed={}", self.stable);
            return if self.stable {
                ButtonState::Falling
            } else {
                ButtonState::Rising
            };
        }

        self.steady()
    }

    /// The current steady level, without sampling.
    pub fn steady(&self) -> ButtonState {
        if self.stable {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }

    /// Time since the last accepted press or release.
    pub fn stable_duration(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stable_since)
    }

    /// Flip the polarity (e.g. for a button wired active-high on a board
    /// where the rest are active-low).
    pub fn invert(&mut self) {
        self.polarity = self.polarity.inverted();
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}
