//! Press gestures built on top of [`ButtonState`].
//!
//! Two flavours:
//!
//! - **Momentary** — [`PressEvent`]: one `Begin` on the press edge, one `End`
//!   on the release edge. Used by on/off controls.
//! - **Increment** — [`LongPress`] / [`IncrementButton`]: a click on the press
//!   edge, then, while held past the long-press delay, an auto-repeat at a
//!   fixed interval.
//!
//! ```text
//! held:     |<------------------------ pressed ------------------------>|
//! t (ms):   0                 450          800          1150
//! trigger:  Click             LongPress    Repeat       Repeat
//! ```
//!
//! Repeats are scheduled from the previous *scheduled* time, not from the
//! poll that noticed them, so a late poll does not push later repeats back.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

use crate::button::Button;
use crate::config::ButtonConfig;
use crate::debounce::ButtonState;
use crate::error::ConfigError;

/// Start or end of a momentary press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressEvent {
    Begin,
    End,
}

impl PressEvent {
    /// `Begin` on the press edge, `End` on the release edge, otherwise `None`.
    pub fn from_state(state: ButtonState) -> Option<Self> {
        match state {
            ButtonState::Falling => Some(PressEvent::Begin),
            ButtonState::Rising => Some(PressEvent::End),
            ButtonState::Pressed | ButtonState::Released => None,
        }
    }
}

/// One discrete action produced by an increment-style button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// The button was just pressed.
    Click,
    /// The button has been held for the long-press delay.
    LongPress,
    /// Another repeat interval has elapsed while held.
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum HoldState {
    Initial,
    LongPress { last_repeat: Instant },
}

/// Long-press record: turns a held button into a stream of [`Trigger`]s.
#[derive(Debug, Clone)]
pub struct LongPress {
    delay: Duration,
    repeat: Duration,
    state: HoldState,
}

impl LongPress {
    /// # Errors
    /// [`ConfigError::InvalidRepeatDelay`] if the repeat interval is zero.
    pub fn new(config: &ButtonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            delay: config.long_press_delay(),
            repeat: config.long_press_repeat(),
            state: HoldState::Initial,
        })
    }

    /// Advance the gesture by one poll.
    ///
    /// # Arguments
    /// * `state` — Debounced state for this poll
    /// * `stable_for` — Time since the last accepted press/release
    /// * `now` — Time of this poll
    pub fn poll(&mut self, state: ButtonState, stable_for: Duration, now: Instant) -> Option<Trigger> {
        match state {
            ButtonState::Released => None,
            ButtonState::Rising => {
                self.state = HoldState::Initial;
                None
            }
            ButtonState::Falling => Some(Trigger::Click),
            ButtonState::Pressed => match self.state {
                HoldState::LongPress { last_repeat } => {
                    if now.saturating_duration_since(last_repeat) >= self.repeat {
                        self.state = HoldState::LongPress {
                            last_repeat: last_repeat + self.repeat,
                        };
                        Some(Trigger::Repeat)
                    } else {
                        None
                    }
                }
                HoldState::Initial if stable_for >= self.delay => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Long press after {} ms", stable_for.as_millis());
                    self.state = HoldState::LongPress { last_repeat: now };
                    Some(Trigger::LongPress)
                }
                HoldState::Initial => None,
            },
        }
    }

    /// Returns `true` once the hold has passed the long-press delay.
    pub fn is_long_press(&self) -> bool {
        matches!(self.state, HoldState::LongPress { .. })
    }
}

/// A debounced button with click + long-press auto-repeat.
///
/// # Example
///
/// ```
/// # use core::{cell::Cell, convert::Infallible};
/// # use embedded_hal::digital::{ErrorType, InputPin};
/// # struct Pin<'a>(&'a Cell<bool>);
/// # impl ErrorType for Pin<'_> { type Error = Infallible; }
/// # impl InputPin for Pin<'_> {
/// #     fn is_high(&mut self) -> Result<bool, Infallible> { Ok(self.0.get()) }
/// #     fn is_low(&mut self) -> Result<bool, Infallible> { Ok(!self.0.get()) }
/// # }
/// use embassy_time::Instant;
/// use spirant_controls::{ButtonConfig, IncrementButton, Trigger};
///
/// let level = Cell::new(true);
/// let mut button = IncrementButton::new(Pin(&level), &ButtonConfig::default()).unwrap();
///
/// button.update(Instant::from_millis(0));
/// level.set(false); // press (active-low)
/// button.update(Instant::from_millis(1));
/// assert_eq!(button.update(Instant::from_millis(26)), Some(Trigger::Click));
/// assert_eq!(button.update(Instant::from_millis(476)), Some(Trigger::LongPress));
/// ```
pub struct IncrementButton<P> {
    button: Button<P>,
    long_press: LongPress,
}

impl<P> IncrementButton<P>
where
    P: InputPin,
{
    pub fn new(pin: P, config: &ButtonConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            long_press: LongPress::new(config)?,
            button: Button::new(pin, config),
        })
    }

    /// Poll the pin and return a trigger if one fires on this poll.
    pub fn update(&mut self, now: Instant) -> Option<Trigger> {
        let state = self.button.update(now);
        let stable_for = self.button.stable_duration(now);
        self.long_press.poll(state, stable_for, now)
    }

    /// Swap the pressed level of this button.
    pub fn invert(&mut self) {
        self.button.invert();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn long_press() -> LongPress {
        LongPress::new(&ButtonConfig::default()).unwrap()
    }

    /// Drive a press accepted at t = 0 and held until `release_ms`, polling
    /// every `step_ms`. Returns `(time, trigger)` pairs.
    fn hold(lp: &mut LongPress, release_ms: u64, step_ms: u64) -> [(u64, Option<Trigger>); 64] {
        let mut out = [(0, None); 64];
        let mut count = 0;
        let mut t = 0;
        while t <= release_ms {
            let state = if t == 0 {
                ButtonState::Falling
            } else {
                ButtonState::Pressed
            };
            if let Some(trigger) = lp.poll(state, Duration::from_millis(t), at(t)) {
                out[count] = (t, Some(trigger));
                count += 1;
            }
            t += step_ms;
        }
        out
    }

    // ── Momentary ────────────────────────────────────────────────────

    #[test]
    fn press_event_only_on_edges() {
        assert_eq!(PressEvent::from_state(ButtonState::Falling), Some(PressEvent::Begin));
        assert_eq!(PressEvent::from_state(ButtonState::Rising), Some(PressEvent::End));
        assert_eq!(PressEvent::from_state(ButtonState::Pressed), None);
        assert_eq!(PressEvent::from_state(ButtonState::Released), None);
    }

    // ── Long press timing ────────────────────────────────────────────

    #[test]
    fn held_for_1200ms_triggers_at_0_450_800_1150() {
        let mut lp = long_press();
        let triggers = hold(&mut lp, 1200, 1);

        assert_eq!(triggers[0], (0, Some(Trigger::Click)));
        assert_eq!(triggers[1], (450, Some(Trigger::LongPress)));
        assert_eq!(triggers[2], (800, Some(Trigger::Repeat)));
        assert_eq!(triggers[3], (1150, Some(Trigger::Repeat)));
        assert_eq!(triggers[4], (0, None));
    }

    #[test]
    fn late_polls_do_not_drift_the_repeat_schedule() {
        let mut lp = long_press();
        assert_eq!(lp.poll(ButtonState::Falling, Duration::from_millis(0), at(0)), Some(Trigger::Click));
        assert_eq!(
            lp.poll(ButtonState::Pressed, Duration::from_millis(450), at(450)),
            Some(Trigger::LongPress)
        );

        // First repeat was due at 800 but noticed at 820.
        assert_eq!(
            lp.poll(ButtonState::Pressed, Duration::from_millis(820), at(820)),
            Some(Trigger::Repeat)
        );
        // The next one is still due at 1150, not 1170.
        assert_eq!(lp.poll(ButtonState::Pressed, Duration::from_millis(1149), at(1149)), None);
        assert_eq!(
            lp.poll(ButtonState::Pressed, Duration::from_millis(1150), at(1150)),
            Some(Trigger::Repeat)
        );
    }

    #[test]
    fn a_long_stall_catches_up_one_repeat_per_poll() {
        let mut lp = long_press();
        lp.poll(ButtonState::Falling, Duration::from_millis(0), at(0));
        lp.poll(ButtonState::Pressed, Duration::from_millis(450), at(450));

        // Stalled until 1200: repeats due at 800 and 1150 are both owed.
        assert_eq!(
            lp.poll(ButtonState::Pressed, Duration::from_millis(1200), at(1200)),
            Some(Trigger::Repeat)
        );
        assert_eq!(
            lp.poll(ButtonState::Pressed, Duration::from_millis(1201), at(1201)),
            Some(Trigger::Repeat)
        );
        assert_eq!(lp.poll(ButtonState::Pressed, Duration::from_millis(1202), at(1202)), None);
    }

    #[test]
    fn release_resets_to_initial() {
        let mut lp = long_press();
        hold(&mut lp, 500, 10);
        assert!(lp.is_long_press());

        assert_eq!(lp.poll(ButtonState::Rising, Duration::from_millis(0), at(510)), None);
        assert!(!lp.is_long_press());
        assert_eq!(lp.poll(ButtonState::Released, Duration::from_millis(100), at(610)), None);

        // Next press starts a fresh delay.
        assert_eq!(lp.poll(ButtonState::Falling, Duration::from_millis(0), at(700)), Some(Trigger::Click));
        assert_eq!(lp.poll(ButtonState::Pressed, Duration::from_millis(100), at(800)), None);
    }

    #[test]
    fn short_press_only_clicks() {
        let mut lp = long_press();
        let triggers = hold(&mut lp, 449, 1);
        assert_eq!(triggers[0], (0, Some(Trigger::Click)));
        assert_eq!(triggers[1], (0, None));
    }

    #[test]
    fn zero_repeat_interval_is_rejected() {
        let config = ButtonConfig {
            long_press_repeat_ms: 0,
            ..ButtonConfig::default()
        };
        assert!(matches!(LongPress::new(&config), Err(ConfigError::InvalidRepeatDelay)));
    }

    // ── IncrementButton ──────────────────────────────────────────────

    #[test]
    fn increment_button_reads_pin_through_debouncer() {
        use crate::button::tests::CellPin;
        use core::cell::Cell;

        let level = Cell::new(true);
        let mut button = IncrementButton::new(CellPin(&level), &ButtonConfig::default()).unwrap();

        assert_eq!(button.update(at(0)), None);
        level.set(false);
        assert_eq!(button.update(at(10)), None);
        assert_eq!(button.update(at(35)), Some(Trigger::Click));
        assert_eq!(button.update(at(484)), None);
        assert_eq!(button.update(at(485)), Some(Trigger::LongPress));
        assert_eq!(button.update(at(835)), Some(Trigger::Repeat));

        level.set(true);
        assert_eq!(button.update(at(840)), None);
        assert_eq!(button.update(at(865)), None); // release edge
        assert_eq!(button.update(at(2000)), None);
    }
}
