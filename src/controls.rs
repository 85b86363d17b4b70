//! Bankable MIDI Control Change outputs.
//!
//! Each control combines an input (button or encoder), a [`BankAddress`] and
//! a value policy, and is advanced by an external polling loop through the
//! [`MidiOutput`] trait:
//!
//! | Control | Input | Emits | Locks the address |
//! |---|---|---|---|
//! | [`CcButton`] | debounced button | On on press, Off on release | press → release |
//! | [`CcIncrementButton`] | button with auto-repeat | relative step per trigger | never |
//! | [`CcRotaryEncoder`] | pulse counter | relative steps | never |
//!
//! Only on/off pairs need the lock: a relative message is self-contained,
//! so encoders and increment buttons re-resolve every poll and follow a bank
//! change immediately.

use embassy_time::Instant;
use embedded_hal::digital::InputPin;

use crate::bank::BankAddress;
use crate::button::Button;
use crate::config::{ButtonConfig, EncoderConfig};
use crate::encoder::{PulseCounter, RelativeEncoder};
use crate::error::{ConfigError, QueueFull};
use crate::gesture::{IncrementButton, PressEvent};
use crate::midi::{ControlChange, Intent, OutputQueue};
use crate::relative::{encode, RelativeCodec, RelativeMode};

/// Value sent when a momentary button is pressed.
pub const DEFAULT_ON_VALUE: u8 = 0x7F;

/// Value sent when a momentary button is released.
pub const DEFAULT_OFF_VALUE: u8 = 0x00;

/// A control that is advanced once per poll.
pub trait MidiOutput {
    /// Poll inputs at `now` and return the message to send, if any.
    fn update(&mut self, now: Instant) -> Option<ControlChange>;
}

/// Poll every output once and queue what they emit.
///
/// Stops at the first message that does not fit and returns it; outputs
/// after that one are not polled on this tick and pick up their input on
/// the next one.
///
/// A rejected message must be sent once the queue has room, not dropped.
/// A [`CcButton`] has already unlocked its address when it returns the Off
/// message, so losing it leaves the target stuck On.
pub fn update_all<const N: usize>(
    outputs: &mut [&mut dyn MidiOutput],
    now: Instant,
    queue: &mut OutputQueue<N>,
) -> Result<(), QueueFull<ControlChange>> {
    for output in outputs.iter_mut() {
        if let Some(message) = output.update(now) {
            queue.push(message)?;
        }
    }
    Ok(())
}

// ── Momentary button ─────────────────────────────────────────────────────

/// A momentary push button sending an On value when pressed and an Off
/// value when released, both to the address that was active at the press.
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
/// use spirant_controls::{Bank, BankAddress, ButtonConfig, CcButton, MidiAddress, MidiOutput};
///
/// let bank: Bank<2> = Bank::new();
/// let address = BankAddress::new(
///     &bank,
///     [MidiAddress::new(20, 1).unwrap(), MidiAddress::new(21, 1).unwrap()],
/// );
/// let level = Cell::new(true);
/// let mut mute = CcButton::new(address, Pin(&level), &ButtonConfig::default());
///
/// mute.update(Instant::from_millis(0));
/// level.set(false);
/// mute.update(Instant::from_millis(1));
/// let on = mute.update(Instant::from_millis(26)).unwrap();
/// assert_eq!(on.to_midi_bytes(), [0xB0, 20, 127]);
///
/// bank.select(1).unwrap(); // bank change mid-press
/// level.set(true);
/// mute.update(Instant::from_millis(30));
/// let off = mute.update(Instant::from_millis(55)).unwrap();
/// assert_eq!(off.to_midi_bytes(), [0xB0, 20, 0]);
/// ```
pub struct CcButton<'a, P, const N: usize> {
    address: BankAddress<'a, N>,
    button: Button<P>,
    on_value: u8,
    off_value: u8,
}

impl<'a, P, const N: usize> CcButton<'a, P, N>
where
    P: InputPin,
{
    pub fn new(address: BankAddress<'a, N>, pin: P, config: &ButtonConfig) -> Self {
        Self {
            address,
            button: Button::new(pin, config),
            on_value: DEFAULT_ON_VALUE,
            off_value: DEFAULT_OFF_VALUE,
        }
    }

    /// Replace the default 127/0 values. Only the low 7 bits are used.
    pub fn with_values(mut self, on_value: u8, off_value: u8) -> Self {
        self.on_value = on_value & 0x7F;
        self.off_value = off_value & 0x7F;
        self
    }

    pub fn invert(&mut self) {
        self.button.invert();
    }

    /// The lockable address, e.g. to check whether a gesture is in progress.
    pub fn address(&self) -> &BankAddress<'a, N> {
        &self.address
    }
}

impl<P, const N: usize> MidiOutput for CcButton<'_, P, N>
where
    P: InputPin,
{
    fn update(&mut self, now: Instant) -> Option<ControlChange> {
        match PressEvent::from_state(self.button.update(now))? {
            PressEvent::Begin => {
                // Freeze before resolving so On and Off share one address.
                self.address.lock();
                Some(ControlChange {
                    address: self.address.resolve(),
                    value: self.on_value,
                    intent: Intent::On,
                })
            }
            PressEvent::End => {
                let message = ControlChange {
                    address: self.address.resolve(),
                    value: self.off_value,
                    intent: Intent::Off,
                };
                self.address.unlock();
                Some(message)
            }
        }
    }
}

// ── Increment button ─────────────────────────────────────────────────────

/// A button that nudges a parameter by a fixed relative step on click and
/// keeps nudging while held.
pub struct CcIncrementButton<'a, P, const N: usize> {
    address: BankAddress<'a, N>,
    button: IncrementButton<P>,
    value: u8,
}

impl<'a, P, const N: usize> CcIncrementButton<'a, P, N>
where
    P: InputPin,
{
    /// # Arguments
    /// * `step` — Signed movement per trigger, e.g. `1` or `-1`
    /// * `mode` — Relative encoding understood by the receiver
    ///
    /// # Errors
    /// [`ConfigError::InvalidSpeedMultiplier`] if `step` is zero, or any
    /// error from [`ButtonConfig::validate`].
    pub fn new(
        address: BankAddress<'a, N>,
        pin: P,
        config: &ButtonConfig,
        step: i8,
        mode: RelativeMode,
    ) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::InvalidSpeedMultiplier);
        }
        Ok(Self {
            address,
            button: IncrementButton::new(pin, config)?,
            value: encode(i32::from(step), mode),
        })
    }
}

impl<P, const N: usize> MidiOutput for CcIncrementButton<'_, P, N>
where
    P: InputPin,
{
    fn update(&mut self, now: Instant) -> Option<ControlChange> {
        let _trigger = self.button.update(now)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("Increment trigger: {}", _trigger);
        Some(ControlChange {
            address: self.address.resolve(),
            value: self.value,
            intent: Intent::Relative,
        })
    }
}

// ── Rotary encoder ───────────────────────────────────────────────────────

/// A rotary encoder sending relative Control Change messages.
pub struct CcRotaryEncoder<'a, C, const N: usize> {
    address: BankAddress<'a, N>,
    encoder: RelativeEncoder<C>,
    codec: RelativeCodec,
}

impl<'a, C, const N: usize> CcRotaryEncoder<'a, C, N>
where
    C: PulseCounter,
{
    /// Create an encoder output; the counter's current value is the baseline.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidPulsesPerStep`] if `pulses_per_step == 0`
    /// * [`ConfigError::InvalidSpeedMultiplier`] if `speed_multiplier == 0`
    pub fn new(
        address: BankAddress<'a, N>,
        counter: C,
        config: &EncoderConfig,
    ) -> Result<Self, ConfigError> {
        let codec = RelativeCodec::new(config)?;
        Ok(Self {
            address,
            encoder: RelativeEncoder::new(counter, codec.pulses_per_step())?,
            codec,
        })
    }
}

impl<C, const N: usize> MidiOutput for CcRotaryEncoder<'_, C, N>
where
    C: PulseCounter,
{
    fn update(&mut self, _now: Instant) -> Option<ControlChange> {
        let steps = self.encoder.steps();
        let value = self.codec.encode_steps(steps)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("Encoder: steps={}, value={}", steps, value);
        Some(ControlChange {
            address: self.address.resolve(),
            value,
            intent: Intent::Relative,
        })
    }
}
