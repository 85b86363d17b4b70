//! MIDI sender boundary: logical addresses, emitted Control Change messages,
//! and a bounded queue the transport drains.
//!
//! The crate never serialises onto a wire itself. Controls return a
//! [`ControlChange`] from their `update()` and the caller hands it to
//! whatever transport it owns (USB, DIN serial, BLE). [`OutputQueue`] is a
//! convenience for firmware that polls controls in one place and flushes the
//! transport in another.

use heapless::Deque;

use crate::error::{ConfigError, QueueFull};

/// Highest controller number that is not a channel mode message.
pub const MAX_CONTROLLER: u8 = 119;

/// Number of MIDI channels (channels are numbered `1..=16`).
pub const CHANNEL_COUNT: u8 = 16;

/// Status nibble of a Control Change message.
const CONTROL_CHANGE_STATUS: u8 = 0xB0;

/// A (controller number, channel) pair identifying a Control Change target.
///
/// Both fields are validated on construction, so every `MidiAddress` in the
/// system is sendable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiAddress {
    controller: u8,
    channel: u8,
}

impl MidiAddress {
    /// Create a validated address.
    ///
    /// # Arguments
    /// * `controller` — Controller number, `[0, 119]`
    /// * `channel` — MIDI channel, `[1, 16]`
    ///
    /// # Errors
    /// * [`ConfigError::InvalidControllerNumber`] if `controller > 119`
    /// * [`ConfigError::InvalidChannel`] if `channel` is 0 or above 16
    ///
    /// # Example
    /// ```
    /// use spirant_controls::MidiAddress;
    ///
    /// let volume = MidiAddress::new(7, 1).unwrap();
    /// assert_eq!(volume.controller(), 7);
    /// assert!(MidiAddress::new(120, 1).is_err());
    /// assert!(MidiAddress::new(7, 0).is_err());
    /// ```
    pub fn new(controller: u8, channel: u8) -> Result<Self, ConfigError> {
        if controller > MAX_CONTROLLER {
            return Err(ConfigError::InvalidControllerNumber);
        }
        if channel == 0 || channel > CHANNEL_COUNT {
            return Err(ConfigError::InvalidChannel);
        }
        Ok(Self {
            controller,
            channel,
        })
    }

    /// Controller number, `[0, 119]`.
    pub fn controller(&self) -> u8 {
        self.controller
    }

    /// MIDI channel, `[1, 16]`.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Offset this address by `offset` controller numbers on the same channel.
    pub(crate) fn offset_by(&self, offset: usize) -> Result<Self, ConfigError> {
        let controller = usize::from(self.controller)
            .checked_add(offset)
            .and_then(|c| u8::try_from(c).ok())
            .ok_or(ConfigError::InvalidControllerNumber)?;
        Self::new(controller, self.channel)
    }
}

/// What a [`ControlChange`] means to the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    /// A momentary control was pressed.
    On,
    /// A momentary control was released.
    Off,
    /// A relative (signed delta) value; see [`crate::relative`].
    Relative,
}

/// One Control Change emission: where it goes, the 7-bit value, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlChange {
    pub address: MidiAddress,
    /// Data byte, always `< 128`.
    pub value: u8,
    pub intent: Intent,
}

impl ControlChange {
    /// Frame this message as the three bytes of a MIDI 1.0 Control Change.
    ///
    /// # Example
    /// ```
    /// use spirant_controls::{ControlChange, Intent, MidiAddress};
    ///
    /// let cc = ControlChange {
    ///     address: MidiAddress::new(16, 2).unwrap(),
    ///     value: 127,
    ///     intent: Intent::On,
    /// };
    /// assert_eq!(cc.to_midi_bytes(), [0xB1, 16, 127]);
    /// ```
    pub fn to_midi_bytes(&self) -> [u8; 3] {
        // Channel 1..=16 is validated, so the nibble never borrows.
        let channel_nibble = self.address.channel.saturating_sub(1) & 0x0F;
        [
            CONTROL_CHANGE_STATUS | channel_nibble,
            self.address.controller & 0x7F,
            self.value & 0x7F,
        ]
    }
}

/// Bounded FIFO of pending [`ControlChange`] messages.
///
/// Backed by a fixed-capacity [`heapless::Deque`]; no allocation.
pub struct OutputQueue<const N: usize> {
    pending: Deque<ControlChange, N>,
}

impl<const N: usize> Default for OutputQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> OutputQueue<N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Append a message.
    ///
    /// # Errors
    /// Returns the message wrapped in [`QueueFull`] when the queue is at
    /// capacity. Nothing already queued is dropped.
    pub fn push(&mut self, message: ControlChange) -> Result<(), QueueFull<ControlChange>> {
        self.pending.push_back(message).map_err(|rejected| {
            #[cfg(feature = "defmt")]
            defmt::warn!("MIDI output queue full, rejected {}", rejected);
            QueueFull(rejected)
        })
    }

    /// Remove and return the oldest pending message.
    pub fn pop(&mut self) -> Option<ControlChange> {
        self.pending.pop_front()
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc(controller: u8, value: u8) -> ControlChange {
        ControlChange {
            address: MidiAddress::new(controller, 1).unwrap(),
            value,
            intent: Intent::Relative,
        }
    }

    // ── MidiAddress ──────────────────────────────────────────────────

    #[test]
    fn address_accepts_full_valid_range() {
        assert!(MidiAddress::new(0, 1).is_ok());
        assert!(MidiAddress::new(119, 16).is_ok());
    }

    #[test]
    fn address_rejects_channel_mode_controllers() {
        assert_eq!(MidiAddress::new(120, 1), Err(ConfigError::InvalidControllerNumber));
        assert_eq!(MidiAddress::new(127, 1), Err(ConfigError::InvalidControllerNumber));
    }

    #[test]
    fn address_rejects_out_of_range_channels() {
        assert_eq!(MidiAddress::new(1, 0), Err(ConfigError::InvalidChannel));
        assert_eq!(MidiAddress::new(1, 17), Err(ConfigError::InvalidChannel));
    }

    #[test]
    fn offset_by_stays_on_channel() {
        let base = MidiAddress::new(16, 3).unwrap();
        let shifted = base.offset_by(8).unwrap();
        assert_eq!(shifted.controller(), 24);
        assert_eq!(shifted.channel(), 3);
    }

    #[test]
    fn offset_by_rejects_overflow_past_119() {
        let base = MidiAddress::new(112, 1).unwrap();
        assert_eq!(base.offset_by(8), Err(ConfigError::InvalidControllerNumber));
        assert_eq!(base.offset_by(usize::MAX), Err(ConfigError::InvalidControllerNumber));
    }

    // ── Byte framing ─────────────────────────────────────────────────

    #[test]
    fn framing_uses_zero_based_channel_nibble() {
        let first = ControlChange {
            address: MidiAddress::new(7, 1).unwrap(),
            value: 0,
            intent: Intent::Off,
        };
        let last = ControlChange {
            address: MidiAddress::new(7, 16).unwrap(),
            value: 65,
            intent: Intent::Relative,
        };
        assert_eq!(first.to_midi_bytes(), [0xB0, 7, 0]);
        assert_eq!(last.to_midi_bytes(), [0xBF, 7, 65]);
    }

    // ── OutputQueue ──────────────────────────────────────────────────

    #[test]
    fn queue_is_fifo() {
        let mut queue: OutputQueue<4> = OutputQueue::new();
        queue.push(cc(1, 1)).unwrap();
        queue.push(cc(2, 2)).unwrap();

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(cc(1, 1)));
        assert_eq!(queue.pop(), Some(cc(2, 2)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_returns_rejected_message() {
        let mut queue: OutputQueue<1> = OutputQueue::new();
        queue.push(cc(1, 1)).unwrap();

        assert_eq!(queue.push(cc(2, 2)), Err(QueueFull(cc(2, 2))));
        // The queued message survives.
        assert_eq!(queue.pop(), Some(cc(1, 1)));
    }
}
