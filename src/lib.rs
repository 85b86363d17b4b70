//! Bankable MIDI Control Change outputs for control-surface firmware.
//!
//! This crate turns raw button levels and encoder pulse counts into
//! Control Change messages, with banking: the same physical control can
//! target a different controller number depending on the selected bank.
//!
//! # Architecture
//!
//! Everything is advanced by one external polling loop; there are no tasks,
//! timers or queues inside the controls.
//!
//! ```text
//!  InputPin ──► Debouncer ──► ButtonState ──► LongPress ──► Trigger
//!                                  │                           │
//!                                  ▼                           ▼
//!                             CcButton                CcIncrementButton
//!                        (lock → On … Off → unlock)    (relative step)
//!                                  │                           │
//!  PulseCounter ──► RelativeEncoder ──► RelativeCodec ──► CcRotaryEncoder
//!                                  │                           │
//!                                  └─────── BankAddress ◄── &Bank
//!                                               │
//!                                               ▼
//!                                         ControlChange ──► transport
//! ```
//!
//! - [`debounce`] / [`button`] — debounced edge detection on an
//!   `embedded-hal` [`InputPin`](embedded_hal::digital::InputPin).
//! - [`gesture`] — momentary press events and long-press auto-repeat.
//! - [`bank`] — the shared bank index and the per-control lockable address.
//! - [`encoder`] / [`relative`] — pulse counts to steps, steps to 7-bit
//!   relative values.
//! - [`controls`] — the three bankable outputs and the [`MidiOutput`] trait.
//! - [`midi`] — addresses, emitted messages, byte framing, output queue.
//!
//! # Quick start
//!
//! ```ignore
//! let bank: Bank<4> = Bank::new();
//! let mut mute = CcButton::new(
//!     BankAddress::with_offset(&bank, MidiAddress::new(16, 1)?, 1)?,
//!     mute_pin,
//!     &ButtonConfig::default(),
//! );
//! let mut pan = CcRotaryEncoder::new(
//!     BankAddress::with_offset(&bank, MidiAddress::new(32, 1)?, 1)?,
//!     &encoder_count,
//!     &EncoderConfig::default(),
//! )?;
//!
//! loop {
//!     ticker.next().await;
//!     update_all(&mut [&mut mute, &mut pan], Instant::now(), &mut queue)?;
//!     while let Some(message) = queue.pop() {
//!         transport.write(&message.to_midi_bytes()).await?;
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — [`defmt::Format`] on all public data types and debug
//!   logging of locks, bank changes and long presses.

#![no_std]

pub mod bank;
pub mod button;
pub mod config;
pub mod controls;
pub mod debounce;
pub mod encoder;
pub mod error;
pub mod gesture;
pub mod midi;
pub mod relative;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use bank::{Bank, BankAddress};
pub use button::Button;
pub use config::{ButtonConfig, EncoderConfig, LONG_PRESS_DELAY_MS, LONG_PRESS_REPEAT_MS};
pub use controls::{update_all, CcButton, CcIncrementButton, CcRotaryEncoder, MidiOutput};
pub use debounce::{ButtonState, Debouncer, Polarity, DEFAULT_DEBOUNCE_MS};
pub use encoder::{PulseCounter, RelativeEncoder};
pub use error::{ConfigError, QueueFull};
pub use gesture::{IncrementButton, LongPress, PressEvent, Trigger};
pub use midi::{ControlChange, Intent, MidiAddress, OutputQueue};
pub use relative::{RelativeCodec, RelativeMode, JOG, NORMAL_ENCODER};
