//! spirant-controls-firmware
//!
//! Control surface firmware for the Raspberry Pi Pico 2. Wires the
//! `spirant-controls` outputs into a 1 kHz polling loop:
//!
//! 1. Two bank buttons step the shared [`Bank`] up and down (with
//!    long-press auto-repeat).
//! 2. Two mute/solo buttons send On/Off Control Changes. A press locks the
//!    address, so changing bank while holding one still releases the
//!    original target.
//! 3. A rotary encoder sends relative CCs to the live bank's controller.
//! 4. Every message is queued and drained once per tick. The transport is
//!    left to the integrator; this build logs the bytes over RTT.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use spirant_controls::{
    update_all, Bank, BankAddress, ButtonConfig, CcButton, CcRotaryEncoder, EncoderConfig,
    IncrementButton, MidiAddress, OutputQueue, PulseCounter, QueueFull, RelativeMode, Trigger,
};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Number of banks selectable with the bank buttons.
const N_BANKS: usize = 4;

/// Channel-strip width: each bank moves every control by this many controllers.
const CONTROLLERS_PER_BANK: usize = 4;

/// Poll interval for all controls.
const POLL_PERIOD_MS: u64 = 1;

/// Pending messages between two transport flushes.
const QUEUE_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// Quadrature decoding
// ---------------------------------------------------------------------------

/// Pulse count delta indexed by `(previous_ab << 2) | current_ab`.
/// Invalid (double) transitions count as zero.
const QUADRATURE_TABLE: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Software quadrature decoder on two GPIO inputs.
///
/// Sampled on every `read()`, i.e. once per poll. Fine for hand-turned
/// detented encoders at 1 kHz; use a PIO program for jog wheels.
struct Quadrature<'d> {
    a: Input<'d>,
    b: Input<'d>,
    previous: u8,
    count: i32,
}

impl<'d> Quadrature<'d> {
    fn new(a: Input<'d>, b: Input<'d>) -> Self {
        let previous = Self::sample(&a, &b);
        Self {
            a,
            b,
            previous,
            count: 0,
        }
    }

    fn sample(a: &Input<'d>, b: &Input<'d>) -> u8 {
        let a = u8::from(a.is_high());
        let b = u8::from(b.is_high());
        (a << 1) | b
    }
}

impl PulseCounter for Quadrature<'_> {
    fn read(&mut self) -> i32 {
        let current = Self::sample(&self.a, &self.b);
        let index = usize::from((self.previous << 2) | current);
        self.count = self
            .count
            .wrapping_add(i32::from(QUADRATURE_TABLE[index & 0x0F]));
        self.previous = current;
        self.count
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("spirant-controls-firmware starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // BANK_UP   → GP2   active-low, pull-up enabled
    // BANK_DOWN → GP3   active-low, pull-up enabled
    // MUTE      → GP4   active-low, pull-up enabled
    // SOLO      → GP5   active-low, pull-up enabled
    // ENC_A     → GP6   pull-up enabled
    // ENC_B     → GP7   pull-up enabled
    // ———————————————————————————————————————————————————————————————————————

    let button_config = ButtonConfig::default();
    let encoder_config = EncoderConfig {
        mode: RelativeMode::MACKIE_CONTROL_RELATIVE,
        ..EncoderConfig::default()
    };

    let bank: Bank<N_BANKS> = Bank::new();

    let mut bank_up = unwrap!(IncrementButton::new(Input::new(p.PIN_2, Pull::Up), &button_config));
    let mut bank_down = unwrap!(IncrementButton::new(Input::new(p.PIN_3, Pull::Up), &button_config));

    // Controller numbers per bank: mute 16/20/24/28, solo 17/21/25/29,
    // pan 18/22/26/30, all on channel 1.
    let strip = |offset: u8| {
        let base = unwrap!(MidiAddress::new(16 + offset, 1));
        unwrap!(BankAddress::with_offset(&bank, base, CONTROLLERS_PER_BANK))
    };

    let mut mute = CcButton::new(strip(0), Input::new(p.PIN_4, Pull::Up), &button_config);
    let mut solo = CcButton::new(strip(1), Input::new(p.PIN_5, Pull::Up), &button_config);
    let mut pan = unwrap!(CcRotaryEncoder::new(
        strip(2),
        Quadrature::new(Input::new(p.PIN_6, Pull::Up), Input::new(p.PIN_7, Pull::Up)),
        &encoder_config,
    ));

    let mut queue: OutputQueue<QUEUE_DEPTH> = OutputQueue::new();
    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));

    info!("Polling controls every {} ms", POLL_PERIOD_MS);

    loop {
        ticker.next().await;
        let now = Instant::now();

        // Bank buttons first, so a bank change and a control movement in
        // the same tick use the new bank (unless the control is locked).
        if let Some(trigger) = bank_up.update(now) {
            bank.select_next();
            log_bank_change(trigger, bank.selection());
        }
        if let Some(trigger) = bank_down.update(now) {
            bank.select_previous();
            log_bank_change(trigger, bank.selection());
        }

        if let Err(QueueFull(rejected)) =
            update_all(&mut [&mut mute, &mut solo, &mut pan], now, &mut queue)
        {
            // An Off must not be lost: its address is already unlocked.
            warn!("Output queue full; flushing before {}", rejected);
            flush(&mut queue);
            unwrap!(queue.push(rejected));
        }

        flush(&mut queue);
    }
}

fn flush(queue: &mut OutputQueue<QUEUE_DEPTH>) {
    while let Some(message) = queue.pop() {
        let bytes = message.to_midi_bytes();
        debug!(
            "CC {:02x} {:02x} {:02x} ({})",
            bytes[0], bytes[1], bytes[2], message.intent
        );
    }
}

fn log_bank_change(trigger: Trigger, selection: usize) {
    info!("Bank {} ({})", selection + 1, trigger);
}
