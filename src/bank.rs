//! Banking: one physical control, a different MIDI address per bank.
//!
//! # Architecture
//!
//! [`Bank`] holds the single "current bank" index. It is owned by whatever
//! selects banks (bank buttons, a host message) and shared by reference with
//! every bankable control. Controls only ever *read* it.
//!
//! [`BankAddress`] is the per-control half: a table of one [`MidiAddress`]
//! per bank plus a lock. Locking freezes the resolved address so that a
//! press and its release always target the same address, even if the bank
//! changes between the two polls:
//!
//! ```text
//!  poll n:   press edge   → lock()   → resolve() = bank 2 address → On
//!  (bank selector switches to bank 5)
//!  poll m:   release edge → resolve() = bank 2 address (frozen) → Off
//!                         → unlock()
//!  poll m+1: resolve() = bank 5 address
//! ```
//!
//! Without the freeze the Off would go to the bank 5 address, leaving the
//! bank 2 target stuck On.

use core::cell::Cell;

use crate::error::ConfigError;
use crate::midi::MidiAddress;

/// The shared current-bank index for `N` banks.
///
/// Interior mutability lets the bank selector change the index while
/// controls hold shared references. All access happens from the single
/// polling context, so a plain [`Cell`] suffices.
///
/// # Example
///
/// ```
/// use spirant_controls::Bank;
///
/// let bank: Bank<4> = Bank::new();
/// bank.select(2).unwrap();
/// assert_eq!(bank.selection(), 2);
/// assert!(bank.select(4).is_err());
/// ```
#[derive(Debug)]
pub struct Bank<const N: usize> {
    selection: Cell<usize>,
}

impl<const N: usize> Default for Bank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Bank<N> {
    const NOT_EMPTY: () = assert!(N > 0, "a Bank needs at least one bank");

    /// Create a bank selector starting at bank 0.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NOT_EMPTY;
        Self {
            selection: Cell::new(0),
        }
    }

    /// Number of banks.
    pub const fn count(&self) -> usize {
        N
    }

    /// Index of the currently selected bank, always `< N`.
    pub fn selection(&self) -> usize {
        self.selection.get()
    }

    /// Select bank `index`.
    ///
    /// Returns [`ConfigError::InvalidBankIndex`] if `index >= N`; the current
    /// selection is left unchanged.
    pub fn select(&self, index: usize) -> Result<(), ConfigError> {
        if index >= N {
            return Err(ConfigError::InvalidBankIndex);
        }
        self.set(index);
        Ok(())
    }

    /// Select the next bank, wrapping from the last bank to bank 0.
    pub fn select_next(&self) {
        self.set((self.selection() + 1) % N);
    }

    /// Select the previous bank, wrapping from bank 0 to the last bank.
    pub fn select_previous(&self) {
        self.set(self.selection().checked_sub(1).unwrap_or(N - 1));
    }

    /// Callers guarantee `index < N`.
    fn set(&self, index: usize) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Bank select: {} -> {}", self.selection.get(), index);
        self.selection.set(index);
    }
}

/// Per-control address table with a lockable resolved address.
///
/// Holds one [`MidiAddress`] per bank and a shared reference to the
/// [`Bank`] that picks between them. While locked, [`resolve()`](Self::resolve)
/// returns the snapshot taken by the first [`lock()`](Self::lock) call.
pub struct BankAddress<'a, const N: usize> {
    bank: &'a Bank<N>,
    addresses: [MidiAddress; N],
    frozen: Option<MidiAddress>,
}

impl<'a, const N: usize> BankAddress<'a, N> {
    /// Create from an explicit table: `addresses[i]` is used in bank `i`.
    pub fn new(bank: &'a Bank<N>, addresses: [MidiAddress; N]) -> Self {
        Self {
            bank,
            addresses,
            frozen: None,
        }
    }

    /// Create a table where every bank shifts the controller number by
    /// `controllers_per_bank`: bank `i` uses `base.controller() + i * controllers_per_bank`
    /// on `base`'s channel.
    ///
    /// # Errors
    /// [`ConfigError::InvalidControllerNumber`] if any bank's controller
    /// number would exceed 119.
    ///
    /// # Example
    /// ```
    /// use spirant_controls::{Bank, BankAddress, MidiAddress};
    ///
    /// let bank: Bank<4> = Bank::new();
    /// let base = MidiAddress::new(16, 1).unwrap();
    /// let address = BankAddress::with_offset(&bank, base, 8).unwrap();
    ///
    /// bank.select(3).unwrap();
    /// assert_eq!(address.resolve().controller(), 40);
    /// ```
    pub fn with_offset(
        bank: &'a Bank<N>,
        base: MidiAddress,
        controllers_per_bank: usize,
    ) -> Result<Self, ConfigError> {
        let mut addresses = [base; N];
        for (index, address) in addresses.iter_mut().enumerate() {
            let offset = index
                .checked_mul(controllers_per_bank)
                .ok_or(ConfigError::InvalidControllerNumber)?;
            *address = base.offset_by(offset)?;
        }
        Ok(Self::new(bank, addresses))
    }

    /// The address this control targets right now.
    ///
    /// The frozen snapshot while locked, otherwise the table entry for the
    /// live bank selection.
    pub fn resolve(&self) -> MidiAddress {
        match self.frozen {
            Some(address) => address,
            None => self.live(),
        }
    }

    /// Freeze the currently resolved address.
    ///
    /// Calling `lock()` again before [`unlock()`](Self::unlock) keeps the
    /// first snapshot.
    pub fn lock(&mut self) {
        if self.frozen.is_none() {
            let address = self.live();
            #[cfg(feature = "defmt")]
            defmt::debug!("Address locked: {}", address);
            self.frozen = Some(address);
        }
    }

    /// Release the snapshot; [`resolve()`](Self::resolve) follows the bank again.
    pub fn unlock(&mut self) {
        if let Some(_address) = self.frozen.take() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Address unlocked: {}", _address);
        }
    }

    /// Returns `true` between [`lock()`](Self::lock) and [`unlock()`](Self::unlock).
    pub fn is_locked(&self) -> bool {
        self.frozen.is_some()
    }

    fn live(&self) -> MidiAddress {
        // Bank::select keeps the selection below N, and N > 0.
        let index = self.bank.selection().min(N - 1);
        self.addresses[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> [MidiAddress; 8] {
        core::array::from_fn(|i| MidiAddress::new(10 + i as u8, 1).unwrap())
    }

    // ── Bank ─────────────────────────────────────────────────────────

    #[test]
    fn bank_starts_at_zero() {
        let bank: Bank<3> = Bank::new();
        assert_eq!(bank.selection(), 0);
        assert_eq!(bank.count(), 3);
    }

    #[test]
    fn bank_select_out_of_bounds_keeps_selection() {
        let bank: Bank<3> = Bank::new();
        bank.select(1).unwrap();
        assert_eq!(bank.select(3), Err(ConfigError::InvalidBankIndex));
        assert_eq!(bank.selection(), 1);
    }

    #[test]
    fn bank_next_and_previous_stay_in_range() {
        let bank: Bank<4> = Bank::new();
        for _ in 0..9 {
            bank.select_next();
            assert!(bank.selection() < 4);
        }
        assert_eq!(bank.selection(), 1);
        for _ in 0..6 {
            bank.select_previous();
            assert!(bank.selection() < 4);
        }
        assert_eq!(bank.selection(), 3);
    }

    #[test]
    fn bank_next_and_previous_wrap() {
        let bank: Bank<3> = Bank::new();
        bank.select_previous();
        assert_eq!(bank.selection(), 2);
        bank.select_next();
        assert_eq!(bank.selection(), 0);
        bank.select_next();
        assert_eq!(bank.selection(), 1);
    }

    // ── Resolution ───────────────────────────────────────────────────

    #[test]
    fn unlocked_resolve_tracks_live_bank() {
        let bank: Bank<8> = Bank::new();
        let address = BankAddress::new(&bank, table());

        assert_eq!(address.resolve().controller(), 10);
        bank.select(5).unwrap();
        assert_eq!(address.resolve().controller(), 15);
    }

    #[test]
    fn lock_survives_bank_change_until_unlock() {
        let bank: Bank<8> = Bank::new();
        let mut address = BankAddress::new(&bank, table());

        bank.select(2).unwrap();
        address.lock();
        bank.select(5).unwrap();

        assert!(address.is_locked());
        assert_eq!(address.resolve().controller(), 12);

        address.unlock();
        assert!(!address.is_locked());
        assert_eq!(address.resolve().controller(), 15);
    }

    #[test]
    fn relock_keeps_first_snapshot() {
        let bank: Bank<8> = Bank::new();
        let mut address = BankAddress::new(&bank, table());

        bank.select(2).unwrap();
        address.lock();
        bank.select(6).unwrap();
        address.lock();

        assert_eq!(address.resolve().controller(), 12);
    }

    #[test]
    fn unlock_without_lock_is_harmless() {
        let bank: Bank<8> = Bank::new();
        let mut address = BankAddress::new(&bank, table());
        address.unlock();
        assert_eq!(address.resolve().controller(), 10);
    }

    // ── Offset tables ────────────────────────────────────────────────

    #[test]
    fn with_offset_spaces_controllers_per_bank() {
        let bank: Bank<4> = Bank::new();
        let base = MidiAddress::new(20, 4).unwrap();
        let address = BankAddress::with_offset(&bank, base, 4).unwrap();

        for (index, expected) in [20u8, 24, 28, 32].iter().enumerate() {
            bank.select(index).unwrap();
            assert_eq!(address.resolve().controller(), *expected);
            assert_eq!(address.resolve().channel(), 4);
        }
    }

    #[test]
    fn with_offset_rejects_tables_past_119() {
        let bank: Bank<4> = Bank::new();
        let base = MidiAddress::new(100, 1).unwrap();
        let result = BankAddress::with_offset(&bank, base, 8);
        assert!(matches!(result, Err(ConfigError::InvalidControllerNumber)));
    }
}
