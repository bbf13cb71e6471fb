//! The active-forks bitmask (spec.md §6, "Active-forks bitmask").
//!
//! Each bit independently gates a soft-fork behavior change documented next
//! to the opcode or validation predicate it affects. Bits are ORed together
//! by the caller to describe the rule set active at a given chain height;
//! this crate never looks at height directly.

use std::ops::{BitOr, BitOrAssign};

/// A single consensus rule switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Fork {
    /// BIP16: pay-to-script-hash evaluation.
    Bip16 = 1 << 0,
    /// BIP30: duplicate-transaction-id rejection (block validation only).
    Bip30 = 1 << 1,
    /// BIP34: coinbase height commitment.
    Bip34 = 1 << 2,
    /// BIP42: subsidy overflow fix at block 13,440,000.
    Bip42 = 1 << 3,
    /// BIP65: `checklocktimeverify`.
    Bip65 = 1 << 4,
    /// BIP66: strict DER signature encoding.
    Bip66 = 1 << 5,
    /// BIP68: relative locktime semantics for transaction `sequence`.
    Bip68 = 1 << 6,
    /// BIP112: `checksequenceverify`.
    Bip112 = 1 << 7,
    /// BIP113: median-time-past locktime comparison.
    Bip113 = 1 << 8,
    /// BIP141: segregated witness.
    Bip141 = 1 << 9,
    /// BIP143: segwit v0 signature hash algorithm.
    Bip143 = 1 << 10,
    /// BIP147: null-dummy enforcement for `checkmultisig`.
    Bip147 = 1 << 11,
    /// Promotes `nop1`/`nop4`..`nop10` and other historically-reserved codes
    /// from reserved (always-fail-if-executed) to true no-ops.
    NopsRule = 1 << 12,
    /// Re-enables the disabled string/bitwise opcodes (`cat`, `substr`, ...).
    /// Never active on mainnet; named per spec.md DESIGN NOTES as a
    /// recognised but normally-unset bit.
    CatsRule = 1 << 13,
}

/// A 32-bit mask of [`Fork`] bits, the external contract named in spec.md §6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Forks(pub u32);

impl Forks {
    /// No rules active (pre-genesis-fork behavior).
    pub const NONE: Forks = Forks(0);

    /// Returns whether `fork`'s bit is set in this mask.
    pub fn is_enabled(self, fork: Fork) -> bool {
        self.0 & (fork as u32) != 0
    }
}

impl From<Fork> for Forks {
    fn from(fork: Fork) -> Self {
        Forks(fork as u32)
    }
}

impl BitOr for Forks {
    type Output = Forks;

    fn bitor(self, rhs: Forks) -> Forks {
        Forks(self.0 | rhs.0)
    }
}

impl BitOr<Fork> for Forks {
    type Output = Forks;

    fn bitor(self, rhs: Fork) -> Forks {
        Forks(self.0 | rhs as u32)
    }
}

impl BitOrAssign<Fork> for Forks {
    fn bitor_assign(&mut self, rhs: Fork) {
        self.0 |= rhs as u32;
    }
}

impl BitOr for Fork {
    type Output = Forks;

    fn bitor(self, rhs: Fork) -> Forks {
        Forks(self as u32 | rhs as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit_enabled() {
        let forks: Forks = Fork::Bip65.into();
        assert!(forks.is_enabled(Fork::Bip65));
        assert!(!forks.is_enabled(Fork::Bip66));
    }

    #[test]
    fn combined_bits() {
        let forks = Fork::Bip65 | Fork::Bip112 | Fork::Bip141;
        assert!(forks.is_enabled(Fork::Bip65));
        assert!(forks.is_enabled(Fork::Bip112));
        assert!(forks.is_enabled(Fork::Bip141));
        assert!(!forks.is_enabled(Fork::Bip66));
    }

    #[test]
    fn none_enables_nothing() {
        assert!(!Forks::NONE.is_enabled(Fork::Bip16));
    }
}
