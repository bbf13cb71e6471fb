//! Signature hashing (spec.md §4.7): the three preimage constructions that
//! yield the 32-byte digest signed and verified by `checksig`/
//! `checkmultisig`.
//!
//! Legacy and BIP143 preimage layouts are grounded in `script.cpp`'s
//! `generate_signature_hash` and its segwit-v0 sibling; the midstate-cache
//! shape (spec.md §5, "single-writer/many-reader") uses `std::sync::OnceLock`
//! as the one-shot initialization primitive the design notes call for.

use std::sync::OnceLock;

use crate::hash::bitcoin_hash;
use crate::script::Script;
use crate::ser::write_compact_bytes;
use crate::transaction::Transaction;
use crate::txout::Output;

/// The three base sighash modes a type byte masks down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashBase {
    All,
    None,
    Single,
}

/// A decoded sighash type: base mode plus the anyone-can-pay bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SighashFlags {
    pub base: SighashBase,
    pub anyone_can_pay: bool,
}

/// Masks a raw sighash type (the byte appended to a signature, widened to
/// `u32` for BIP143's wire field) into its base mode and anyone-can-pay
/// bit. Undefined low-bit combinations default to `All`, matching every
/// deployed implementation's historical leniency.
pub fn decode_sighash_type(sighash_type: u32) -> SighashFlags {
    let base = match sighash_type & 0x1f {
        2 => SighashBase::None,
        3 => SighashBase::Single,
        _ => SighashBase::All,
    };
    SighashFlags { base, anyone_can_pay: sighash_type & 0x80 != 0 }
}

/// The constant hash returned by a legacy `SIGHASH_SINGLE` whose input
/// index has no matching output — a consensus-preserved historical bug.
pub fn legacy_single_bug_hash() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0] = 1;
    bytes
}

/// Builds and double-hashes the legacy (unversioned) sighash preimage for
/// input `index`, signing over `sub_script` (the referenced output's
/// script, already trimmed of any code-separator prefix and the matching
/// signature bytes via [`Script::find_and_delete`]).
pub fn legacy_sighash(
    tx: &Transaction,
    index: usize,
    sub_script: &Script,
    sighash_type: u32,
) -> [u8; 32] {
    let flags = decode_sighash_type(sighash_type);

    if flags.base == SighashBase::Single && index >= tx.outputs().len() {
        return legacy_single_bug_hash();
    }

    let mut preimage = Vec::new();
    preimage.extend_from_slice(&tx.version().to_le_bytes());

    let included_inputs: Vec<usize> = if flags.anyone_can_pay {
        vec![index]
    } else {
        (0..tx.inputs().len()).collect()
    };

    crate::ser::write_compact_size(&mut preimage, included_inputs.len() as u64)
        .expect("writing to Vec never fails");
    for &i in &included_inputs {
        let input = &tx.inputs()[i];
        input.point().to_data(&mut preimage);

        let is_current = i == index;
        if is_current {
            write_compact_bytes(&mut preimage, &sub_script.to_bytes())
                .expect("writing to Vec never fails");
        } else {
            crate::ser::write_compact_size(&mut preimage, 0).expect("writing to Vec never fails");
        }

        let sequence = if is_current {
            input.sequence()
        } else if matches!(flags.base, SighashBase::None | SighashBase::Single) {
            0
        } else {
            input.sequence()
        };
        preimage.extend_from_slice(&sequence.to_le_bytes());
    }

    match flags.base {
        SighashBase::All => {
            crate::ser::write_compact_size(&mut preimage, tx.outputs().len() as u64)
                .expect("writing to Vec never fails");
            for output in tx.outputs() {
                output.to_data(&mut preimage);
            }
        }
        SighashBase::None => {
            crate::ser::write_compact_size(&mut preimage, 0).expect("writing to Vec never fails");
        }
        SighashBase::Single => {
            crate::ser::write_compact_size(&mut preimage, (index + 1) as u64)
                .expect("writing to Vec never fails");
            let null_output = Output::null();
            for (i, output) in tx.outputs().iter().enumerate().take(index + 1) {
                if i == index {
                    output.to_data(&mut preimage);
                } else {
                    null_output.to_data(&mut preimage);
                }
            }
        }
    }

    preimage.extend_from_slice(&tx.locktime().to_le_bytes());
    preimage.extend_from_slice(&sighash_type.to_le_bytes());

    bitcoin_hash(&preimage)
}

/// Lazily-populated midstate cache for the three BIP143 components shared
/// across every input of a transaction. Callers must not mutate a
/// transaction's inputs/outputs/sequences after the first sighash call that
/// populates this cache (spec.md §5).
#[derive(Debug, Default)]
pub struct SighashCache {
    points_hash: OnceLock<[u8; 32]>,
    sequences_hash: OnceLock<[u8; 32]>,
    outputs_hash: OnceLock<[u8; 32]>,
}

impl SighashCache {
    /// An empty cache, nothing yet computed.
    pub fn new() -> Self {
        Self::default()
    }

    fn points_hash(&self, tx: &Transaction) -> [u8; 32] {
        *self.points_hash.get_or_init(|| {
            let mut buf = Vec::new();
            for input in tx.inputs() {
                input.point().to_data(&mut buf);
            }
            bitcoin_hash(&buf)
        })
    }

    fn sequences_hash(&self, tx: &Transaction) -> [u8; 32] {
        *self.sequences_hash.get_or_init(|| {
            let mut buf = Vec::new();
            for input in tx.inputs() {
                buf.extend_from_slice(&input.sequence().to_le_bytes());
            }
            bitcoin_hash(&buf)
        })
    }

    fn outputs_hash(&self, tx: &Transaction) -> [u8; 32] {
        *self.outputs_hash.get_or_init(|| {
            let mut buf = Vec::new();
            for output in tx.outputs() {
                output.to_data(&mut buf);
            }
            bitcoin_hash(&buf)
        })
    }
}

/// Builds and double-hashes the BIP143 (segwit v0) sighash preimage for
/// input `index`, spending an output of `value` satoshis.
pub fn segwit_v0_sighash(
    tx: &Transaction,
    cache: &SighashCache,
    index: usize,
    sub_script: &Script,
    value: u64,
    sighash_type: u32,
) -> [u8; 32] {
    let flags = decode_sighash_type(sighash_type);
    let input = &tx.inputs()[index];
    let zero = [0u8; 32];

    let mut preimage = Vec::new();
    preimage.extend_from_slice(&tx.version().to_le_bytes());
    preimage.extend_from_slice(if flags.anyone_can_pay { &zero } else { &cache.points_hash(tx) });
    preimage.extend_from_slice(
        if !flags.anyone_can_pay && flags.base == SighashBase::All {
            &cache.sequences_hash(tx)
        } else {
            &zero
        },
    );

    input.point().to_data(&mut preimage);
    write_compact_bytes(&mut preimage, &sub_script.to_bytes()).expect("writing to Vec never fails");
    preimage.extend_from_slice(&value.to_le_bytes());
    preimage.extend_from_slice(&input.sequence().to_le_bytes());

    match flags.base {
        SighashBase::All => preimage.extend_from_slice(&cache.outputs_hash(tx)),
        SighashBase::None => preimage.extend_from_slice(&zero),
        SighashBase::Single => {
            if index >= tx.outputs().len() {
                // The v0 fix for the legacy single-sighash bug: all-zero
                // hash returned directly, not folded into the preimage.
                return [0u8; 32];
            }
            let mut buf = Vec::new();
            tx.outputs()[index].to_data(&mut buf);
            preimage.extend_from_slice(&bitcoin_hash(&buf));
        }
    }

    preimage.extend_from_slice(&tx.locktime().to_le_bytes());
    preimage.extend_from_slice(&sighash_type.to_le_bytes());

    bitcoin_hash(&preimage)
}

/// The hash-type values a partial (non-executing) taproot implementation
/// still validates per spec.md §4.7: default, all, none, single, and their
/// anyone-can-pay variants.
pub fn is_valid_taproot_hash_type(sighash_type: u32) -> bool {
    matches!(sighash_type, 0x00 | 0x01 | 0x02 | 0x03 | 0x81 | 0x82 | 0x83)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::txin::Input;

    fn two_in_one_out() -> Transaction {
        Transaction::new(
            1,
            vec![
                Input::new(Point::new([1u8; 32], 0), Script::from_bytes(&[]), 0xffff_ffff),
                Input::new(Point::new([2u8; 32], 1), Script::from_bytes(&[]), 0xffff_ffff),
            ],
            vec![Output::new(1000, Script::from_bytes(&[]))],
            0,
        )
    }

    #[test]
    fn legacy_single_bug_triggers_on_missing_output() {
        let tx = two_in_one_out();
        let sub_script = Script::from_bytes(&[]);
        let hash = legacy_sighash(&tx, 1, &sub_script, 0x03);
        assert_eq!(hash, legacy_single_bug_hash());
        assert_eq!(hash[0], 1);
        assert!(hash[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn segwit_v0_single_bug_is_fixed_to_zero() {
        let tx = two_in_one_out();
        let cache = SighashCache::new();
        let sub_script = Script::from_bytes(&[]);
        let hash = segwit_v0_sighash(&tx, &cache, 1, &sub_script, 1000, 0x03);
        assert_eq!(hash, [0u8; 32]);
    }

    #[test]
    fn bip143_cache_is_deterministic_across_calls() {
        let tx = two_in_one_out();
        let cache = SighashCache::new();
        let sub_script = Script::from_bytes(&[]);
        let first = segwit_v0_sighash(&tx, &cache, 0, &sub_script, 1000, 0x01);
        let second = segwit_v0_sighash(&tx, &cache, 0, &sub_script, 1000, 0x01);
        assert_eq!(first, second);

        let fresh_cache = SighashCache::new();
        let third = segwit_v0_sighash(&tx, &fresh_cache, 0, &sub_script, 1000, 0x01);
        assert_eq!(first, third);
    }

    #[test]
    fn anyone_can_pay_excludes_other_inputs() {
        let tx = two_in_one_out();
        let sub_script = Script::from_bytes(&[]);
        let base = legacy_sighash(&tx, 0, &sub_script, 0x01);
        let with_acp = legacy_sighash(&tx, 0, &sub_script, 0x81);
        assert_ne!(base, with_acp);
    }

    #[test]
    fn taproot_hash_type_validation() {
        for valid in [0x00, 0x01, 0x02, 0x03, 0x81, 0x82, 0x83] {
            assert!(is_valid_taproot_hash_type(valid));
        }
        assert!(!is_valid_taproot_hash_type(0x04));
        assert!(!is_valid_taproot_hash_type(0xff));
    }
}
