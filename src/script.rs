//! Script (spec.md §4.4), replacing the teacher's P2PKH-only version with
//! the general container and its pattern-recognition predicates.
//!
//! Structural predicates and the `output_pattern`/`input_pattern`/
//! `script_pattern` resolution order are grounded in `script.cpp`'s
//! equivalents.

use crate::constants::{
    MAX_NULL_DATA_SIZE, MAX_SCRIPT_PUBLIC_KEYS, MAX_SCRIPT_SIZE, MULTISIG_DEFAULT_SIGOPS,
    WITNESS_COMMITMENT_HEADER,
};
use crate::num;
use crate::opcode::Opcode;
use crate::operation::Operation;
use crate::ser::Reader;

/// Structural classification of a script, as either a spending condition
/// (output) or a satisfying witness (input). Resolution order matters:
/// some scripts match more than one shape, and `script.cpp`'s ordering
/// disambiguates which one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPattern {
    PayKeyHash,
    PayScriptHash,
    PayNullData,
    PayPublicKey,
    PayMultisig,
    PayWitness,
    SignKeyHash,
    SignScriptHash,
    SignPublicKey,
    SignMultisig,
    NonStandard,
}

/// A parsed sequence of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    ops: Vec<Operation>,
    valid: bool,
}

impl Script {
    /// Parses `data` into a sequence of operations. A script is marked
    /// invalid (not rejected outright) if it exceeds [`MAX_SCRIPT_SIZE`] or
    /// any operation underflows — later pipeline stages are responsible
    /// for checking `is_valid`.
    pub fn from_bytes(data: &[u8]) -> Script {
        let mut ops = Vec::new();
        let mut reader = Reader::new(data);
        let mut valid = data.len() <= MAX_SCRIPT_SIZE;

        while reader.remaining() > 0 {
            let op = Operation::read(&mut reader);
            if op.is_underflow() {
                valid = false;
                ops.push(op);
                break;
            }
            ops.push(op);
        }

        Script { ops, valid }
    }

    /// Builds a script directly from already-parsed operations (e.g. a
    /// machine-constructed P2WPKH-equivalent scriptPubKey).
    pub fn from_ops(ops: Vec<Operation>) -> Script {
        Script { ops, valid: true }
    }

    /// Serializes this script's operations back to bytes, without a length
    /// prefix (callers needing a prefixed form — e.g. a scriptSig inside a
    /// transaction — use [`crate::ser::write_compact_bytes`] over this
    /// output).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for op in &self.ops {
            op.to_data(&mut out);
        }
        out
    }

    /// Whether parsing succeeded (no underflow, within size bounds).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// This script's operations.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Byte length of the serialized script (no length prefix).
    pub fn serialized_size(&self) -> usize {
        self.ops.iter().map(Operation::serialized_size).sum()
    }

    /// `is_push_only`: every operation is a relaxed push (including
    /// `reserved_80`), the consensus-defined predicate for "this byte
    /// stream contains no executable logic, only data."
    pub fn is_push_only(&self) -> bool {
        self.ops.iter().all(|op| op.code().is_relaxed_push())
    }

    /// Counts signature operations, in "accurate" mode if `accurate` (a
    /// `checkmultisig` preceded by a minimal number push counts that many
    /// keys) or flat [`MULTISIG_DEFAULT_SIGOPS`] otherwise — the
    /// bare-script counting rule used pre-P2SH evaluation and for scripts
    /// without the accurate-counting soft fork.
    pub fn sigop_count(&self, accurate: bool) -> usize {
        let mut count = 0;
        let mut last_pushed_number: Option<i64> = None;

        for op in &self.ops {
            match op.code() {
                Opcode::CheckSig | Opcode::CheckSigVerify => count += 1,
                Opcode::CheckMultisig | Opcode::CheckMultisigVerify => {
                    count += match (accurate, last_pushed_number) {
                        (true, Some(n)) if (0..=MAX_SCRIPT_PUBLIC_KEYS as i64).contains(&n) => {
                            n as usize
                        }
                        _ => MULTISIG_DEFAULT_SIGOPS,
                    };
                }
                _ => {}
            }
            last_pushed_number = decode_small_number(op);
        }
        count
    }

    /// `is_pay_key_hash_pattern`: `DUP HASH160 <20 bytes> EQUALVERIFY CHECKSIG`.
    pub fn is_pay_key_hash_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b, c, d, e]
            if a.code() == Opcode::Dup
                && b.code() == Opcode::Hash160
                && c.data().len() == 20
                && d.code() == Opcode::EqualVerify
                && e.code() == Opcode::CheckSig)
    }

    /// `is_pay_script_hash_pattern`: `HASH160 <20 bytes> EQUAL`.
    pub fn is_pay_script_hash_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b, c]
            if a.code() == Opcode::Hash160 && b.data().len() == 20 && c.code() == Opcode::Equal)
    }

    /// `is_pay_null_data_pattern`: `RETURN` alone, or `RETURN` followed by a
    /// minimal push of at most [`MAX_NULL_DATA_SIZE`] bytes.
    pub fn is_pay_null_data_pattern(&self) -> bool {
        match self.ops.as_slice() {
            [a] => a.code() == Opcode::Return,
            [a, b] => {
                a.code() == Opcode::Return
                    && b.code().is_push()
                    && b.data().len() <= MAX_NULL_DATA_SIZE
                    && b.is_minimal_push()
            }
            _ => false,
        }
    }

    /// `is_pay_public_key_pattern`: `<33 or 65 byte pubkey> CHECKSIG`.
    pub fn is_pay_public_key_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b]
            if a.code().is_push()
                && matches!(a.data().len(), 33 | 65)
                && b.code() == Opcode::CheckSig)
    }

    /// `is_pay_multisig_pattern`: `OP_m <pubkey>... OP_n CHECKMULTISIG`,
    /// with `1 <= m <= n <= 16` and exactly `n` public key pushes.
    pub fn is_pay_multisig_pattern(&self) -> bool {
        let ops = &self.ops;
        if ops.len() < 4 || ops.last().map(Operation::code) != Some(Opcode::CheckMultisig) {
            return false;
        }
        let m = match decode_small_number(&ops[0]) {
            Some(m) if (1..=16).contains(&m) => m,
            _ => return false,
        };
        let n = match decode_small_number(&ops[ops.len() - 2]) {
            Some(n) if (m..=16).contains(&n) => n,
            _ => return false,
        };
        let keys = &ops[1..ops.len() - 2];
        keys.len() as i64 == n
            && keys
                .iter()
                .all(|op| op.code().is_push() && matches!(op.data().len(), 33 | 65))
    }

    /// `is_pay_witness_pattern`: any witness-version opcode followed by a
    /// `2..=40`-byte push — the generic shape, recognised even for program
    /// versions this engine does not itself evaluate.
    pub fn is_pay_witness_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b]
            if a.code().is_version() && (2..=40).contains(&b.data().len()) && b.code().is_push())
    }

    /// `is_witness_program_pattern`: the version-0-only shape this engine
    /// actually evaluates (`OP_0 <2..40 byte program>`).
    pub fn is_witness_program_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b]
            if a.code() == Opcode::Op0 && (2..=40).contains(&b.data().len()) && b.code().is_push())
    }

    /// `is_pay_witness_key_hash_pattern`: `OP_0 <20 bytes>`.
    pub fn is_pay_witness_key_hash_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b] if a.code() == Opcode::Op0 && b.data().len() == 20)
    }

    /// `is_pay_witness_script_hash_pattern`: `OP_0 <32 bytes>`.
    pub fn is_pay_witness_script_hash_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b] if a.code() == Opcode::Op0 && b.data().len() == 32)
    }

    /// `is_commitment_pattern`: `RETURN <36 bytes: 0xaa21a9ed || root>`, the
    /// BIP141 witness commitment carried in a coinbase output.
    pub fn is_commitment_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b]
            if a.code() == Opcode::Return
                && b.data().len() == 36
                && b.data()[..4] == WITNESS_COMMITMENT_HEADER)
    }

    /// `is_coinbase_pattern`: a non-empty script whose first operation is a
    /// minimally-encoded push (the BIP34 height commitment).
    pub fn is_coinbase_pattern(&self) -> bool {
        match self.ops.first() {
            Some(op) => op.code().is_push() && op.is_minimal_push(),
            None => false,
        }
    }

    /// `is_sign_key_hash_pattern`: `<signature> <pubkey>`.
    pub fn is_sign_key_hash_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a, b]
            if a.code().is_push() && b.code().is_push() && matches!(b.data().len(), 33 | 65))
    }

    /// `is_sign_script_hash_pattern`: one or more relaxed pushes, the last
    /// being the redeem script.
    pub fn is_sign_script_hash_pattern(&self) -> bool {
        !self.ops.is_empty() && self.ops.iter().all(|op| op.code().is_relaxed_push())
    }

    /// `is_sign_public_key_pattern`: a single push (the signature alone).
    pub fn is_sign_public_key_pattern(&self) -> bool {
        matches!(self.ops.as_slice(), [a] if a.code().is_push())
    }

    /// `is_sign_multisig_pattern`: the historical `CHECKMULTISIG`
    /// off-by-one dummy (`OP_0`) followed by one or more signature pushes.
    pub fn is_sign_multisig_pattern(&self) -> bool {
        match self.ops.as_slice() {
            [first, rest @ ..] => {
                first.code() == Opcode::Op0
                    && !rest.is_empty()
                    && rest.iter().all(|op| op.code().is_relaxed_push())
            }
            _ => false,
        }
    }

    /// Resolves this script as a spending-condition (output) pattern,
    /// trying key-hash, then script-hash, then null-data, then public-key,
    /// then multisig, then the generic witness shape — `script.cpp`'s
    /// `output_pattern` order.
    pub fn output_pattern(&self) -> ScriptPattern {
        if self.is_pay_key_hash_pattern() {
            ScriptPattern::PayKeyHash
        } else if self.is_pay_script_hash_pattern() {
            ScriptPattern::PayScriptHash
        } else if self.is_pay_null_data_pattern() {
            ScriptPattern::PayNullData
        } else if self.is_pay_public_key_pattern() {
            ScriptPattern::PayPublicKey
        } else if self.is_pay_multisig_pattern() {
            ScriptPattern::PayMultisig
        } else if self.is_pay_witness_pattern() {
            ScriptPattern::PayWitness
        } else {
            ScriptPattern::NonStandard
        }
    }

    /// Resolves this script as a satisfying-witness (input) pattern,
    /// trying key-hash, then script-hash, then public-key, then multisig —
    /// preferring `sign_key_hash` over the more permissive
    /// `sign_script_hash`, since every `sign_key_hash` script also matches
    /// the script-hash shape.
    pub fn input_pattern(&self) -> ScriptPattern {
        if self.is_sign_key_hash_pattern() {
            ScriptPattern::SignKeyHash
        } else if self.is_sign_script_hash_pattern() {
            ScriptPattern::SignScriptHash
        } else if self.is_sign_public_key_pattern() {
            ScriptPattern::SignPublicKey
        } else if self.is_sign_multisig_pattern() {
            ScriptPattern::SignMultisig
        } else {
            ScriptPattern::NonStandard
        }
    }

    /// Resolves this script as either shape, output patterns first.
    pub fn script_pattern(&self) -> ScriptPattern {
        match self.output_pattern() {
            ScriptPattern::NonStandard => self.input_pattern(),
            pattern => pattern,
        }
    }

    /// The subscript starting at `index`, used to rebuild the signature-hash
    /// subscript after an `OP_CODESEPARATOR` has executed.
    pub fn subscript_from(&self, index: usize) -> Script {
        let start = index.min(self.ops.len());
        Script {
            ops: self.ops[start..].to_vec(),
            valid: self.valid,
        }
    }

    /// `find_and_delete`: removes every operation whose serialized bytes
    /// exactly equal `target`'s serialized bytes — the consensus-critical
    /// signature-stripping step `checksig`/`checkmultisig` apply to their
    /// subscript before hashing, so a signature's own bytes can never
    /// accidentally appear inside the preimage it signs.
    pub fn find_and_delete(&self, target: &Operation) -> Script {
        let mut needle = Vec::new();
        target.to_data(&mut needle);

        let ops = self
            .ops
            .iter()
            .filter(|op| {
                let mut buf = Vec::new();
                op.to_data(&mut buf);
                buf != needle
            })
            .cloned()
            .collect();
        Script { ops, valid: self.valid }
    }
}

impl std::fmt::Display for Script {
    /// Space-joined mnemonic rendering of this script's operations, matching
    /// `script::to_string`'s one-operation-per-token form. An empty script
    /// renders as an empty string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for op in &self.ops {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{op}")?;
            first = false;
        }
        Ok(())
    }
}

fn decode_small_number(op: &Operation) -> Option<i64> {
    if op.code() == Opcode::Op0 {
        return Some(0);
    }
    if !op.code().is_number() {
        return None;
    }
    num::decode(op.data(), 4, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(bytes: Vec<u8>) -> Operation {
        Operation::from_data(bytes)
    }

    fn op(code: Opcode) -> Operation {
        Operation::new(code)
    }

    #[test]
    fn empty_script_displays_as_empty_string() {
        assert_eq!(Script::from_bytes(&[]).to_string(), "");
    }

    #[test]
    fn truncated_push_script_displays_raw_hex() {
        let script = Script::from_bytes(&[0x02, 0xff]);
        assert!(!script.is_valid());
        assert_eq!(script.to_string(), "<02ff>");
    }

    #[test]
    fn recognises_pay_key_hash() {
        let script = Script::from_ops(vec![
            op(Opcode::Dup),
            op(Opcode::Hash160),
            push(vec![0u8; 20]),
            op(Opcode::EqualVerify),
            op(Opcode::CheckSig),
        ]);
        assert!(script.is_pay_key_hash_pattern());
        assert_eq!(script.output_pattern(), ScriptPattern::PayKeyHash);
        assert_eq!(script.sigop_count(true), 1);
    }

    #[test]
    fn recognises_pay_script_hash() {
        let script = Script::from_ops(vec![
            op(Opcode::Hash160),
            push(vec![0u8; 20]),
            op(Opcode::Equal),
        ]);
        assert!(script.is_pay_script_hash_pattern());
        assert_eq!(script.output_pattern(), ScriptPattern::PayScriptHash);
    }

    #[test]
    fn recognises_witness_key_hash() {
        let script = Script::from_ops(vec![op(Opcode::Op0), push(vec![0u8; 20])]);
        assert!(script.is_witness_program_pattern());
        assert!(script.is_pay_witness_key_hash_pattern());
        assert_eq!(script.output_pattern(), ScriptPattern::PayWitness);
    }

    #[test]
    fn recognises_bare_multisig_and_counts_sigops_accurately() {
        let script = Script::from_ops(vec![
            op(Opcode::Op2),
            push(vec![2u8; 33]),
            push(vec![3u8; 33]),
            push(vec![4u8; 33]),
            op(Opcode::Op3),
            op(Opcode::CheckMultisig),
        ]);
        assert!(script.is_pay_multisig_pattern());
        assert_eq!(script.sigop_count(true), 3);
        assert_eq!(script.sigop_count(false), MULTISIG_DEFAULT_SIGOPS);
    }

    #[test]
    fn null_data_rejects_oversized_payload() {
        let script = Script::from_ops(vec![op(Opcode::Return), push(vec![0u8; 81])]);
        assert!(!script.is_pay_null_data_pattern());
    }

    #[test]
    fn is_push_only_includes_reserved_80() {
        let script = Script::from_ops(vec![op(Opcode::Reserved), push(vec![1, 2, 3])]);
        assert!(script.is_push_only());
    }

    #[test]
    fn script_exceeding_max_size_is_invalid() {
        let data = vec![0x4cu8, 0x00].repeat(MAX_SCRIPT_SIZE);
        let script = Script::from_bytes(&data);
        assert!(!script.is_valid());
    }

    #[test]
    fn round_trips_serialization() {
        let script = Script::from_ops(vec![op(Opcode::Dup), push(vec![1, 2, 3])]);
        let bytes = script.to_bytes();
        let parsed = Script::from_bytes(&bytes);
        assert!(parsed.is_valid());
        assert_eq!(parsed.ops(), script.ops());
    }
}
