//! Witness (spec.md §4.5): the ordered stack of byte strings carried
//! out-of-band from an input's unlocking script, introduced by BIP141.
//!
//! Program extraction (`extract_script`) and the coinbase-reserved
//! predicate are grounded in `witness.cpp`'s `extract_script` and
//! `is_reserved_pattern`.

use crate::opcode::Opcode;
use crate::operation::Operation;
use crate::script::Script;
use crate::ser::{write_compact_bytes, Reader};

/// The witness program version and program bytes a referenced output
/// script matched, or `None` when the output is not a witness program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessVersion {
    /// Version 0 (BIP141): the only version this machine evaluates.
    V0,
    /// Any other version byte (1..=16): reserved for future soft forks.
    Reserved,
}

/// Outcome of matching a witness against its referenced output script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitnessProgram {
    /// P2WPKH: output program is 20 bytes. The synthesized input script is
    /// `dup hash160 <program> equalverify checksig`, evaluated against an
    /// initial stack of the witness's two elements unchanged.
    KeyHash { sub_script: Script },
    /// P2WSH: output program is 32 bytes. The witness's last element is the
    /// witness script (whose `sha256` must equal the program); the
    /// remaining elements seed the initial stack.
    ScriptHash { sub_script: Script, stack: Vec<Vec<u8>> },
    /// A version-0 program whose length is neither 20 nor 32: the witness
    /// always fails validation for this output.
    Invalid,
    /// A non-zero witness version: soft-fork forward compatibility —
    /// evaluation succeeds unconditionally without executing anything.
    Unknown,
}

/// An ordered stack of byte strings, one per input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Witness {
    elements: Vec<Vec<u8>>,
}

impl Witness {
    /// An empty witness (the common case for a pre-segwit input).
    pub fn empty() -> Self {
        Witness { elements: Vec::new() }
    }

    /// Builds a witness from its stack elements, bottom to top.
    pub fn new(elements: Vec<Vec<u8>>) -> Self {
        Witness { elements }
    }

    /// This witness's stack elements.
    pub fn elements(&self) -> &[Vec<u8>] {
        &self.elements
    }

    /// Whether this witness carries no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// `is_reserved_pattern`: exactly one 32-byte element, the shape
    /// reserved for a coinbase's BIP141 witness-commitment nonce.
    pub fn is_reserved_pattern(&self) -> bool {
        matches!(self.elements.as_slice(), [single] if single.len() == 32)
    }

    /// Parses a witness: a compact-size element count, then that many
    /// compact-size-prefixed byte strings.
    pub fn read(reader: &mut Reader<'_>) -> Witness {
        let count = reader.read_compact_size();
        let mut elements = Vec::new();
        for _ in 0..count {
            if !reader.is_valid() {
                break;
            }
            elements.push(reader.read_compact_bytes());
        }
        Witness { elements }
    }

    /// Serializes this witness: compact-size count, then each element
    /// compact-size-prefixed.
    pub fn to_data(&self, out: &mut Vec<u8>) {
        crate::ser::write_compact_size(out, self.elements.len() as u64)
            .expect("writing to Vec never fails");
        for element in &self.elements {
            write_compact_bytes(out, element).expect("writing to Vec never fails");
        }
    }

    /// Serialized size in bytes.
    pub fn serialized_size(&self) -> usize {
        let mut size = crate::ser::compact_size_len(self.elements.len() as u64);
        for element in &self.elements {
            size += crate::ser::compact_size_len(element.len() as u64) + element.len();
        }
        size
    }

    /// Matches this witness against `output_script`, the script referenced
    /// by the input being spent, per spec.md §4.5.
    pub fn extract_program(&self, output_script: &Script) -> WitnessProgram {
        if output_script.is_pay_witness_key_hash_pattern() {
            let program = &output_script.ops()[1];
            return if self.elements.len() == 2 {
                WitnessProgram::KeyHash {
                    sub_script: Script::from_ops(vec![
                        Operation::new(Opcode::Dup),
                        Operation::new(Opcode::Hash160),
                        Operation::from_data(program.data().to_vec()),
                        Operation::new(Opcode::EqualVerify),
                        Operation::new(Opcode::CheckSig),
                    ]),
                }
            } else {
                WitnessProgram::Invalid
            };
        }

        if output_script.is_pay_witness_script_hash_pattern() {
            return match self.elements.split_last() {
                Some((witness_script_bytes, stack)) => {
                    let digest = crate::hash::sha256(witness_script_bytes);
                    let program = output_script.ops()[1].data();
                    if digest.as_slice() == program {
                        WitnessProgram::ScriptHash {
                            sub_script: Script::from_bytes(witness_script_bytes),
                            stack: stack.to_vec(),
                        }
                    } else {
                        WitnessProgram::Invalid
                    }
                }
                None => WitnessProgram::Invalid,
            };
        }

        if output_script.is_witness_program_pattern() {
            // Version 0 but neither 20 nor 32 bytes: always invalid.
            return WitnessProgram::Invalid;
        }

        if output_script.is_pay_witness_pattern() {
            return WitnessProgram::Unknown;
        }

        WitnessProgram::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;
    use crate::operation::Operation;

    fn op0_push(data: Vec<u8>) -> Script {
        Script::from_ops(vec![Operation::new(Opcode::Op0), Operation::from_data(data)])
    }

    #[test]
    fn round_trips_serialization() {
        let witness = Witness::new(vec![vec![1, 2, 3], vec![], vec![9u8; 65]]);
        let mut buf = Vec::new();
        witness.to_data(&mut buf);
        assert_eq!(buf.len(), witness.serialized_size());
        let mut reader = Reader::new(&buf);
        let parsed = Witness::read(&mut reader);
        assert_eq!(parsed, witness);
    }

    #[test]
    fn key_hash_requires_exactly_two_elements() {
        let program = op0_push(vec![0u8; 20]);
        let witness = Witness::new(vec![vec![1], vec![2]]);
        assert!(matches!(
            witness.extract_program(&program),
            WitnessProgram::KeyHash { .. }
        ));

        let wrong_count = Witness::new(vec![vec![1]]);
        assert_eq!(wrong_count.extract_program(&program), WitnessProgram::Invalid);
    }

    #[test]
    fn script_hash_checks_sha256_of_witness_script() {
        let witness_script = Script::from_ops(vec![Operation::new(Opcode::CheckSig)]);
        let witness_script_bytes = witness_script.to_bytes();
        let digest = crate::hash::sha256(&witness_script_bytes);
        let program = op0_push(digest.to_vec());

        let witness = Witness::new(vec![vec![0xAA; 71], witness_script_bytes.clone()]);
        match witness.extract_program(&program) {
            WitnessProgram::ScriptHash { sub_script, stack } => {
                assert_eq!(sub_script.to_bytes(), witness_script_bytes);
                assert_eq!(stack, vec![vec![0xAA; 71]]);
            }
            other => panic!("expected ScriptHash, got {other:?}"),
        }

        let tampered = Witness::new(vec![vec![0xAA; 71], vec![0x00]]);
        assert_eq!(tampered.extract_program(&program), WitnessProgram::Invalid);
    }

    #[test]
    fn reserved_version_skips_evaluation() {
        let program = Script::from_ops(vec![
            Operation::new(Opcode::Op1),
            Operation::from_data(vec![0u8; 32]),
        ]);
        let witness = Witness::new(vec![vec![1, 2, 3]]);
        assert_eq!(witness.extract_program(&program), WitnessProgram::Unknown);
    }

    #[test]
    fn coinbase_reserved_pattern() {
        assert!(Witness::new(vec![vec![0u8; 32]]).is_reserved_pattern());
        assert!(!Witness::new(vec![vec![0u8; 31]]).is_reserved_pattern());
        assert!(!Witness::new(vec![vec![0u8; 32], vec![1]]).is_reserved_pattern());
    }
}
