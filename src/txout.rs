//! Output (spec.md §3, "Output"): a satoshi value plus a locking script.

use crate::script::Script;
use crate::ser::{write_compact_bytes, Reader};

/// A transaction output: value in satoshis plus its locking script.
///
/// The value is structurally a signed 64-bit integer (matching the wire
/// encoding); negative values parse without error but are consensus-invalid,
/// a check left to the validation pipeline rather than this constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    value: i64,
    script: Script,
}

impl Output {
    /// The sentinel value used for the "null output" substituted into a
    /// legacy `SIGHASH_SINGLE` preimage for every output before the signed
    /// index.
    pub const NULL_VALUE: i64 = -1;

    /// Builds an output from its value and locking script.
    pub fn new(value: i64, script: Script) -> Self {
        Output { value, script }
    }

    /// The "null output" substituted for earlier outputs in a legacy
    /// `SIGHASH_SINGLE` preimage: value `0xffff_ffff_ffff_ffff` (i.e. -1 as
    /// a signed 64-bit wire value), empty script.
    pub fn null() -> Self {
        Output {
            value: Self::NULL_VALUE,
            script: Script::from_ops(Vec::new()),
        }
    }

    /// This output's value, in satoshis.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// This output's locking script.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Parses an output: little-endian signed 64-bit value, then a
    /// compact-size-prefixed script.
    pub fn read(reader: &mut Reader<'_>) -> Output {
        let value = reader.read_u64_le() as i64;
        let script_bytes = reader.read_compact_bytes();
        Output {
            value,
            script: Script::from_bytes(&script_bytes),
        }
    }

    /// Serializes this output: little-endian signed value then the
    /// compact-size-prefixed script.
    pub fn to_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.value as u64).to_le_bytes());
        write_compact_bytes(out, &self.script.to_bytes()).expect("writing to Vec never fails");
    }

    /// Serialized size in bytes.
    pub fn serialized_size(&self) -> usize {
        let script_len = self.script.serialized_size();
        8 + crate::ser::compact_size_len(script_len as u64) + script_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;
    use crate::operation::Operation;

    #[test]
    fn round_trips_serialization() {
        let script = Script::from_ops(vec![
            Operation::new(Opcode::Dup),
            Operation::from_data(vec![1, 2, 3]),
        ]);
        let output = Output::new(50_000, script);
        let mut buf = Vec::new();
        output.to_data(&mut buf);
        assert_eq!(buf.len(), output.serialized_size());
        let mut reader = Reader::new(&buf);
        let parsed = Output::read(&mut reader);
        assert_eq!(parsed, output);
    }

    #[test]
    fn null_output_has_sentinel_value() {
        let null = Output::null();
        assert_eq!(null.value(), -1);
        assert!(null.script().ops().is_empty());
    }
}
