//! Input (spec.md §3, "Input"): an outpoint, unlocking script, witness, and
//! sequence, plus caller-supplied, non-serialized validation metadata.

use crate::point::Point;
use crate::script::Script;
use crate::ser::{write_compact_bytes, Reader};
use crate::txout::Output;
use crate::witness::Witness;

/// Caller-supplied context about the output this input spends, needed by
/// the validation pipeline but never carried on the wire. The input does
/// not own this data (spec.md §3, "Lifetime & ownership": "an Input
/// optionally holds a non-owning reference to its referenced Output").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousOutputMetadata {
    /// The referenced output's value and locking script.
    pub output: Output,
    /// The block height at which the referenced output was confirmed.
    pub confirmed_height: u32,
    /// The median-time-past of the block that confirmed the referenced
    /// output, used by BIP68 time-based relative locktimes. Distinct from
    /// `confirmed_height`: one is a block-height count, the other a Unix
    /// timestamp, and BIP68's time-locked branch needs the latter.
    pub confirmed_median_time_past: u32,
    /// Whether the referenced output was produced by a coinbase transaction
    /// (governs the coinbase-maturity check).
    pub coinbase: bool,
    /// Whether the referenced output has already been spent by some other
    /// transaction (used by the confirmed-double-spend guard).
    pub spent_elsewhere: bool,
}

/// One transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    point: Point,
    script: Script,
    witness: Witness,
    sequence: u32,
    metadata: Option<PreviousOutputMetadata>,
}

impl Input {
    /// Sequence value marking an input "final" (locktime has no effect).
    pub const FINAL_SEQUENCE: u32 = u32::MAX;

    /// Builds an input with no witness and no previous-output metadata
    /// (the legacy, unvalidated shape produced by bare deserialization).
    pub fn new(point: Point, script: Script, sequence: u32) -> Self {
        Input {
            point,
            script,
            witness: Witness::empty(),
            sequence,
            metadata: None,
        }
    }

    /// This input's previous-output reference.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// This input's unlocking script.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// This input's witness stack (empty if none was carried).
    pub fn witness(&self) -> &Witness {
        &self.witness
    }

    /// Attaches a witness, returning the updated input.
    pub fn with_witness(mut self, witness: Witness) -> Self {
        self.witness = witness;
        self
    }

    /// Attaches previous-output metadata, returning the updated input.
    pub fn with_metadata(mut self, metadata: PreviousOutputMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// This input's sequence value.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Caller-supplied metadata about the referenced output, if provided.
    pub fn metadata(&self) -> Option<&PreviousOutputMetadata> {
        self.metadata.as_ref()
    }

    /// Whether this input spends a null point (the single input of a
    /// coinbase transaction).
    pub fn is_null_point(&self) -> bool {
        self.point.is_null()
    }

    /// Whether this input is "final" for legacy locktime purposes.
    pub fn is_final(&self) -> bool {
        self.sequence == Self::FINAL_SEQUENCE
    }

    /// Parses an input's wire form: outpoint, compact-size-prefixed script,
    /// sequence. The witness (carried separately in the segwit wire form)
    /// and previous-output metadata (never on the wire) are attached by the
    /// caller afterward.
    pub fn read(reader: &mut Reader<'_>) -> Input {
        let point = Point::read(reader);
        let script_bytes = reader.read_compact_bytes();
        let sequence = reader.read_u32_le();
        Input {
            point,
            script: Script::from_bytes(&script_bytes),
            witness: Witness::empty(),
            sequence,
            metadata: None,
        }
    }

    /// Serializes this input's legacy (non-witness) wire form.
    pub fn to_data(&self, out: &mut Vec<u8>) {
        self.point.to_data(out);
        write_compact_bytes(out, &self.script.to_bytes()).expect("writing to Vec never fails");
        out.extend_from_slice(&self.sequence.to_le_bytes());
    }

    /// Serialized size in bytes of the legacy (non-witness) form.
    pub fn serialized_size(&self) -> usize {
        let script_len = self.script.serialized_size();
        self.point.serialized_size()
            + crate::ser::compact_size_len(script_len as u64)
            + script_len
            + 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_legacy_serialization() {
        let input = Input::new(Point::new([3u8; 32], 1), Script::from_bytes(&[]), 0xffff_ffff);
        let mut buf = Vec::new();
        input.to_data(&mut buf);
        assert_eq!(buf.len(), input.serialized_size());
        let mut reader = Reader::new(&buf);
        let parsed = Input::read(&mut reader);
        assert_eq!(parsed.point(), input.point());
        assert_eq!(parsed.sequence(), input.sequence());
        assert!(parsed.is_final());
    }

    #[test]
    fn coinbase_input_has_null_point() {
        let input = Input::new(Point::null(), Script::from_bytes(&[]), 0);
        assert!(input.is_null_point());
    }
}
