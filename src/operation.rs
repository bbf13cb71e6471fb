//! A single parsed script operation (spec.md §4.3), replacing the teacher's
//! `token.rs`/`tokenizer.rs` pair with one type that also knows how to
//! classify its own push encoding, grounded in `operation.hpp`'s
//! `operation` class and `opcode_from_size`/`minimal_opcode_from_data`.

use crate::constants::MAX_PUSH_DATA_SIZE;
use crate::opcode::Opcode;
use crate::ser::Reader;

/// One opcode plus, for push opcodes, the bytes it pushes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    code: Opcode,
    data: Vec<u8>,
    /// Set when this operation's header claimed a payload length this
    /// script does not actually have the bytes for; the script is invalid
    /// but this operation still round-trips its consumed prefix bytes
    /// through `to_data`, matching libbitcoin's `is_underflow` handling.
    underflow: bool,
}

impl Operation {
    /// A fieldless opcode with no payload (anything but a push).
    pub fn new(code: Opcode) -> Self {
        Operation {
            code,
            data: Vec::new(),
            underflow: false,
        }
    }

    /// Builds the minimal-encoding push operation for `data`, choosing
    /// `OP_0`, `OP_1NEGATE`/`OP_1`..`OP_16`, a direct push, or a
    /// `PUSHDATA1/2/4` opcode, per `minimal_opcode_from_data`.
    pub fn from_data(data: Vec<u8>) -> Self {
        let code = Self::minimal_opcode_for(&data);
        Operation {
            code,
            data,
            underflow: false,
        }
    }

    fn minimal_opcode_for(data: &[u8]) -> Opcode {
        if data.is_empty() {
            return Opcode::Op0;
        }
        if data.len() == 1 {
            match data[0] {
                0x81 => return Opcode::Op1Negate,
                1..=16 => return Opcode::from_byte(0x50 + data[0]),
                _ => {}
            }
        }
        Self::nominal_opcode_for(data.len())
    }

    /// The non-minimal ("nominal") push opcode for a payload of `len` bytes
    /// — a direct push for `1..=75`, else the smallest `PUSHDATA*` form.
    pub fn nominal_opcode_for(len: usize) -> Opcode {
        match len {
            0..=75 => Opcode::PushBytes(len as u8),
            76..=255 => Opcode::PushData1,
            256..=65535 => Opcode::PushData2,
            _ => Opcode::PushData4,
        }
    }

    /// This operation's opcode.
    pub fn code(&self) -> Opcode {
        self.code
    }

    /// This operation's pushed payload, empty for non-push opcodes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the script ran out of bytes while parsing this operation's
    /// declared payload length.
    pub fn is_underflow(&self) -> bool {
        self.underflow
    }

    /// Whether this operation's push payload exceeds
    /// [`MAX_PUSH_DATA_SIZE`] — checked by the machine at the start of each
    /// evaluation step (spec.md §4.8, step 1), not at parse time, since an
    /// oversized-but-fully-present push is still a structurally valid
    /// operation.
    pub fn is_oversized(&self) -> bool {
        self.data.len() > MAX_PUSH_DATA_SIZE
    }

    /// Whether this push used the shortest possible encoding for its
    /// payload. Non-push opcodes are trivially minimal.
    pub fn is_minimal_push(&self) -> bool {
        if self.underflow || !self.code.is_push() {
            return true;
        }
        self.code == Self::minimal_opcode_for(&self.data)
    }

    /// Parses one operation from `reader`. On a truncated payload length or
    /// truncated payload, returns an operation flagged `is_underflow` rather
    /// than failing outright; its `data` holds whatever raw bytes remained
    /// from the operation's start to the end of the script, so re-serializing
    /// it reproduces the original bytes exactly (spec.md §3, "such an
    /// operation preserves the partial payload").
    pub fn read(reader: &mut Reader<'_>) -> Operation {
        let start = reader.position();
        let byte = reader.read_u8();
        if !reader.is_valid() {
            return Operation::underflowed(reader.tail_from(start));
        }
        let code = Opcode::from_byte(byte);

        let len = match code {
            Opcode::PushBytes(n) => n as usize,
            Opcode::PushData1 => {
                let n = reader.read_u8();
                if !reader.is_valid() {
                    return Operation::underflowed(reader.tail_from(start));
                }
                n as usize
            }
            Opcode::PushData2 => match reader.read_bytes(2) {
                Some(b) => u16::from_le_bytes([b[0], b[1]]) as usize,
                None => return Operation::underflowed(reader.tail_from(start)),
            },
            Opcode::PushData4 => match reader.read_bytes(4) {
                Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize,
                None => return Operation::underflowed(reader.tail_from(start)),
            },
            _ => {
                return Operation {
                    code,
                    data: Vec::new(),
                    underflow: false,
                }
            }
        };

        match reader.read_bytes(len) {
            Some(data) => Operation {
                code,
                data: data.to_vec(),
                underflow: false,
            },
            None => Operation::underflowed(reader.tail_from(start)),
        }
    }

    /// Builds an underflowed operation, capturing `raw` (the operation's
    /// header byte plus whatever partial length/payload bytes followed it)
    /// verbatim so [`Operation::to_data`] reproduces the original bytes.
    fn underflowed(raw: &[u8]) -> Operation {
        Operation {
            code: Opcode::from_byte(raw.first().copied().unwrap_or(0)),
            data: raw.to_vec(),
            underflow: true,
        }
    }

    /// Serializes this operation using its own opcode (not necessarily the
    /// minimal one — a non-minimal-push operation re-serializes to the same
    /// bytes it was parsed from). An underflowed operation instead replays
    /// its captured raw bytes verbatim, so a truncated script round-trips
    /// bit-exact (spec.md §8, boundary scenario 3).
    pub fn to_data(&self, out: &mut Vec<u8>) {
        if self.underflow {
            out.extend_from_slice(&self.data);
            return;
        }
        out.push(self.code.to_byte());
        match self.code {
            Opcode::PushBytes(_) => out.extend_from_slice(&self.data),
            Opcode::PushData1 => {
                out.push(self.data.len() as u8);
                out.extend_from_slice(&self.data);
            }
            Opcode::PushData2 => {
                out.extend_from_slice(&(self.data.len() as u16).to_le_bytes());
                out.extend_from_slice(&self.data);
            }
            Opcode::PushData4 => {
                out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
                out.extend_from_slice(&self.data);
            }
            _ => {}
        }
    }

    /// Serialized length in bytes of this operation.
    pub fn serialized_size(&self) -> usize {
        let mut buf = Vec::new();
        self.to_data(&mut buf);
        buf.len()
    }
}

impl std::fmt::Display for Operation {
    /// Two mnemonic display classes distinguish a minimally-encoded push
    /// from one that is not: `[N.hex]` when non-minimal (`N` is the
    /// nominal byte length), plain `[hex]` when minimal. Non-push opcodes
    /// display as their bare mnemonic.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.underflow {
            return write!(f, "<{}>", crate::hex::encode(&self.data));
        }
        if !self.code.is_push() {
            return write!(f, "{}", self.code);
        }
        let hex = crate::hex::encode(&self.data);
        if self.is_minimal_push() {
            write!(f, "[{hex}]")
        } else {
            write!(f, "[{}.{hex}]", self.data.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_push_selects_op_n() {
        let op = Operation::from_data(vec![5]);
        assert_eq!(op.code(), Opcode::from_byte(0x55));
        assert!(op.is_minimal_push());
    }

    #[test]
    fn minimal_push_selects_op_1negate() {
        let op = Operation::from_data(vec![0x81]);
        assert_eq!(op.code(), Opcode::Op1Negate);
    }

    #[test]
    fn empty_data_selects_op_0() {
        let op = Operation::from_data(vec![]);
        assert_eq!(op.code(), Opcode::Op0);
    }

    #[test]
    fn round_trips_direct_push() {
        let op = Operation::from_data(vec![1, 2, 3, 4]);
        let mut buf = Vec::new();
        op.to_data(&mut buf);
        let mut reader = Reader::new(&buf);
        let parsed = Operation::read(&mut reader);
        assert_eq!(parsed, op);
        assert!(!parsed.is_underflow());
    }

    #[test]
    fn non_minimal_push_display() {
        // A direct push opcode carrying a single in-range byte is
        // non-minimal (should have used OP_1..OP_16 or OP_1NEGATE).
        let op = Operation {
            code: Opcode::PushBytes(1),
            data: vec![5],
            underflow: false,
        };
        assert!(!op.is_minimal_push());
        assert_eq!(format!("{op}"), "[1.05]");
    }

    #[test]
    fn truncated_pushdata_length_is_underflow() {
        let buf = [Opcode::PushData2.to_byte(), 0x01];
        let mut reader = Reader::new(&buf);
        let op = Operation::read(&mut reader);
        assert!(op.is_underflow());
        let mut out = Vec::new();
        op.to_data(&mut out);
        assert_eq!(out, buf.to_vec());
    }

    #[test]
    fn truncated_payload_is_underflow() {
        // OP_PUSHBYTES(4) declares 4 bytes but only 2 follow.
        let buf = [0x04, 0x02, 0xff];
        let mut reader = Reader::new(&buf);
        let op = Operation::read(&mut reader);
        assert!(op.is_underflow());
        let mut out = Vec::new();
        op.to_data(&mut out);
        assert_eq!(out, buf.to_vec());
        assert_eq!(format!("{op}"), "<0402ff>");
    }

    #[test]
    fn boundary_truncated_push_displays_as_raw_hex() {
        // "02 ff": OP_PUSHBYTES(2) declares 2 bytes but only 1 follows.
        let buf = [0x02, 0xff];
        let mut reader = Reader::new(&buf);
        let op = Operation::read(&mut reader);
        assert!(op.is_underflow());
        assert_eq!(format!("{op}"), "<02ff>");
        let mut out = Vec::new();
        op.to_data(&mut out);
        assert_eq!(out, buf.to_vec());
    }
}
