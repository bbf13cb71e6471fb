//! The byte reader/writer contract (spec.md §6, "Byte reader/writer
//! contract").
//!
//! Grounded in two sources: the compact-size (varint) codec and
//! `std::io::Read`/`std::io::Write`-based shape come from `coins-core`'s
//! `ser.rs` (`examples/summa-tx-coins/core/src/ser.rs`); the never-panics,
//! sticky-invalid-flag reading discipline comes from how libbitcoin-system's
//! `chain::*::from_data(reader)` constructors consume a reader that tracks
//! its own validity rather than returning a `Result` from every field read.
//! A malformed wire object becomes a structurally-default, invalid value
//! instead of an early return, matching this crate's error model
//! ([`crate::error::TxError`]): deserialization failures surface as ordinary
//! structural failures once a later stage inspects the result.

use std::io::{self, Read, Write};

/// A forward-only byte cursor that never panics and never short-circuits.
///
/// Once a read runs past the end of the underlying buffer, `valid` latches
/// to `false` and every subsequent read returns a zeroed/empty default
/// rather than erroring. Callers check [`Reader::is_valid`] after
/// deserializing a structure, the same discipline `chain::script::from_data`
/// and its siblings use in libbitcoin-system.
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    valid: bool,
}

impl<'a> Reader<'a> {
    /// Wraps `data` for sequential reading from the start.
    pub fn new(data: &'a [u8]) -> Self {
        Reader {
            data,
            position: 0,
            valid: true,
        }
    }

    /// Whether every read so far has stayed within bounds.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Bytes remaining between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// The cursor's current byte offset into the underlying buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The raw bytes from `start` to the end of the underlying buffer,
    /// regardless of the reader's validity — used to recover an operation's
    /// undigested tail when a push declares more payload than the script
    /// actually has (spec.md §3, "underflow").
    pub fn tail_from(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.data.len())..]
    }

    /// Marks the reader invalid without consuming anything; used when a
    /// caller detects a semantic problem (e.g. an oversized declared
    /// length) that a raw byte count alone would not catch.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Reads exactly one byte, or `0` and latches invalid on underrun.
    pub fn read_u8(&mut self) -> u8 {
        match self.read_bytes(1) {
            Some(b) => b[0],
            None => 0,
        }
    }

    /// Reads a little-endian `u32`, or `0` and latches invalid on underrun.
    pub fn read_u32_le(&mut self) -> u32 {
        match self.read_bytes(4) {
            Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => 0,
        }
    }

    /// Reads a little-endian `i32`, or `0` and latches invalid on underrun.
    pub fn read_i32_le(&mut self) -> i32 {
        self.read_u32_le() as i32
    }

    /// Reads a little-endian `u64`, or `0` and latches invalid on underrun.
    pub fn read_u64_le(&mut self) -> u64 {
        match self.read_bytes(8) {
            Some(b) => u64::from_le_bytes([
                b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
            ]),
            None => 0,
        }
    }

    /// Reads `len` raw bytes, returning `None` (and latching invalid) if
    /// fewer than `len` remain.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if !self.valid || self.remaining() < len {
            self.valid = false;
            return None;
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Some(slice)
    }

    /// Reads a Bitcoin-style compact-size integer. A non-minimal encoding
    /// (e.g. `0xfd` followed by a value that fits in one byte) latches the
    /// reader invalid, matching the consensus rule that compact sizes must
    /// use their shortest form.
    pub fn read_compact_size(&mut self) -> u64 {
        let prefix = self.read_u8();
        if !self.valid {
            return 0;
        }
        let (value, minimal_threshold) = match prefix {
            0..=0xfc => (prefix as u64, 0),
            0xfd => {
                let b = self.read_bytes(2);
                match b {
                    Some(b) => (u16::from_le_bytes([b[0], b[1]]) as u64, 0xfd),
                    None => return 0,
                }
            }
            0xfe => {
                let b = self.read_bytes(4);
                match b {
                    Some(b) => (
                        u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u64,
                        0x1_0000,
                    ),
                    None => return 0,
                }
            }
            0xff => {
                let b = self.read_bytes(8);
                match b {
                    Some(b) => (
                        u64::from_le_bytes([
                            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
                        ]),
                        0x1_0000_0000,
                    ),
                    None => return 0,
                }
            }
        };
        if minimal_threshold != 0 && value < minimal_threshold {
            self.valid = false;
            return 0;
        }
        value
    }

    /// Reads a compact-size length followed by that many raw bytes.
    pub fn read_compact_bytes(&mut self) -> Vec<u8> {
        let len = self.read_compact_size();
        match usize::try_from(len) {
            Ok(len) => self.read_bytes(len).map(|b| b.to_vec()).unwrap_or_default(),
            Err(_) => {
                self.valid = false;
                Vec::new()
            }
        }
    }
}

/// Returns the serialized length, in bytes, of `value` as a compact-size
/// integer (spec.md's "Byte reader/writer contract").
pub fn compact_size_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Writes `value` as a Bitcoin-style compact-size integer.
pub fn write_compact_size<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    match compact_size_len(value) {
        1 => writer.write_all(&[value as u8]),
        3 => {
            writer.write_all(&[0xfd])?;
            writer.write_all(&(value as u16).to_le_bytes())
        }
        5 => {
            writer.write_all(&[0xfe])?;
            writer.write_all(&(value as u32).to_le_bytes())
        }
        _ => {
            writer.write_all(&[0xff])?;
            writer.write_all(&value.to_le_bytes())
        }
    }
}

/// Writes `bytes` prefixed by its compact-size length.
pub fn write_compact_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    write_compact_size(writer, bytes.len() as u64)?;
    writer.write_all(bytes)
}

/// Reads all remaining bytes from a `std::io::Read` into a `Reader`-ready
/// buffer; used by callers that hold a generic reader (file, socket) rather
/// than an in-memory slice.
pub fn slurp<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_primitives_in_order() {
        let data = [0x2a, 0x01, 0x00, 0x00, 0x00];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_u8(), 0x2a);
        assert_eq!(r.read_u32_le(), 1);
        assert!(r.is_valid());
    }

    #[test]
    fn underrun_latches_invalid() {
        let data = [0x01, 0x02];
        let mut r = Reader::new(&data);
        let _ = r.read_u32_le();
        assert!(!r.is_valid());
    }

    #[test]
    fn compact_size_round_trips_each_width() {
        for value in [0u64, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, 0x1_0000_0000] {
            let mut buf = Vec::new();
            write_compact_size(&mut buf, value).unwrap();
            assert_eq!(buf.len(), compact_size_len(value));
            let mut r = Reader::new(&buf);
            assert_eq!(r.read_compact_size(), value);
            assert!(r.is_valid());
        }
    }

    #[test]
    fn non_minimal_compact_size_is_invalid() {
        // 0xfd prefix followed by a value that fits in one byte (0x0001).
        let data = [0xfd, 0x01, 0x00];
        let mut r = Reader::new(&data);
        let _ = r.read_compact_size();
        assert!(!r.is_valid());
    }

    #[test]
    fn compact_bytes_round_trip() {
        let payload = vec![1u8, 2, 3, 4, 5];
        let mut buf = Vec::new();
        write_compact_bytes(&mut buf, &payload).unwrap();
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_compact_bytes(), payload);
    }
}
