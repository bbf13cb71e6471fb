//! Outpoint (spec.md §3, "Outpoint (Point)"): the 32-byte previous
//! transaction hash plus a 32-bit output index that together identify a
//! spent UTXO.

use crate::ser::Reader;

/// A reference to a previous transaction's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    hash: [u8; 32],
    index: u32,
}

impl Point {
    /// The index value reserved to mark a coinbase's (non-)reference.
    pub const NULL_INDEX: u32 = u32::MAX;

    /// Builds a point from its raw hash and index.
    pub fn new(hash: [u8; 32], index: u32) -> Self {
        Point { hash, index }
    }

    /// The all-zero-hash, max-index point used by a coinbase input.
    pub fn null() -> Self {
        Point {
            hash: [0u8; 32],
            index: Self::NULL_INDEX,
        }
    }

    /// Whether this is the null point (all-zero hash, max index).
    pub fn is_null(&self) -> bool {
        self.hash == [0u8; 32] && self.index == Self::NULL_INDEX
    }

    /// The referenced transaction's identity hash.
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    /// The referenced output's index within that transaction.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Parses a point: 32 raw hash bytes followed by a little-endian index.
    pub fn read(reader: &mut Reader<'_>) -> Point {
        let hash = match reader.read_bytes(32) {
            Some(b) => {
                let mut h = [0u8; 32];
                h.copy_from_slice(b);
                h
            }
            None => [0u8; 32],
        };
        let index = reader.read_u32_le();
        Point { hash, index }
    }

    /// Serializes this point: 32 raw hash bytes then the little-endian index.
    pub fn to_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.hash);
        out.extend_from_slice(&self.index.to_le_bytes());
    }

    /// Serialized size in bytes, always 36.
    pub fn serialized_size(&self) -> usize {
        36
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_point_is_recognised() {
        assert!(Point::null().is_null());
        assert!(!Point::new([1u8; 32], 0).is_null());
        assert!(!Point::new([0u8; 32], 0).is_null());
    }

    #[test]
    fn round_trips_serialization() {
        let point = Point::new([7u8; 32], 42);
        let mut buf = Vec::new();
        point.to_data(&mut buf);
        assert_eq!(buf.len(), point.serialized_size());
        let mut reader = Reader::new(&buf);
        let parsed = Point::read(&mut reader);
        assert_eq!(parsed, point);
    }
}
