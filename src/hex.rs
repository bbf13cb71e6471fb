//! Hand-rolled hex codec for this crate's own mnemonic/display formatting
//! (kept from the teacher, since it is trivial and already crate-owned).
//! Test fixtures and the `demos/` binaries use the `hex` crate instead,
//! matching the rest of the pack's convention of not re-deriving a codec
//! that is already in the ecosystem dependency graph.

/// Encodes `bytes` as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        s.push_str(&format!("{byte:02x}"));
    }
    s
}

/// Decodes a hexadecimal string into a byte vector.
///
/// Accepts both uppercase and lowercase hex digits. Does not accept a `0x`
/// prefix — callers must strip it if present. Returns `None` on an odd
/// length or a non-hex character.
pub fn decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let pair = &hex[i..i + 2];
        let byte = u8::from_str_radix(pair, 16).ok()?;
        bytes.push(byte);
    }
    Some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string() {
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn single_byte() {
        assert_eq!(decode("00").unwrap(), vec![0x00]);
        assert_eq!(decode("ff").unwrap(), vec![0xff]);
        assert_eq!(encode(&[0xff]), "ff");
    }

    #[test]
    fn mixed_case() {
        assert_eq!(decode("FF").unwrap(), vec![0xff]);
        assert_eq!(decode("aAbB").unwrap(), vec![0xaa, 0xbb]);
    }

    #[test]
    fn multi_byte_round_trip() {
        let bytes = vec![0xde, 0xad, 0xbe, 0xef];
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn odd_length_is_none() {
        assert_eq!(decode("0"), None);
        assert_eq!(decode("abc"), None);
    }

    #[test]
    fn invalid_characters_are_none() {
        assert_eq!(decode("gg"), None);
        assert_eq!(decode("0x00"), None);
    }
}
