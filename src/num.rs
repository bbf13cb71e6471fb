//! Script numbers (spec.md §4.2, "Number & Endianness").
//!
//! Bitcoin Script numbers are signed little-endian sign-magnitude integers:
//! the high bit of the last byte is the sign, magnitude otherwise plain
//! little-endian. Minimal encoding drops trailing zero bytes unless doing so
//! would flip the sign bit of the remaining top byte, in which case one
//! zero/`0x80` byte is kept. Grounded in libbitcoin-system's
//! `machine/number.cpp` semantics as described by spec.md §4.2 and exercised
//! throughout `interpreter.cpp`'s arithmetic opcodes.

/// A decoded script number, always representable as an `i64` (consensus
/// scripts never produce a magnitude requiring more than 4 encoded bytes on
/// the read side, and arithmetic results that would overflow that are
/// rejected by the caller before re-encoding).
pub type ScriptNumber = i64;

/// Decodes `bytes` as a script number.
///
/// `max_size` bounds the encoded length accepted: ordinary arithmetic
/// opcodes use [`crate::constants::MAX_NUMBER_SIZE`] (4), while
/// `checklocktimeverify`/`checksequenceverify` accept up to 5 bytes per
/// BIP65/BIP112. Returns `None` if `bytes` is longer than `max_size`, or if
/// `minimal` is set and the encoding carries a dropped trailing zero.
pub fn decode(bytes: &[u8], max_size: usize, minimal: bool) -> Option<ScriptNumber> {
    if bytes.len() > max_size {
        return None;
    }
    if bytes.is_empty() {
        return Some(0);
    }
    if minimal {
        let last = bytes[bytes.len() - 1];
        if last & 0x7f == 0 {
            // The top byte carries no magnitude; it's only valid if the
            // second-to-top byte's high bit is set (meaning the zero byte
            // was load-bearing to keep the *previous* byte from being
            // misread as a sign bit).
            if bytes.len() <= 1 || bytes[bytes.len() - 2] & 0x80 == 0 {
                return None;
            }
        }
    }

    let mut magnitude: i64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        magnitude |= (byte as i64) << (8 * i);
    }

    let sign_bit_index = 8 * (bytes.len() - 1) + 7;
    let negative = magnitude & (1i64 << sign_bit_index) != 0;
    let magnitude = magnitude & !(1i64 << sign_bit_index);

    Some(if negative { -magnitude } else { magnitude })
}

/// Encodes `value` as a minimally-sized sign-magnitude little-endian script
/// number. Every encoder output is minimal; only decoding distinguishes
/// minimal from non-minimal input.
pub fn encode(value: ScriptNumber) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();

    let mut bytes = Vec::new();
    while magnitude > 0 {
        bytes.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    let top = bytes[bytes.len() - 1];
    if top & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        let last = bytes.len() - 1;
        bytes[last] |= 0x80;
    }

    bytes
}

/// Truth-value coercion used by conditional and logical opcodes: a byte
/// string is "true" unless every byte is zero, except that a lone trailing
/// `0x80` (negative zero) is also falsy.
pub fn is_true(bytes: &[u8]) -> bool {
    for (i, &byte) in bytes.iter().enumerate() {
        if byte != 0 {
            if i == bytes.len() - 1 && byte == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_encodes_empty() {
        assert_eq!(encode(0), Vec::<u8>::new());
        assert_eq!(decode(&[], 4, true), Some(0));
    }

    #[test]
    fn positive_and_negative_round_trip() {
        for value in [1i64, 127, 128, 255, 256, 32767, 32768, -1, -127, -128, -32768] {
            let bytes = encode(value);
            assert_eq!(decode(&bytes, 4, true), Some(value), "value={value}");
        }
    }

    #[test]
    fn rejects_oversized_encoding() {
        let bytes = encode(0x1_0000_0000);
        assert!(decode(&bytes, 4, true).is_none());
    }

    #[test]
    fn non_minimal_encoding_rejected_when_minimal_required() {
        // 0x00 0x80 decodes as -0 under lax rules but carries a redundant
        // leading zero relative to a bare 0x80 (which would itself parse as
        // negative zero, i.e. value 0) — not minimal.
        let non_minimal = vec![0x00, 0x80];
        assert!(decode(&non_minimal, 4, true).is_none());
        assert!(decode(&non_minimal, 4, false).is_some());
    }

    #[test]
    fn is_true_rejects_negative_zero() {
        assert!(!is_true(&[]));
        assert!(!is_true(&[0x00]));
        assert!(!is_true(&[0x00, 0x00, 0x80]));
        assert!(is_true(&[0x01]));
        assert!(is_true(&[0x00, 0x01]));
    }
}
