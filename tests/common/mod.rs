//! Shared fixtures for integration tests: a structurally valid (strict-DER)
//! fake signature endorsement, since the machine's DER-shape check runs
//! unconditionally in stub signature-verification mode and most pipeline
//! tests care about script/transaction plumbing, not real cryptography.

/// A syntactically valid low-S DER signature (70 bytes) plus a trailing
/// `SIGHASH_ALL` type byte, accepted by `is_strict_der` and, absent the
/// `secp256k1` feature, by stub signature verification.
pub fn fake_signature() -> Vec<u8> {
    let mut der = Vec::with_capacity(70);
    der.push(0x30); // sequence
    der.push(68); // total length - 2
    der.push(0x02); // integer tag (r)
    der.push(32); // len_r
    der.extend(std::iter::repeat(0x11u8).take(32)); // r, high bit clear
    der.push(0x02); // integer tag (s)
    der.push(32); // len_s
    der.extend(std::iter::repeat(0x22u8).take(32)); // s, high bit clear

    let mut endorsement = der;
    endorsement.push(0x01); // SIGHASH_ALL
    endorsement
}
