//! The Hash Kernel (spec.md §4.1).
//!
//! Bitcoin's consensus rules pin their hash functions to specific
//! algorithms and output widths; this module implements them natively from
//! their defining standards (FIPS 180-4 for the SHA family, the RIPEMD
//! reference specification) rather than wrapping an external crate, since
//! the Hash Kernel is itself a named component of this specification and not
//! an ambient concern (see `DESIGN.md` for the corresponding dependency
//! note). Test vectors are cross-checked against
//! `examples/original_source/test/hash/*/algorithm.cpp`.

pub mod hmac;
pub mod merkle;
pub mod ripemd;
pub mod sha1;
pub mod sha256;
pub mod sha512;

pub use hmac::hmac_sha512;
pub use merkle::merkle_root;
pub use ripemd::{ripemd128, ripemd160};
pub use sha1::sha1;
pub use sha256::sha256;
pub use sha512::sha512;

/// `RIPEMD160(SHA256(data))`, the short (20-byte) public-key/script hash
/// used throughout P2PKH, P2SH, and P2WPKH/P2WSH programs.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// `SHA256(SHA256(data))`, used for txids, wtxids, merkle nodes, and
/// sighash preimages.
pub fn bitcoin_hash(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}
