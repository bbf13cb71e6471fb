//! Consensus-critical Bitcoin transaction, script, and signature-hashing
//! primitives.
//!
//! This crate reconstructs the data model and staged validation pipeline a
//! full node runs before accepting a transaction: structural checks,
//! contextual checks against chain state, and script evaluation — plus the
//! byte-exact serialization, hashing, and signature-hash machinery those
//! stages depend on.
//!
//! # Consensus warning
//!
//! **This crate is NOT consensus-compatible with Bitcoin Core.**
//!
//! A reimplementation of Bitcoin's transaction and script rules cannot
//! guarantee identical behavior to Bitcoin Core's C++ implementation across
//! every edge case — number encoding boundaries, error ordering, stack
//! overflow semantics, and other subtle behaviors that define Bitcoin's
//! consensus rules. Taproot/tapscript execution, BIP32/39 key derivation,
//! address encodings, and the peer-to-peer wire protocol are out of scope
//! entirely (see [`validate`] for what is in scope).
//!
//! **Do not use this crate to validate real transactions or protect real
//! funds.**
//!
//! # What this crate implements
//!
//! - **Hash kernel** ([`hash`]): SHA-1/256/512, RIPEMD-128/160, HMAC-SHA512,
//!   and the double-SHA-256 Merkle fold, each built from scratch against its
//!   reference specification.
//! - **Script numbers and byte codecs** ([`num`], [`ser`]): sign-magnitude
//!   script-number encoding and a never-panicking compact-size reader/writer.
//! - **Opcodes and operations** ([`opcode`], [`operation`]): the full opcode
//!   table and a single parsed (opcode, payload) pair, including underflow
//!   recovery for truncated scripts.
//! - **Script** ([`script`]): an ordered operation sequence with the
//!   standard output/input pattern classifiers and sigop counting.
//! - **Witness** ([`witness`]): the segwit stack and v0 program extraction
//!   for P2WPKH/P2WSH.
//! - **Transaction model** ([`point`], [`txin`], [`txout`],
//!   [`transaction`]): outpoints, inputs, outputs, and the legacy/BIP144
//!   transaction container, with txid/wtxid and weight.
//! - **Signature hashing** ([`sighash`]): the legacy and BIP143 preimage
//!   builders, sighash-flag masking, and a midstate cache for BIP143.
//! - **Script machine** ([`machine`]): the stack-based interpreter that
//!   evaluates a script under a set of active soft-fork rules.
//! - **Validation pipeline** ([`validate`]): check/accept/connect staged
//!   consensus predicates, plus mempool-policy guards.
//!
//! # Feature flags
//!
//! | Feature     | Description                                               |
//! |-------------|------------------------------------------------------------|
//! | `hex`       | Enables `hex`-crate-backed test fixtures and the `demos`   |
//! |             | examples; default.                                         |
//! | `secp256k1` | Enables real ECDSA signature verification for              |
//! |             | `checksig`/`checkmultisig` via the `secp256k1` crate. Absent|
//! |             | this feature, signature checks accept any syntactically    |
//! |             | valid DER signature and public key — useful for exercising  |
//! |             | script logic without real keys, but not consensus-accurate. |
//!
//! # Quick example
//!
//! ```rust
//! use bitcoin_consensus_core::opcode::Opcode;
//! use bitcoin_consensus_core::operation::Operation;
//! use bitcoin_consensus_core::script::Script;
//!
//! let script = Script::from_ops(vec![
//!     Operation::from_data(vec![1]),
//!     Operation::from_data(vec![1]),
//!     Operation::new(Opcode::Equal),
//! ]);
//! assert!(script.is_valid());
//! ```

pub mod constants;
pub mod error;
pub mod forks;
pub mod hash;
pub mod hex;
pub mod machine;
pub mod num;
pub mod opcode;
pub mod operation;
pub mod point;
pub mod script;
pub mod ser;
pub mod sighash;
pub mod transaction;
pub mod txin;
pub mod txout;
pub mod validate;
pub mod witness;
