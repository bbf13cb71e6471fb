//! Consensus constants fixed by the protocol (spec.md §6).
//!
//! These are compile-time values; none are configurable per spec.md's
//! "Global state" design note.

/// Maximum serialized size of a script, in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum size of a single pushed data element, in bytes.
pub const MAX_PUSH_DATA_SIZE: usize = 520;

/// Maximum combined size of primary + alt stack.
pub const MAX_STACK_SIZE: usize = 1_000;

/// Maximum number of counted operations per script (push opcodes excluded).
pub const MAX_OPERATION_COUNT: usize = 201;

/// Maximum public keys in a bare `checkmultisig` script.
pub const MAX_SCRIPT_PUBLIC_KEYS: usize = 20;

/// Maximum serialized block size, in bytes.
pub const MAX_BLOCK_SIZE: usize = 1_000_000;

/// Maximum block weight (bip141).
pub const MAX_BLOCK_WEIGHT: usize = 4_000_000;

/// Maximum sigops per block, pre-bip141.
pub const MAX_BLOCK_SIGOPS: usize = 20_000;

/// Maximum sigops per block, post-bip141 (the "fast" / weighted limit).
pub const MAX_FAST_SIGOPS: usize = 80_000;

/// Blocks a coinbase output must mature before it may be spent.
pub const COINBASE_MATURITY: usize = 100;

/// Locktime/sequence values below this denote a block height; at or above,
/// a Unix timestamp.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Minimum transaction version at which BIP68 relative locktime applies.
pub const RELATIVE_LOCKTIME_MIN_VERSION: i32 = 2;

/// Bit position that disables BIP68/BIP112 relative-locktime interpretation.
pub const RELATIVE_LOCKTIME_DISABLED_BIT: u32 = 31;

/// Bit position distinguishing time-based from height-based relative locks.
pub const RELATIVE_LOCKTIME_TIME_LOCKED_BIT: u32 = 22;

/// Bit width of the relevant low bits of a relative locktime/sequence value.
pub const RELATIVE_LOCKTIME_MASK_LEFT: u32 = 16;

/// Minimum size of a coinbase input script, in bytes.
pub const MIN_COINBASE_SIZE: usize = 2;

/// Maximum size of a coinbase input script, in bytes.
pub const MAX_COINBASE_SIZE: usize = 100;

/// First byte of the BIP144 segwit marker pair (`marker`).
pub const WITNESS_MARKER: u8 = 0x00;

/// Second byte of the BIP144 segwit marker pair (`flag`).
pub const WITNESS_ENABLED: u8 = 0x01;

/// Minimum byte length of a witness program (bip141).
pub const MIN_WITNESS_PROGRAM: usize = 2;

/// Maximum byte length of a witness program (bip141).
pub const MAX_WITNESS_PROGRAM: usize = 40;

/// Weight multiplier applied to the legacy (non-witness) serialized size.
pub const BASE_SIZE_CONTRIBUTION: usize = 3;

/// Weight multiplier applied to the full (segwit) serialized size.
pub const TOTAL_SIZE_CONTRIBUTION: usize = 1;

/// Default sigops charged per `checkmultisig` when no preceding minimal push
/// gives an accurate count (non-accurate counting mode).
pub const MULTISIG_DEFAULT_SIGOPS: usize = 20;

/// Maximum encoded length, in bytes, of the `checklocktimeverify` comparand.
pub const MAX_CHECK_LOCKTIME_VERIFY_NUMBER_SIZE: usize = 5;

/// Maximum encoded length, in bytes, of the `checksequenceverify` comparand.
pub const MAX_CHECK_SEQUENCE_VERIFY_NUMBER_SIZE: usize = 5;

/// Maximum encoded length, in bytes, of an ordinary script number operand.
pub const MAX_NUMBER_SIZE: usize = 4;

/// Fixed 4-byte header prefixing a bip141 witness commitment push.
pub const WITNESS_COMMITMENT_HEADER: [u8; 4] = [0xaa, 0x21, 0xa9, 0xed];

/// Maximum payload size accepted by the pay-null-data (`OP_RETURN`) pattern.
pub const MAX_NULL_DATA_SIZE: usize = 80;

/// Size in bytes of a `hash160` short hash (P2PKH / P2WPKH program).
pub const SHORT_HASH_SIZE: usize = 20;

/// Size in bytes of a sha256/double-sha256 digest (P2WSH program, txid).
pub const HASH_SIZE: usize = 32;
