//! Error taxonomy (spec.md §7).
//!
//! The taxonomy partitions into structural and contextual consensus
//! failures, script machine failures, and script verification verdicts.
//! Deserialization failures do not get their own variant set: a reader that
//! runs out of bytes sets an invalidity flag (see [`crate::ser::Reader`])
//! rather than returning early, so a malformed wire object surfaces as an
//! ordinary structural failure once a later stage inspects it, the same
//! shape `transaction.cpp` uses throughout libbitcoin-system.

use thiserror::Error;

/// A script-machine failure, one variant per distinct `op_*` failure family
/// in `interpreter.cpp`. Several opcodes return more than one failure mode
/// (`op_check_sig_verify1`..`op_check_sig_verify5`); those keep a `stage`
/// number rather than getting one variant per return site, so the enum
/// doesn't balloon into hundreds of near-duplicate members while test code
/// can still tell failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OpError {
    /// Stack did not have enough elements for the opcode's arity.
    #[error("stack underflow")]
    StackUnderflow,
    /// `if`/`notif` popped an empty stack.
    #[error("conditional opcode popped an empty stack")]
    EmptyConditional,
    /// `else`/`endif` had no enclosing open conditional.
    #[error("unbalanced conditional scope")]
    UnbalancedConditional,
    /// `verify`/`*verify` popped a falsy value.
    #[error("verify failed")]
    VerifyFailed,
    /// `pick`/`roll` index was out of range or non-minimally encoded.
    #[error("invalid stack index")]
    InvalidStackIndex,
    /// Arithmetic operand could not be decoded as a script number, or the
    /// result overflowed the permitted encoded width.
    #[error("invalid numeric operand")]
    InvalidNumber,
    /// `checksig`/`checksigverify` endorsement or key failed to parse.
    #[error("signature check parse failure, stage {0}")]
    CheckSigParse(u8),
    /// `checksig`/`checksigverify` signature did not verify.
    #[error("signature check failed")]
    CheckSigFailed,
    /// `checkmultisig`/`checkmultisigverify` structural failure, numbered as
    /// in `op_check_multisig_verify1`..`op_check_multisig_verify9`.
    #[error("multisig check failed, stage {0}")]
    CheckMultisig(u8),
    /// `checklocktimeverify` failure, numbered as in the C++ source.
    #[error("checklocktimeverify failed, stage {0}")]
    CheckLockTimeVerify(u8),
    /// `checksequenceverify` failure, numbered as in the C++ source.
    #[error("checksequenceverify failed, stage {0}")]
    CheckSequenceVerify(u8),
    /// An opcode disabled unconditionally (`cat`, `substr`, ...) and reached
    /// even though its enclosing conditional is false, since the disabled
    /// set is fatal regardless of conditional scope.
    #[error("disabled opcode")]
    Invalid,
    /// An opcode reserved under the currently active forks.
    #[error("reserved opcode")]
    Reserved,
    /// An opcode this engine recognises structurally but does not evaluate
    /// (taproot opcodes beyond hash-type validation).
    #[error("opcode not implemented")]
    NotImplemented,
}

/// Top-level script machine verdict or failure (spec.md §7 items 4 and 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Script exceeds [`crate::constants::MAX_SCRIPT_SIZE`] before
    /// execution begins.
    #[error("script exceeds maximum size")]
    InvalidScript,
    /// A push operation's payload exceeds
    /// [`crate::constants::MAX_PUSH_DATA_SIZE`].
    #[error("push data exceeds maximum size")]
    InvalidPushDataSize,
    /// More than [`crate::constants::MAX_OPERATION_COUNT`] counted opcodes
    /// executed.
    #[error("operation count exceeds limit")]
    InvalidOperationCount,
    /// Combined primary + alt stack size exceeded
    /// [`crate::constants::MAX_STACK_SIZE`].
    #[error("stack size exceeds limit")]
    InvalidStackSize,
    /// The conditional scope stack was non-empty at end of script (an
    /// unclosed `if`).
    #[error("unbalanced conditional scope at end of script")]
    InvalidStackScope,
    /// A specific opcode's evaluation failed; see [`OpError`].
    #[error("operation failed: {0}")]
    Op(#[from] OpError),
    /// Execution completed but the final stack top is falsy or empty.
    #[error("final stack is false")]
    StackFalse,
    /// Witness structure did not match its committed program (bad P2WPKH
    /// arity, bad P2WSH commitment, undefined v0 program length).
    #[error("invalid witness")]
    InvalidWitness,
    /// A witness program version this crate does not evaluate.
    #[error("unversioned script")]
    UnversionedScript,
}

/// Structural and contextual consensus failures (spec.md §7 items 2 and 3),
/// plus mempool-policy guard failures (spec.md §4.9 "Guards").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TxError {
    /// No inputs or no outputs.
    #[error("empty transaction")]
    EmptyTransaction,
    /// Coinbase input script length outside
    /// `[MIN_COINBASE_SIZE, MAX_COINBASE_SIZE]`.
    #[error("invalid coinbase script size")]
    InvalidCoinbaseScriptSize,
    /// A non-coinbase transaction has a null-outpoint input.
    #[error("previous output is null")]
    PreviousOutputNull,
    /// Two or more inputs reference the same outpoint within this
    /// transaction.
    #[error("internal double spend")]
    InternalDoubleSpend,
    /// Legacy-serialized size exceeds [`crate::constants::MAX_BLOCK_SIZE`].
    #[error("transaction exceeds size limit")]
    SizeLimit,
    /// Transaction carries witness data but bip141 is not active.
    #[error("unexpected witness transaction")]
    UnexpectedWitnessTransaction,
    /// [`crate::transaction::Transaction::weight`] exceeds
    /// [`crate::constants::MAX_BLOCK_WEIGHT`] (bip141 only).
    #[error("transaction exceeds weight limit")]
    WeightLimit,
    /// A referenced previous output was not supplied by the caller.
    #[error("missing previous output")]
    MissingPreviousOutput,
    /// Sigop count exceeds the fork-dependent limit.
    #[error("transaction exceeds sigop limit")]
    SigopLimit,
    /// A coinbase transaction submitted to a pool guard that forbids it.
    #[error("coinbase transaction not allowed here")]
    CoinbaseTransaction,
    /// Locktime not yet reached (absolute locktime, possibly MTP-gated).
    #[error("transaction is non-final")]
    NonFinal,
    /// Sum of input values is less than sum of output values.
    #[error("spend exceeds input value")]
    SpendExceedsValue,
    /// A coinbase-produced prevout has not yet matured.
    #[error("coinbase maturity not reached")]
    CoinbaseMaturity,
    /// BIP68 relative locktime not yet satisfied.
    #[error("relative time locked")]
    RelativeTimeLocked,
    /// A prevout's confirming block has not been processed by the caller.
    #[error("unconfirmed spend")]
    UnconfirmedSpend,
    /// A prevout already recorded as spent at or before this height.
    #[error("confirmed double spend")]
    ConfirmedDoubleSpend,
    /// Script evaluation for one input failed; see [`ScriptError`].
    #[error("script verification failed: {0}")]
    Script(#[from] ScriptError),
}
