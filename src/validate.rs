//! Validation Pipeline (spec.md §4.9): the staged check/accept/connect
//! predicates that compose a transaction's context-free structure checks,
//! its contextual acceptance checks, and per-input script evaluation into
//! one consensus verdict, stopping at the first failure.
//!
//! `Transaction::check`/`accept`/`guard`/`guard_context` already hold the
//! structural and contextual predicates (spec.md §4.9's "Check", "Accept",
//! "Guards" stages); this module adds the missing "Connect" stage — running
//! the script machine over each non-coinbase input's (script, referenced
//! output) pair — and the orchestration that sequences every stage, mirrored
//! on `transaction.cpp`'s `check`/`accept`/`connect_input` call chain in
//! a full node's block-validation path.

use crate::error::TxError;
use crate::machine::verify_input;
use crate::transaction::{Transaction, ValidationContext};

/// Runs the script machine over every non-coinbase input, returning the
/// first script failure. Coinbase inputs carry no spendable previous
/// output and are skipped, matching spec.md §4.9's "Connect" scope.
///
/// Requires that `accept` has already confirmed every non-coinbase input
/// carries previous-output metadata; a missing metadata record here is
/// treated as a validation-pipeline ordering bug rather than re-diagnosed,
/// and surfaces as [`crate::error::ScriptError::InvalidScript`].
fn connect(tx: &Transaction, context: &ValidationContext) -> Result<(), TxError> {
    if tx.is_coinbase() {
        return Ok(());
    }

    for (index, input) in tx.inputs().iter().enumerate() {
        let metadata = match input.metadata() {
            Some(metadata) => metadata,
            None => return Err(TxError::MissingPreviousOutput),
        };
        verify_input(
            tx,
            index,
            context.forks,
            metadata.output.script(),
            metadata.output.value().max(0) as u64,
        )?;
    }

    Ok(())
}

/// Full consensus validation of `tx` under `context`: check, accept, then
/// connect, in that order — each stage presupposes the ones before it
/// (spec.md §4.9, "ordering matters"). Does not run the mempool-policy
/// guards; callers relaying or mining use [`guard`]/[`guard_context`]
/// ahead of or alongside this for that purpose.
pub fn validate(tx: &Transaction, context: &ValidationContext) -> Result<(), TxError> {
    tx.check()?;
    tx.accept(context)?;
    connect(tx, context)
}

/// Context-free mempool-policy guard, delegating to
/// [`Transaction::guard`]. Exposed here so callers can reach every
/// validation stage — consensus and policy — through one module.
pub fn guard(tx: &Transaction) -> Result<(), TxError> {
    tx.guard()
}

/// Contextual mempool-policy guard, delegating to
/// [`Transaction::guard_context`].
pub fn guard_context(tx: &Transaction, context: &ValidationContext) -> Result<(), TxError> {
    tx.guard_context(context)
}
