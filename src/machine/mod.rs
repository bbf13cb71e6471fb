//! The Script Machine (spec.md §4.8): a stack-based evaluator for one
//! script, plus the three-tier composition (legacy, P2SH, witness v0) that
//! decides whether an input satisfies the output it spends (spec.md §4.9,
//! "Script verification").
//!
//! The per-operation evaluation loop and nearly every opcode's exact
//! semantics are grounded in `interpreter.cpp`'s `interpreter::run` and its
//! `op_*` family. The P2SH stack-copy/pop/re-execute composition has no
//! literal source in the retrieved reference material (`script::verify`'s
//! body was not present); it is implemented from spec.md's prose using the
//! same version-dispatch-then-clean-stack shape `witness.cpp`'s
//! `witness::verify` uses for the witness-v0 case, documented in
//! `DESIGN.md`.

pub mod stack;

use crate::constants::{
    LOCKTIME_THRESHOLD, MAX_CHECK_LOCKTIME_VERIFY_NUMBER_SIZE, MAX_CHECK_SEQUENCE_VERIFY_NUMBER_SIZE,
    MAX_NUMBER_SIZE, MAX_OPERATION_COUNT, MAX_SCRIPT_PUBLIC_KEYS, RELATIVE_LOCKTIME_DISABLED_BIT,
    RELATIVE_LOCKTIME_MASK_LEFT, RELATIVE_LOCKTIME_MIN_VERSION, RELATIVE_LOCKTIME_TIME_LOCKED_BIT,
};
use crate::error::{OpError, ScriptError};
use crate::forks::{Fork, Forks};
use crate::num;
use crate::opcode::Opcode;
use crate::operation::Operation;
use crate::script::Script;
use crate::sighash::{legacy_sighash, segwit_v0_sighash, SighashCache};
use crate::transaction::Transaction;
use crate::witness::WitnessProgram;

use stack::{Element, Stack};

/// Which signature-hash algorithm and subscript-trimming rule a running
/// script uses, set once per [`Machine::run`] call by the caller that
/// dispatched into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptVersion {
    /// Legacy and P2SH-redeemed scripts: BIP143 sighash not used,
    /// `find_and_delete` strips each checked signature from the subscript.
    Unversioned,
    /// BIP141/BIP143 witness v0: segwit sighash, no `find_and_delete`.
    Zero,
    /// A witness version this crate recognises but does not evaluate
    /// (`witness::Unknown`); no machine is ever constructed for this case,
    /// kept here only for completeness of the version space.
    Reserved,
}

/// One script's evaluation state: the stack, conditional scope, op-count
/// and codeseparator position for the script currently running, and the
/// transaction context signature checks hash against.
pub struct Machine<'a> {
    stack: Stack,
    conditions: Vec<bool>,
    op_count: usize,
    codeseparator: usize,
    current_script: Script,
    current_op_index: usize,
    tx: &'a Transaction,
    index: usize,
    value: u64,
    forks: Forks,
    version: ScriptVersion,
    sighash_cache: &'a SighashCache,
}

impl<'a> Machine<'a> {
    /// Builds a machine for input `index` of `tx`, spending an output of
    /// `value` satoshis under `forks`. The stack starts empty; callers
    /// evaluating a witness program seed it via [`Machine::seed_stack`]
    /// before calling [`Machine::run`].
    pub fn new(
        tx: &'a Transaction,
        index: usize,
        value: u64,
        forks: Forks,
        version: ScriptVersion,
        sighash_cache: &'a SighashCache,
    ) -> Self {
        Machine {
            stack: Stack::new(),
            conditions: Vec::new(),
            op_count: 0,
            codeseparator: 0,
            current_script: Script::from_ops(Vec::new()),
            current_op_index: 0,
            tx,
            index,
            value,
            forks,
            version,
            sighash_cache,
        }
    }

    /// Pushes each of `elements` onto the stack, bottom to top — used to
    /// seed a witness program's initial stack from its witness elements.
    pub fn seed_stack(&mut self, elements: Vec<Vec<u8>>) {
        for element in elements {
            self.stack.push(element);
        }
    }

    /// A snapshot of the current stack, bottom to top.
    pub fn stack_elements(&self) -> Vec<Vec<u8>> {
        self.stack.elements()
    }

    /// Whether the top stack element is truthy (the legacy/P2SH success
    /// rule — the remainder of the stack is not examined).
    pub fn is_success(&self) -> bool {
        self.stack.top().map(|top| num::is_true(top)).unwrap_or(false)
    }

    /// Whether execution left exactly one, truthy element on the stack (the
    /// witness-v0 "clean stack" success rule, spec.md §4.9).
    pub fn is_clean_success(&self) -> bool {
        self.stack.len() == 1 && self.is_success()
    }

    /// Whether all enclosing conditional branches are currently taken; an
    /// opcode only has its semantics applied when this holds (or the opcode
    /// is itself a conditional, which manages `self.conditions` directly).
    fn executing(&self) -> bool {
        self.conditions.iter().all(|&taken| taken)
    }

    fn charge_op_count(&mut self, amount: usize) -> Result<(), ScriptError> {
        self.op_count += amount;
        if self.op_count > MAX_OPERATION_COUNT {
            return Err(ScriptError::InvalidOperationCount);
        }
        Ok(())
    }

    fn cats_rule_allows(&self, code: Opcode) -> bool {
        self.forks.is_enabled(Fork::CatsRule)
            && matches!(
                code,
                Opcode::Cat
                    | Opcode::Substr
                    | Opcode::Left
                    | Opcode::Right
                    | Opcode::Invert
                    | Opcode::And
                    | Opcode::Or
                    | Opcode::Xor
                    | Opcode::Mul2
                    | Opcode::Div2
                    | Opcode::Mul
                    | Opcode::Div
                    | Opcode::Mod
                    | Opcode::LShift
                    | Opcode::RShift
            )
    }

    /// Runs `script` against the persistent stack, following spec.md §4.8's
    /// five-step per-operation loop: oversize check, invalid-opcode check,
    /// operation-count charge, conditional-gated dispatch, post-dispatch
    /// stack-size check. The conditional scope, op-count, and codeseparator
    /// position reset for each call; the stack itself carries over, letting
    /// a scriptSig and its scriptPubKey share one evaluation.
    pub fn run(&mut self, script: &Script) -> Result<(), ScriptError> {
        if !script.is_valid() {
            return Err(ScriptError::InvalidScript);
        }

        self.current_script = script.clone();
        self.codeseparator = 0;
        self.op_count = 0;

        for (index, op) in script.ops().iter().enumerate() {
            if op.is_oversized() {
                return Err(ScriptError::InvalidPushDataSize);
            }
            if op.code().is_invalid() && !self.cats_rule_allows(op.code()) {
                return Err(ScriptError::Op(OpError::Invalid));
            }
            if op.code().is_counted() {
                self.charge_op_count(1)?;
            }
            if self.executing() || op.code().is_conditional() {
                self.current_op_index = index;
                self.run_op(op)?;
                if self.stack.is_overflow() {
                    return Err(ScriptError::InvalidStackSize);
                }
            }
        }

        if !self.conditions.is_empty() {
            return Err(ScriptError::InvalidStackScope);
        }
        Ok(())
    }

    fn run_op(&mut self, op: &Operation) -> Result<(), ScriptError> {
        let code = op.code();
        match code {
            Opcode::Op0 | Opcode::PushBytes(_) | Opcode::PushData1 | Opcode::PushData2 | Opcode::PushData4 => {
                self.stack.push(op.data().to_vec());
            }
            Opcode::Op1Negate => self.stack.push_number(-1),
            Opcode::Op1
            | Opcode::Op2
            | Opcode::Op3
            | Opcode::Op4
            | Opcode::Op5
            | Opcode::Op6
            | Opcode::Op7
            | Opcode::Op8
            | Opcode::Op9
            | Opcode::Op10
            | Opcode::Op11
            | Opcode::Op12
            | Opcode::Op13
            | Opcode::Op14
            | Opcode::Op15
            | Opcode::Op16 => self.stack.push_number(positive_value(code)),

            Opcode::Nop | Opcode::Nop1 | Opcode::Nop4 | Opcode::Nop5 | Opcode::Nop6 | Opcode::Nop7
            | Opcode::Nop8 | Opcode::Nop9 | Opcode::Nop10 => {}

            Opcode::If => self.op_if(false)?,
            Opcode::NotIf => self.op_if(true)?,
            Opcode::Else => self.op_else()?,
            Opcode::EndIf => self.op_endif()?,
            Opcode::Verify => self.op_verify()?,

            Opcode::ToAltStack => self.stack.to_alternate()?,
            Opcode::FromAltStack => self.stack.from_alternate()?,

            Opcode::Drop2 => {
                self.stack.pop()?;
                self.stack.pop()?;
            }
            Opcode::Dup2 => {
                let b = self.stack.peek(0)?.clone();
                let a = self.stack.peek(1)?.clone();
                self.stack.push_rc(a);
                self.stack.push_rc(b);
            }
            Opcode::Dup3 => {
                let c = self.stack.peek(0)?.clone();
                let b = self.stack.peek(1)?.clone();
                let a = self.stack.peek(2)?.clone();
                self.stack.push_rc(a);
                self.stack.push_rc(b);
                self.stack.push_rc(c);
            }
            Opcode::Over2 => {
                let x1 = self.stack.peek(3)?.clone();
                let x2 = self.stack.peek(2)?.clone();
                self.stack.push_rc(x1);
                self.stack.push_rc(x2);
            }
            Opcode::Rot2 => {
                let x1 = self.stack.remove(5)?;
                let x2 = self.stack.remove(4)?;
                self.stack.push_rc(x1);
                self.stack.push_rc(x2);
            }
            Opcode::Swap2 => {
                self.stack.swap_depth(3, 1)?;
                self.stack.swap_depth(2, 0)?;
            }
            Opcode::IfDup => {
                let top = self.stack.top()?.clone();
                if num::is_true(&top) {
                    self.stack.push_rc(top);
                }
            }
            Opcode::Depth => self.stack.push_number(self.stack.len() as i64),
            Opcode::Drop => {
                self.stack.pop()?;
            }
            Opcode::Dup => {
                let top = self.stack.top()?.clone();
                self.stack.push_rc(top);
            }
            Opcode::Nip => {
                self.stack.remove(1)?;
            }
            Opcode::Over => {
                let item = self.stack.peek(1)?.clone();
                self.stack.push_rc(item);
            }
            Opcode::Pick => {
                let depth = self.pop_index()?;
                let item = self.stack.peek(depth)?.clone();
                self.stack.push_rc(item);
            }
            Opcode::Roll => {
                let depth = self.pop_index()?;
                let item = self.stack.remove(depth)?;
                self.stack.push_rc(item);
            }
            Opcode::Rot => {
                let item = self.stack.remove(2)?;
                self.stack.push_rc(item);
            }
            Opcode::Swap => self.stack.swap_depth(0, 1)?,
            Opcode::Tuck => {
                let top = self.stack.pop()?;
                let second = self.stack.pop()?;
                self.stack.push_rc(top.clone());
                self.stack.push_rc(second);
                self.stack.push_rc(top);
            }

            Opcode::Size => {
                let top = self.stack.top()?.clone();
                self.stack.push_number(top.len() as i64);
            }

            Opcode::Equal => {
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                self.stack.push_bool(a == b);
            }
            Opcode::EqualVerify => {
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                if a != b {
                    return Err(OpError::VerifyFailed.into());
                }
            }

            Opcode::Add1 => {
                let n = self.stack.pop_number()?;
                self.stack.push_number(n + 1);
            }
            Opcode::Sub1 => {
                let n = self.stack.pop_number()?;
                self.stack.push_number(n - 1);
            }
            Opcode::Negate => {
                let n = self.stack.pop_number()?;
                self.stack.push_number(-n);
            }
            Opcode::Abs => {
                let n = self.stack.pop_number()?;
                self.stack.push_number(n.abs());
            }
            Opcode::Not => {
                let n = self.stack.pop_number()?;
                self.stack.push_bool(n == 0);
            }
            Opcode::NotEqual0 => {
                let n = self.stack.pop_number()?;
                self.stack.push_bool(n != 0);
            }

            Opcode::Add => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_number(second + first);
            }
            Opcode::Sub => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_number(second - first);
            }
            Opcode::BoolAnd => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(first != 0 && second != 0);
            }
            Opcode::BoolOr => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(first != 0 || second != 0);
            }
            Opcode::NumEqual => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(second == first);
            }
            Opcode::NumEqualVerify => {
                let (first, second) = self.pop_binary_numbers()?;
                if second != first {
                    return Err(OpError::VerifyFailed.into());
                }
            }
            Opcode::NumNotEqual => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(second != first);
            }
            Opcode::LessThan => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(second < first);
            }
            Opcode::GreaterThan => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(second > first);
            }
            Opcode::LessThanOrEqual => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(second <= first);
            }
            Opcode::GreaterThanOrEqual => {
                let (first, second) = self.pop_binary_numbers()?;
                self.stack.push_bool(second >= first);
            }
            Opcode::Min => {
                let first = self.stack.pop()?;
                let second = self.stack.pop()?;
                let fv = num::decode(&first, MAX_NUMBER_SIZE, true).ok_or(OpError::InvalidNumber)?;
                let sv = num::decode(&second, MAX_NUMBER_SIZE, true).ok_or(OpError::InvalidNumber)?;
                self.stack.push_rc(if sv <= fv { second } else { first });
            }
            Opcode::Max => {
                let first = self.stack.pop()?;
                let second = self.stack.pop()?;
                let fv = num::decode(&first, MAX_NUMBER_SIZE, true).ok_or(OpError::InvalidNumber)?;
                let sv = num::decode(&second, MAX_NUMBER_SIZE, true).ok_or(OpError::InvalidNumber)?;
                self.stack.push_rc(if sv >= fv { second } else { first });
            }
            Opcode::Within => {
                let max = self.stack.pop_number()?;
                let min = self.stack.pop_number()?;
                let x = self.stack.pop_number()?;
                self.stack.push_bool(min <= x && x < max);
            }

            Opcode::Ripemd160 => {
                let v = self.stack.pop()?;
                self.stack.push(crate::hash::ripemd160(&v).to_vec());
            }
            Opcode::Sha1 => {
                let v = self.stack.pop()?;
                self.stack.push(crate::hash::sha1(&v).to_vec());
            }
            Opcode::Sha256 => {
                let v = self.stack.pop()?;
                self.stack.push(crate::hash::sha256(&v).to_vec());
            }
            Opcode::Hash160 => {
                let v = self.stack.pop()?;
                self.stack.push(crate::hash::hash160(&v).to_vec());
            }
            Opcode::Hash256 => {
                let v = self.stack.pop()?;
                self.stack.push(crate::hash::bitcoin_hash(&v).to_vec());
            }

            Opcode::CodeSeparator => {
                self.codeseparator = self.current_op_index + 1;
            }

            Opcode::CheckSig => {
                let key = self.stack.pop()?;
                let sig = self.stack.pop()?;
                let ok = self.check_sig(&key, &sig)?;
                self.stack.push_bool(ok);
            }
            Opcode::CheckSigVerify => {
                let key = self.stack.pop()?;
                let sig = self.stack.pop()?;
                if !self.check_sig(&key, &sig)? {
                    return Err(OpError::VerifyFailed.into());
                }
            }
            Opcode::CheckMultisig => {
                let ok = self.op_check_multisig()?;
                self.stack.push_bool(ok);
            }
            Opcode::CheckMultisigVerify => {
                if !self.op_check_multisig()? {
                    return Err(OpError::VerifyFailed.into());
                }
            }

            Opcode::CheckLockTimeVerify => self.op_check_locktime_verify()?,
            Opcode::CheckSequenceVerify => self.op_check_sequence_verify()?,

            Opcode::Cat
            | Opcode::Substr
            | Opcode::Left
            | Opcode::Right
            | Opcode::Invert
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Mul2
            | Opcode::Div2
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::LShift
            | Opcode::RShift => return Err(OpError::NotImplemented.into()),

            _ => return Err(OpError::Reserved.into()),
        }
        Ok(())
    }

    fn op_if(&mut self, negate: bool) -> Result<(), ScriptError> {
        let value = if self.executing() {
            let top = self.stack.pop().map_err(|_| OpError::EmptyConditional)?;
            num::is_true(&top) != negate
        } else {
            false
        };
        self.conditions.push(value);
        Ok(())
    }

    fn op_else(&mut self) -> Result<(), ScriptError> {
        let top = self.conditions.last_mut().ok_or(OpError::UnbalancedConditional)?;
        *top = !*top;
        Ok(())
    }

    fn op_endif(&mut self) -> Result<(), ScriptError> {
        self.conditions.pop().ok_or(OpError::UnbalancedConditional)?;
        Ok(())
    }

    fn op_verify(&mut self) -> Result<(), ScriptError> {
        let top = self.stack.pop()?;
        if !num::is_true(&top) {
            return Err(OpError::VerifyFailed.into());
        }
        Ok(())
    }

    fn pop_index(&mut self) -> Result<usize, OpError> {
        let value = self.stack.pop_number()?;
        usize::try_from(value).map_err(|_| OpError::InvalidStackIndex)
    }

    fn pop_binary_numbers(&mut self) -> Result<(i64, i64), OpError> {
        let first = self.stack.pop_number()?;
        let second = self.stack.pop_number()?;
        Ok((first, second))
    }

    fn subscript(&self) -> Script {
        self.current_script.subscript_from(self.codeseparator)
    }

    /// Signature-hash preimage construction for the active script version.
    fn signature_hash(&self, sub_script: &Script, sighash_type: u32) -> [u8; 32] {
        match self.version {
            ScriptVersion::Zero => {
                segwit_v0_sighash(self.tx, self.sighash_cache, self.index, sub_script, self.value, sighash_type)
            }
            _ => legacy_sighash(self.tx, self.index, sub_script, sighash_type),
        }
    }

    /// Checks one signature/pubkey pair against `sub_script`, an already
    /// codeseparator-trimmed (and, for legacy scripts, signature-stripped)
    /// subscript. Returns `Ok(false)` for an ordinary verification failure;
    /// `Err` only for a BIP66-gated strict-DER parse failure, which must
    /// abort the whole script rather than merely this opcode.
    fn evaluate_signature(&self, pubkey: &[u8], endorsement: &[u8], sub_script: &Script) -> Result<bool, OpError> {
        if endorsement.is_empty() {
            return Ok(false);
        }
        let (der, type_byte) = endorsement.split_at(endorsement.len() - 1);
        if !is_strict_der(der) {
            if self.forks.is_enabled(Fork::Bip66) {
                return Err(OpError::CheckSigParse(1));
            }
            return Ok(false);
        }
        let sighash_type = type_byte[0] as u32;
        let hash = self.signature_hash(sub_script, sighash_type);
        Ok(self.verify_signature(pubkey, der, &hash))
    }

    fn check_sig(&self, key: &Element, sig: &Element) -> Result<bool, ScriptError> {
        let mut sub_script = self.subscript();
        if !matches!(self.version, ScriptVersion::Zero) {
            sub_script = sub_script.find_and_delete(&Operation::from_data(sig.as_ref().clone()));
        }
        Ok(self.evaluate_signature(key.as_slice(), sig.as_slice(), &sub_script)?)
    }

    /// `checkmultisig`/`checkmultisigverify` (spec.md §4.8): pops `n` keys,
    /// `m` signatures, and the historical off-by-one dummy, then matches
    /// signatures against keys in order (each key used at most once). `n`
    /// itself is charged against the operation-count limit, beyond the
    /// opcode's own charge, per `op_check_multisig_verify`'s
    /// `increment_op_count(count)`.
    fn op_check_multisig(&mut self) -> Result<bool, ScriptError> {
        let keys_count = self.pop_count(OpError::CheckMultisig(2))?;
        self.charge_op_count(keys_count)?;

        let mut keys = Vec::with_capacity(keys_count);
        for _ in 0..keys_count {
            keys.push(self.stack.pop()?);
        }
        keys.reverse();

        let sigs_count = self.pop_count(OpError::CheckMultisig(4))?;
        if sigs_count > keys.len() {
            return Err(OpError::CheckMultisig(5).into());
        }
        let mut sigs = Vec::with_capacity(sigs_count);
        for _ in 0..sigs_count {
            sigs.push(self.stack.pop()?);
        }
        sigs.reverse();

        let dummy = self.stack.pop()?;
        if !dummy.is_empty() && self.forks.is_enabled(Fork::Bip147) {
            return Err(OpError::CheckMultisig(8).into());
        }

        let mut sub_script = self.subscript();
        if !matches!(self.version, ScriptVersion::Zero) {
            for sig in &sigs {
                sub_script = sub_script.find_and_delete(&Operation::from_data(sig.as_ref().clone()));
            }
        }

        let mut remaining = sigs.iter();
        let mut current = remaining.next();
        for key in &keys {
            let sig = match current {
                Some(sig) => sig,
                None => break,
            };
            if !sig.is_empty() {
                match self.evaluate_signature(key.as_slice(), sig.as_slice(), &sub_script) {
                    Ok(true) => current = remaining.next(),
                    Ok(false) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(current.is_none())
    }

    fn pop_count(&mut self, err: OpError) -> Result<usize, ScriptError> {
        let n = self.stack.pop_number()?;
        if !(0..=MAX_SCRIPT_PUBLIC_KEYS as i64).contains(&n) {
            return Err(err.into());
        }
        Ok(n as usize)
    }

    /// `checklocktimeverify` (BIP65): peeks (never pops) the top element as
    /// a comparand against this transaction's `locktime`, failing if this
    /// input is final, the comparand is negative, the comparand and
    /// locktime belong to different classes (height vs. time), or the
    /// comparand has not yet been reached. A no-op when bip65 is inactive.
    fn op_check_locktime_verify(&mut self) -> Result<(), ScriptError> {
        if !self.forks.is_enabled(Fork::Bip65) {
            return Ok(());
        }
        if self.tx.inputs()[self.index].is_final() {
            return Err(OpError::CheckLockTimeVerify(1).into());
        }
        let top = self.stack.top()?.clone();
        let value = num::decode(&top, MAX_CHECK_LOCKTIME_VERIFY_NUMBER_SIZE, true)
            .ok_or(OpError::CheckLockTimeVerify(2))?;
        if value < 0 {
            return Err(OpError::CheckLockTimeVerify(3).into());
        }
        let locktime = value as u64;
        let tx_locktime = self.tx.locktime() as u64;
        if (locktime < LOCKTIME_THRESHOLD as u64) != (tx_locktime < LOCKTIME_THRESHOLD as u64) {
            return Err(OpError::CheckLockTimeVerify(4).into());
        }
        if locktime > tx_locktime {
            return Err(OpError::CheckLockTimeVerify(5).into());
        }
        Ok(())
    }

    /// `checksequenceverify` (BIP112): peeks the top element; the stack's
    /// disable bit silently no-ops, a pre-BIP68 transaction version or the
    /// input's own disable bit fails outright, and otherwise the comparand
    /// and the input's `sequence` must agree on time-vs-height class with
    /// the comparand's low bits not exceeding the input's.
    fn op_check_sequence_verify(&mut self) -> Result<(), ScriptError> {
        if !self.forks.is_enabled(Fork::Bip112) {
            return Ok(());
        }
        let top = self.stack.top()?.clone();
        let value = num::decode(&top, MAX_CHECK_SEQUENCE_VERIFY_NUMBER_SIZE, true)
            .ok_or(OpError::CheckSequenceVerify(1))?;
        if value < 0 {
            return Err(OpError::CheckSequenceVerify(2).into());
        }
        let sequence = value as u32;
        if sequence & (1 << RELATIVE_LOCKTIME_DISABLED_BIT) != 0 {
            return Ok(());
        }
        if self.tx.version() < RELATIVE_LOCKTIME_MIN_VERSION {
            return Err(OpError::CheckSequenceVerify(3).into());
        }
        let input_sequence = self.tx.inputs()[self.index].sequence();
        if input_sequence & (1 << RELATIVE_LOCKTIME_DISABLED_BIT) != 0 {
            return Err(OpError::CheckSequenceVerify(4).into());
        }
        let type_bit = 1 << RELATIVE_LOCKTIME_TIME_LOCKED_BIT;
        if (sequence & type_bit) != (input_sequence & type_bit) {
            return Err(OpError::CheckSequenceVerify(5).into());
        }
        let mask = (1u32 << RELATIVE_LOCKTIME_MASK_LEFT) - 1;
        if (sequence & mask) > (input_sequence & mask) {
            return Err(OpError::CheckSequenceVerify(6).into());
        }
        Ok(())
    }

    #[cfg(feature = "secp256k1")]
    fn verify_signature(&self, pubkey: &[u8], der: &[u8], hash: &[u8; 32]) -> bool {
        use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};
        let secp = Secp256k1::verification_only();
        let (Ok(sig), Ok(key), Ok(msg)) = (
            Signature::from_der(der),
            PublicKey::from_slice(pubkey),
            Message::from_digest_slice(hash),
        ) else {
            return false;
        };
        secp.verify_ecdsa(&msg, &sig, &key).is_ok()
    }

    /// Without the `secp256k1` feature, signature checks operate in stub
    /// mode: any structurally well-formed (strict-DER) signature is treated
    /// as valid, so script logic can be exercised without real keys.
    #[cfg(not(feature = "secp256k1"))]
    fn verify_signature(&self, _pubkey: &[u8], _der: &[u8], _hash: &[u8; 32]) -> bool {
        true
    }
}

fn positive_value(code: Opcode) -> i64 {
    (code.to_byte() - Opcode::Op1.to_byte()) as i64 + 1
}

/// BIP66 strict DER signature encoding (the signature bytes, hashtype byte
/// already stripped), grounded in the canonical `IsValidSignatureEncoding`
/// check every consensus implementation carries.
fn is_strict_der(sig: &[u8]) -> bool {
    if sig.len() < 8 || sig.len() > 72 {
        return false;
    }
    if sig[0] != 0x30 || sig[1] as usize != sig.len() - 2 {
        return false;
    }
    let len_r = sig[3] as usize;
    if 5 + len_r >= sig.len() {
        return false;
    }
    let len_s = sig[5 + len_r] as usize;
    if len_r + len_s + 6 != sig.len() {
        return false;
    }
    if sig[2] != 0x02 || len_r == 0 || sig[4] & 0x80 != 0 {
        return false;
    }
    if len_r > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }
    if sig[len_r + 4] != 0x02 || len_s == 0 || sig[len_r + 6] & 0x80 != 0 {
        return false;
    }
    if len_s > 1 && sig[len_r + 6] == 0x00 && sig[len_r + 7] & 0x80 == 0 {
        return false;
    }
    true
}

/// Verifies that input `index` of `tx` satisfies `output_script`, the
/// locking script of the output it spends (value `value` satoshis), under
/// `forks`. Composes, in order: bare witness programs (spec.md §4.5/§4.9),
/// legacy + optional P2SH evaluation (BIP16), and P2SH-wrapped witness
/// programs.
pub fn verify_input(
    tx: &Transaction,
    index: usize,
    forks: Forks,
    output_script: &Script,
    value: u64,
) -> Result<(), ScriptError> {
    let input = &tx.inputs()[index];
    let cache = SighashCache::new();

    if forks.is_enabled(Fork::Bip141) && output_script.is_pay_witness_pattern() {
        if !input.script().ops().is_empty() {
            return Err(ScriptError::InvalidWitness);
        }
        return verify_witness_program(tx, index, forks, &cache, output_script, value);
    }

    let mut machine = Machine::new(tx, index, value, forks, ScriptVersion::Unversioned, &cache);
    machine.run(input.script())?;
    let presig_stack = machine.stack_elements();

    machine.run(output_script)?;
    if !machine.is_success() {
        return Err(ScriptError::StackFalse);
    }

    if forks.is_enabled(Fork::Bip16) && output_script.is_pay_script_hash_pattern() {
        if !input.script().is_push_only() {
            return Err(ScriptError::StackFalse);
        }
        let mut redeem_stack = presig_stack;
        let redeem_bytes = redeem_stack.pop().ok_or(ScriptError::StackFalse)?;
        let redeem_script = Script::from_bytes(&redeem_bytes);

        if forks.is_enabled(Fork::Bip141) && redeem_script.is_pay_witness_pattern() {
            return verify_witness_program(tx, index, forks, &cache, &redeem_script, value);
        }

        let mut redeem_machine = Machine::new(tx, index, value, forks, ScriptVersion::Unversioned, &cache);
        redeem_machine.seed_stack(redeem_stack);
        redeem_machine.run(&redeem_script)?;
        if !redeem_machine.is_success() {
            return Err(ScriptError::StackFalse);
        }
    }

    Ok(())
}

/// Evaluates a witness program: `program_script` is the output script (or,
/// for P2SH-wrapped segwit, the redeem script) that matched a witness
/// pattern. Grounded in `witness.cpp`'s `witness::verify` version dispatch.
fn verify_witness_program(
    tx: &Transaction,
    index: usize,
    forks: Forks,
    cache: &SighashCache,
    program_script: &Script,
    value: u64,
) -> Result<(), ScriptError> {
    let witness = tx.inputs()[index].witness();
    match witness.extract_program(program_script) {
        WitnessProgram::KeyHash { sub_script } => {
            let mut machine = Machine::new(tx, index, value, forks, ScriptVersion::Zero, cache);
            machine.seed_stack(witness.elements().to_vec());
            machine.run(&sub_script)?;
            if machine.is_clean_success() {
                Ok(())
            } else {
                Err(ScriptError::StackFalse)
            }
        }
        WitnessProgram::ScriptHash { sub_script, stack } => {
            let mut machine = Machine::new(tx, index, value, forks, ScriptVersion::Zero, cache);
            machine.seed_stack(stack);
            machine.run(&sub_script)?;
            if machine.is_clean_success() {
                Ok(())
            } else {
                Err(ScriptError::StackFalse)
            }
        }
        WitnessProgram::Unknown => Ok(()),
        WitnessProgram::Invalid => Err(ScriptError::InvalidWitness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::txin::Input;
    use crate::txout::Output;

    fn lone_input_tx(script: Script) -> Transaction {
        Transaction::new(
            1,
            vec![Input::new(Point::new([7u8; 32], 0), script, 0xffff_fffe)],
            vec![Output::new(1000, Script::from_bytes(&[]))],
            0,
        )
    }

    fn run_script(tx: &Transaction, script: &Script, forks: Forks) -> Result<Machine<'_>, ScriptError> {
        let cache = Box::leak(Box::new(SighashCache::new()));
        let mut machine = Machine::new(tx, 0, 0, forks, ScriptVersion::Unversioned, cache);
        machine.run(script)?;
        Ok(machine)
    }

    #[test]
    fn arithmetic_and_comparison() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![
            Operation::from_data(vec![2]),
            Operation::from_data(vec![3]),
            Operation::new(Opcode::Add),
            Operation::from_data(vec![5]),
            Operation::new(Opcode::NumEqual),
        ]);
        let machine = run_script(&tx, &script, Forks::NONE).unwrap();
        assert!(machine.is_success());
    }

    #[test]
    fn subtraction_preserves_operand_order() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        // 5 3 SUB -> 5 - 3 == 2
        let script = Script::from_ops(vec![
            Operation::from_data(vec![5]),
            Operation::from_data(vec![3]),
            Operation::new(Opcode::Sub),
            Operation::from_data(vec![2]),
            Operation::new(Opcode::NumEqual),
        ]);
        let machine = run_script(&tx, &script, Forks::NONE).unwrap();
        assert!(machine.is_success());
    }

    #[test]
    fn conditional_branch_selects_else() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![
            Operation::new(Opcode::Op0),
            Operation::new(Opcode::If),
            Operation::new(Opcode::Op0),
            Operation::new(Opcode::Else),
            Operation::new(Opcode::Op1),
            Operation::new(Opcode::EndIf),
        ]);
        let machine = run_script(&tx, &script, Forks::NONE).unwrap();
        assert!(machine.is_success());
    }

    #[test]
    fn unbalanced_conditional_is_rejected() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![Operation::new(Opcode::Op1), Operation::new(Opcode::If)]);
        let err = run_script(&tx, &script, Forks::NONE).unwrap_err();
        assert_eq!(err, ScriptError::InvalidStackScope);
    }

    #[test]
    fn disabled_opcode_fails_even_in_false_branch() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![
            Operation::new(Opcode::Op0),
            Operation::new(Opcode::If),
            Operation::new(Opcode::Cat),
            Operation::new(Opcode::EndIf),
        ]);
        let err = run_script(&tx, &script, Forks::NONE).unwrap_err();
        assert_eq!(err, ScriptError::Op(OpError::Invalid));
    }

    #[test]
    fn dup_and_equal_verify_round_trip() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![
            Operation::from_data(vec![9, 9, 9]),
            Operation::new(Opcode::Dup),
            Operation::new(Opcode::EqualVerify),
            Operation::new(Opcode::Op1),
        ]);
        let machine = run_script(&tx, &script, Forks::NONE).unwrap();
        assert!(machine.is_success());
    }

    #[test]
    fn checklocktimeverify_is_nop_when_bip65_inactive() {
        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![
            Operation::from_data(vec![1]),
            Operation::new(Opcode::CheckLockTimeVerify),
        ]);
        let machine = run_script(&tx, &script, Forks::NONE).unwrap();
        assert!(machine.is_success());
    }

    #[test]
    fn checklocktimeverify_rejects_final_input() {
        let tx = Transaction::new(
            2,
            vec![Input::new(Point::new([1u8; 32], 0), Script::from_bytes(&[]), Input::FINAL_SEQUENCE)],
            vec![Output::new(1000, Script::from_bytes(&[]))],
            500,
        );
        let script = Script::from_ops(vec![
            Operation::from_data(vec![1]),
            Operation::new(Opcode::CheckLockTimeVerify),
        ]);
        let err = run_script(&tx, &script, Fork::Bip65.into()).unwrap_err();
        assert_eq!(err, ScriptError::Op(OpError::CheckLockTimeVerify(1)));
    }

    #[test]
    fn stub_checksig_succeeds_without_secp256k1_feature() {
        // A structurally valid (minimal) DER signature plus hashtype byte,
        // checked against a throwaway compressed pubkey.
        let der = [
            0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01,
        ];
        let mut sig = der.to_vec();
        sig.push(0x01);
        let key = vec![0x02u8; 33];

        let tx = lone_input_tx(Script::from_bytes(&[]));
        let script = Script::from_ops(vec![
            Operation::from_data(sig),
            Operation::from_data(key),
            Operation::new(Opcode::CheckSig),
        ]);
        let machine = run_script(&tx, &script, Forks::NONE).unwrap();
        assert!(machine.is_success());
    }

    #[test]
    fn legacy_p2pkh_style_script_verifies_end_to_end() {
        let der = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];
        let mut sig = der.to_vec();
        sig.push(0x01);
        let key = vec![0x02u8; 33];
        let key_hash = crate::hash::hash160(&key);

        let output_script = Script::from_ops(vec![
            Operation::new(Opcode::Dup),
            Operation::new(Opcode::Hash160),
            Operation::from_data(key_hash.to_vec()),
            Operation::new(Opcode::EqualVerify),
            Operation::new(Opcode::CheckSig),
        ]);
        let input_script =
            Script::from_ops(vec![Operation::from_data(sig), Operation::from_data(key)]);

        let tx = lone_input_tx(input_script);
        let result = verify_input(&tx, 0, Forks::NONE, &output_script, 0);
        assert!(result.is_ok());
    }

    #[test]
    fn p2sh_redeems_pushed_script() {
        let redeem_script = Script::from_ops(vec![Operation::new(Opcode::Op1)]);
        let redeem_bytes = redeem_script.to_bytes();
        let script_hash = crate::hash::hash160(&redeem_bytes);

        let output_script = Script::from_ops(vec![
            Operation::new(Opcode::Hash160),
            Operation::from_data(script_hash.to_vec()),
            Operation::new(Opcode::Equal),
        ]);
        let input_script = Script::from_ops(vec![Operation::from_data(redeem_bytes)]);

        let tx = lone_input_tx(input_script);
        let result = verify_input(&tx, 0, Fork::Bip16.into(), &output_script, 0);
        assert!(result.is_ok());
    }

    #[test]
    fn witness_key_hash_requires_clean_stack() {
        let der = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];
        let mut sig = der.to_vec();
        sig.push(0x01);
        let key = vec![0x02u8; 33];
        let key_hash = crate::hash::hash160(&key);

        let output_script =
            Script::from_ops(vec![Operation::new(Opcode::Op0), Operation::from_data(key_hash.to_vec())]);

        let input = Input::new(Point::new([5u8; 32], 0), Script::from_bytes(&[]), 0xffff_ffff)
            .with_witness(crate::witness::Witness::new(vec![sig, key]));
        let tx = Transaction::new(1, vec![input], vec![Output::new(1000, Script::from_bytes(&[]))], 0);

        let result = verify_input(&tx, 0, Fork::Bip141 | Fork::Bip143, &output_script, 1000);
        assert!(result.is_ok());
    }
}
