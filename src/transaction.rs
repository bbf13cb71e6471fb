//! Transaction (spec.md §3, §4.6): version, ordered inputs and outputs,
//! and a locktime, with two wire forms (legacy and BIP144 segwit) and the
//! structural/contextual predicates spec.md §4.9 runs ahead of script
//! evaluation.

use crate::constants::{
    COINBASE_MATURITY, LOCKTIME_THRESHOLD, MAX_BLOCK_SIZE, MAX_BLOCK_WEIGHT, MAX_COINBASE_SIZE,
    MAX_FAST_SIGOPS, MIN_COINBASE_SIZE, RELATIVE_LOCKTIME_DISABLED_BIT,
    RELATIVE_LOCKTIME_MASK_LEFT, RELATIVE_LOCKTIME_MIN_VERSION, RELATIVE_LOCKTIME_TIME_LOCKED_BIT,
    WITNESS_ENABLED, WITNESS_MARKER,
};
use crate::error::TxError;
use crate::forks::{Fork, Forks};
use crate::hash::bitcoin_hash;
use crate::ser::{write_compact_size, Reader};
use crate::txin::Input;
use crate::txout::Output;
use crate::witness::Witness;

/// Height and time context a transaction is checked against, supplied by
/// the caller (this crate never maintains chain state itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// The height the transaction is being validated for inclusion at.
    pub height: u32,
    /// The median of the preceding 11 blocks' timestamps, used for
    /// locktime comparisons when bip113 is active.
    pub median_time_past: u32,
    /// The confirming block's own header timestamp, used for absolute
    /// locktime comparisons when bip113 is inactive (pre-bip113 nodes
    /// compare time-class locktimes against the block's raw timestamp,
    /// not the median-time-past).
    pub timestamp: u32,
    /// The active soft-fork rule set.
    pub forks: Forks,
}

/// A Bitcoin transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    version: i32,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    locktime: u32,
}

impl Transaction {
    /// Builds a transaction from its parts.
    pub fn new(version: i32, inputs: Vec<Input>, outputs: Vec<Output>, locktime: u32) -> Self {
        Transaction { version, inputs, outputs, locktime }
    }

    /// This transaction's version.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// This transaction's inputs.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// This transaction's outputs.
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// This transaction's locktime.
    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    /// `segregated`: true iff any input carries a non-empty witness.
    pub fn is_segregated(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness().is_empty())
    }

    /// Whether this is a coinbase transaction: exactly one input, with a
    /// null outpoint.
    pub fn is_coinbase(&self) -> bool {
        matches!(self.inputs.as_slice(), [single] if single.is_null_point())
    }

    /// Parses either wire form, detecting segwit by `inputs.len() == 0` and
    /// a following marker/flag pair of `0x00 0x01`.
    pub fn read(reader: &mut Reader<'_>) -> Transaction {
        let version = reader.read_i32_le();

        let first_count = reader.read_compact_size();
        let segwit = first_count == 0;
        let (mut inputs, input_count) = if segwit {
            let marker = reader.read_u8();
            if marker != WITNESS_ENABLED {
                reader.invalidate();
            }
            let count = reader.read_compact_size();
            (Vec::new(), count)
        } else {
            (Vec::new(), first_count)
        };

        for _ in 0..input_count {
            if !reader.is_valid() {
                break;
            }
            inputs.push(Input::read(reader));
        }

        let output_count = reader.read_compact_size();
        let mut outputs = Vec::new();
        for _ in 0..output_count {
            if !reader.is_valid() {
                break;
            }
            outputs.push(Output::read(reader));
        }

        if segwit {
            let mut witnessed = Vec::with_capacity(inputs.len());
            for input in inputs {
                let witness = if reader.is_valid() {
                    Witness::read(reader)
                } else {
                    Witness::empty()
                };
                witnessed.push(input.with_witness(witness));
            }
            inputs = witnessed;
        }

        let locktime = reader.read_u32_le();

        Transaction { version, inputs, outputs, locktime }
    }

    /// Serializes the legacy (pre-BIP144) wire form: no marker/flag, no
    /// witnesses.
    pub fn to_data_legacy(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        write_compact_size(out, self.inputs.len() as u64).expect("writing to Vec never fails");
        for input in &self.inputs {
            input.to_data(out);
        }
        write_compact_size(out, self.outputs.len() as u64).expect("writing to Vec never fails");
        for output in &self.outputs {
            output.to_data(out);
        }
        out.extend_from_slice(&self.locktime.to_le_bytes());
    }

    /// Serializes the BIP144 segwit wire form: marker/flag pair, inputs,
    /// outputs, one witness per input, locktime.
    pub fn to_data_segwit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        out.push(WITNESS_MARKER);
        out.push(WITNESS_ENABLED);
        write_compact_size(out, self.inputs.len() as u64).expect("writing to Vec never fails");
        for input in &self.inputs {
            input.to_data(out);
        }
        write_compact_size(out, self.outputs.len() as u64).expect("writing to Vec never fails");
        for output in &self.outputs {
            output.to_data(out);
        }
        for input in &self.inputs {
            input.witness().to_data(out);
        }
        out.extend_from_slice(&self.locktime.to_le_bytes());
    }

    /// Serializes this transaction using the segwit form if `segregated`,
    /// else the legacy form — the natural "canonical wire bytes" choice.
    pub fn to_data(&self, out: &mut Vec<u8>) {
        if self.is_segregated() {
            self.to_data_segwit(out);
        } else {
            self.to_data_legacy(out);
        }
    }

    /// Byte length of the legacy serialization.
    pub fn serialized_size_legacy(&self) -> usize {
        let mut buf = Vec::new();
        self.to_data_legacy(&mut buf);
        buf.len()
    }

    /// Byte length of the segwit serialization.
    pub fn serialized_size_segwit(&self) -> usize {
        let mut buf = Vec::new();
        self.to_data_segwit(&mut buf);
        buf.len()
    }

    /// `weight = 3 * legacy_size + 1 * segwit_size` (spec.md §4.6). For a
    /// non-segregated transaction both sizes coincide, so this reduces to
    /// `4 * size` as usual.
    pub fn weight(&self) -> usize {
        if self.is_segregated() {
            3 * self.serialized_size_legacy() + self.serialized_size_segwit()
        } else {
            4 * self.serialized_size_legacy()
        }
    }

    /// Whether this transaction's weight exceeds
    /// [`crate::constants::MAX_BLOCK_WEIGHT`].
    pub fn is_overweight(&self) -> bool {
        self.weight() > MAX_BLOCK_WEIGHT
    }

    /// The double-SHA256 of the legacy serialization, Bitcoin's txid.
    pub fn txid(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        self.to_data_legacy(&mut buf);
        bitcoin_hash(&buf)
    }

    /// The double-SHA256 of the segwit serialization, Bitcoin's wtxid. A
    /// coinbase's wtxid is defined as the all-zero hash (spec.md §3).
    pub fn wtxid(&self) -> [u8; 32] {
        if self.is_coinbase() {
            return [0u8; 32];
        }
        let mut buf = Vec::new();
        self.to_data_segwit(&mut buf);
        bitcoin_hash(&buf)
    }

    /// Whether two or more inputs spend the same outpoint.
    pub fn is_internal_double_spend(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.inputs.iter().any(|input| !seen.insert(*input.point()))
    }

    /// Whether the legacy-serialized size exceeds
    /// [`crate::constants::MAX_BLOCK_SIZE`].
    pub fn is_oversized(&self) -> bool {
        self.serialized_size_legacy() > MAX_BLOCK_SIZE
    }

    /// Sigop count across every input's unlocking script and every output's
    /// locking script, in non-accurate bare-script mode (the conservative
    /// count used before P2SH/witness redemption is known).
    pub fn sigop_count(&self) -> usize {
        let inputs: usize = self.inputs.iter().map(|i| i.script().sigop_count(false)).sum();
        let outputs: usize = self.outputs.iter().map(|o| o.script().sigop_count(false)).sum();
        inputs + outputs
    }

    /// Saturating sum of every input's referenced output value (the total
    /// value this transaction claims to spend). Inputs without supplied
    /// metadata contribute zero; callers must have resolved prevouts before
    /// this is meaningful.
    pub fn claim(&self) -> u64 {
        self.inputs
            .iter()
            .filter_map(|input| input.metadata())
            .fold(0u64, |acc, meta| acc.saturating_add(meta.output.value().max(0) as u64))
    }

    /// Saturating sum of every output's value.
    pub fn value(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |acc, output| acc.saturating_add(output.value().max(0) as u64))
    }

    /// **Check** (context-free structural validity): empty transaction,
    /// invalid coinbase script size, or a null outpoint on a non-coinbase
    /// input.
    pub fn check(&self) -> Result<(), TxError> {
        if self.inputs.is_empty() || self.outputs.is_empty() {
            return Err(TxError::EmptyTransaction);
        }

        if self.is_coinbase() {
            let len = self.inputs[0].script().serialized_size();
            if !(MIN_COINBASE_SIZE..=MAX_COINBASE_SIZE).contains(&len) {
                return Err(TxError::InvalidCoinbaseScriptSize);
            }
        } else if self.inputs.iter().any(Input::is_null_point) {
            return Err(TxError::PreviousOutputNull);
        }

        Ok(())
    }

    /// **Accept** (contextual validity): locktime finality, missing
    /// prevouts, overspend, coinbase immaturity, BIP68 relative locktime,
    /// unconfirmed spend, confirmed double spend.
    pub fn accept(&self, context: &ValidationContext) -> Result<(), TxError> {
        if !self.is_final(context) {
            return Err(TxError::NonFinal);
        }

        if !self.is_coinbase() {
            for input in &self.inputs {
                let meta = input.metadata().ok_or(TxError::MissingPreviousOutput)?;
                if meta.confirmed_height == 0 {
                    return Err(TxError::UnconfirmedSpend);
                }
                if meta.coinbase && self.is_immature(meta.confirmed_height, context.height) {
                    return Err(TxError::CoinbaseMaturity);
                }
                if meta.spent_elsewhere {
                    return Err(TxError::ConfirmedDoubleSpend);
                }
            }

            if context.forks.is_enabled(Fork::Bip68) && self.version >= RELATIVE_LOCKTIME_MIN_VERSION
            {
                for input in &self.inputs {
                    if let Some(meta) = input.metadata() {
                        if self.is_relative_locked(
                            input,
                            meta.confirmed_height,
                            meta.confirmed_median_time_past,
                            context,
                        ) {
                            return Err(TxError::RelativeTimeLocked);
                        }
                    }
                }
            }

            if self.is_overspent() {
                return Err(TxError::SpendExceedsValue);
            }
        }

        Ok(())
    }

    /// `is_overspent`: claimed input value is less than the sum of outputs.
    pub fn is_overspent(&self) -> bool {
        self.claim() < self.value()
    }

    /// The coinbase-maturity bug recovered from `transaction.cpp`: a
    /// prevout confirmed at height 0 (the genesis block) is forever
    /// immature, not merely immature until `height + COINBASE_MATURITY`.
    pub fn is_immature(&self, confirmed_height: u32, current_height: u32) -> bool {
        confirmed_height == 0
            || current_height < confirmed_height.saturating_add(COINBASE_MATURITY as u32)
    }

    /// Whether every input's absolute locktime condition is satisfied: this
    /// transaction's `locktime` is zero, every input is final, or the
    /// locktime (in whichever class — height or MTP-gated time — it
    /// belongs to) has passed.
    pub fn is_final(&self, context: &ValidationContext) -> bool {
        if self.locktime == 0 {
            return true;
        }
        if self.inputs.iter().all(Input::is_final) {
            return true;
        }
        // Height-class locktimes always compare against height; time-class
        // locktimes compare against the median-time-past once bip113 is
        // active, and against the confirming block's own timestamp before
        // that (examples/original_source/src/chain/transaction.cpp:584-597).
        let now = if self.locktime < LOCKTIME_THRESHOLD {
            context.height
        } else if context.forks.is_enabled(Fork::Bip113) {
            context.median_time_past
        } else {
            context.timestamp
        };
        self.locktime <= now
    }

    /// BIP68 relative-locktime check for one input: whether `sequence`
    /// encodes an active relative lock that has not yet been satisfied.
    fn is_relative_locked(
        &self,
        input: &Input,
        confirmed_height: u32,
        confirmed_median_time_past: u32,
        context: &ValidationContext,
    ) -> bool {
        let sequence = input.sequence();
        if sequence & (1 << RELATIVE_LOCKTIME_DISABLED_BIT) != 0 {
            return false;
        }
        let mask = (1u32 << RELATIVE_LOCKTIME_MASK_LEFT) - 1;
        let masked = sequence & mask;
        if sequence & (1 << RELATIVE_LOCKTIME_TIME_LOCKED_BIT) != 0 {
            // Time-locked: units of 512 seconds, compared against the
            // confirming block's own median-time-past, not this block's.
            let elapsed = context.median_time_past.saturating_sub(confirmed_median_time_past);
            (elapsed / 512) < masked as u32
        } else {
            let elapsed = context.height.saturating_sub(confirmed_height);
            elapsed < masked
        }
    }

    /// **Guard** (context-free mempool policy): reject a coinbase
    /// transaction, an internal double spend, or an oversize transaction.
    pub fn guard(&self) -> Result<(), TxError> {
        if self.is_coinbase() {
            return Err(TxError::CoinbaseTransaction);
        }
        if self.is_internal_double_spend() {
            return Err(TxError::InternalDoubleSpend);
        }
        if self.is_oversized() {
            return Err(TxError::SizeLimit);
        }
        Ok(())
    }

    /// **Guard** (contextual mempool policy): reject witness data when
    /// bip141 is inactive, reject overweight transactions, reject missing
    /// prevouts, and reject sigop counts beyond the fork-dependent limit.
    pub fn guard_context(&self, context: &ValidationContext) -> Result<(), TxError> {
        if self.is_segregated() && !context.forks.is_enabled(Fork::Bip141) {
            return Err(TxError::UnexpectedWitnessTransaction);
        }
        if context.forks.is_enabled(Fork::Bip141) && self.is_overweight() {
            return Err(TxError::WeightLimit);
        }
        if self.inputs.iter().any(|input| input.metadata().is_none()) {
            return Err(TxError::MissingPreviousOutput);
        }
        let limit = if context.forks.is_enabled(Fork::Bip141) {
            MAX_FAST_SIGOPS
        } else {
            crate::constants::MAX_BLOCK_SIGOPS
        };
        if self.sigop_count() > limit {
            return Err(TxError::SigopLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::script::Script;
    use crate::txin::PreviousOutputMetadata;

    fn sample_transaction() -> Transaction {
        Transaction::new(
            1,
            vec![Input::new(Point::new([1u8; 32], 0), Script::from_bytes(&[]), 0xffff_ffff)],
            vec![Output::new(1000, Script::from_bytes(&[]))],
            0,
        )
    }

    #[test]
    fn round_trips_legacy_serialization() {
        let tx = sample_transaction();
        let mut buf = Vec::new();
        tx.to_data_legacy(&mut buf);
        let mut reader = Reader::new(&buf);
        let parsed = Transaction::read(&mut reader);
        assert_eq!(parsed.version(), tx.version());
        assert_eq!(parsed.locktime(), tx.locktime());
        assert_eq!(parsed.inputs().len(), tx.inputs().len());
        assert_eq!(parsed.outputs().len(), tx.outputs().len());
    }

    #[test]
    fn weight_is_four_times_size_without_witness() {
        let tx = sample_transaction();
        assert_eq!(tx.weight(), 4 * tx.serialized_size_legacy());
    }

    #[test]
    fn coinbase_recognition() {
        let coinbase = Transaction::new(
            1,
            vec![Input::new(Point::null(), Script::from_bytes(&[0x51, 0x51]), 0xffff_ffff)],
            vec![Output::new(5_000_000_000, Script::from_bytes(&[]))],
            0,
        );
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.wtxid(), [0u8; 32]);
    }

    #[test]
    fn genesis_confirmed_prevout_is_forever_immature() {
        let tx = sample_transaction();
        assert!(tx.is_immature(0, 1_000_000));
    }

    #[test]
    fn empty_transaction_fails_check() {
        let tx = Transaction::new(1, Vec::new(), Vec::new(), 0);
        assert_eq!(tx.check(), Err(TxError::EmptyTransaction));
    }

    #[test]
    fn internal_double_spend_is_detected() {
        let point = Point::new([9u8; 32], 0);
        let tx = Transaction::new(
            1,
            vec![
                Input::new(point, Script::from_bytes(&[]), 0),
                Input::new(point, Script::from_bytes(&[]), 0),
            ],
            vec![Output::new(1, Script::from_bytes(&[]))],
            0,
        );
        assert!(tx.is_internal_double_spend());
        assert_eq!(tx.guard(), Err(TxError::InternalDoubleSpend));
    }

    #[test]
    fn bip68_time_locked_input_blocks_acceptance_until_confirming_mtp_elapses() {
        let masked = 10u32; // requires 10 * 512 = 5120 seconds since confirmation
        let sequence = (1 << RELATIVE_LOCKTIME_TIME_LOCKED_BIT) | masked;
        let confirmed_median_time_past = 1_600_000_000u32;
        let input = Input::new(Point::new([4u8; 32], 0), Script::from_bytes(&[]), sequence)
            .with_metadata(PreviousOutputMetadata {
                output: Output::new(1000, Script::from_bytes(&[])),
                confirmed_height: 100,
                confirmed_median_time_past,
                coinbase: false,
                spent_elsewhere: false,
            });
        let tx = Transaction::new(2, vec![input], vec![Output::new(900, Script::from_bytes(&[]))], 0);

        let mut context = ValidationContext {
            height: 200,
            median_time_past: confirmed_median_time_past + 100,
            timestamp: 0,
            forks: Fork::Bip68.into(),
        };
        assert_eq!(tx.accept(&context), Err(TxError::RelativeTimeLocked));

        context.median_time_past = confirmed_median_time_past + 10_000;
        assert!(tx.accept(&context).is_ok());
    }

    #[test]
    fn pre_bip113_absolute_locktime_compares_against_block_timestamp() {
        let tx = Transaction::new(
            1,
            vec![Input::new(Point::new([5u8; 32], 0), Script::from_bytes(&[]), 0)],
            vec![Output::new(1, Script::from_bytes(&[]))],
            1_600_000_000,
        );

        let mut context = ValidationContext {
            height: 500,
            median_time_past: 1_700_000_000,
            timestamp: 1_599_999_999,
            forks: Forks::NONE,
        };
        assert!(!tx.is_final(&context));

        context.timestamp = 1_600_000_001;
        assert!(tx.is_final(&context));
    }
}
