//! End-to-end Pay-to-Public-Key-Hash validation through the full pipeline:
//! `Transaction::check`/`accept` followed by script evaluation.

use bitcoin_consensus_core::forks::Forks;
use bitcoin_consensus_core::hash;
use bitcoin_consensus_core::opcode::Opcode;
use bitcoin_consensus_core::operation::Operation;
use bitcoin_consensus_core::point::Point;
use bitcoin_consensus_core::script::Script;
use bitcoin_consensus_core::transaction::{Transaction, ValidationContext};
use bitcoin_consensus_core::txin::{Input, PreviousOutputMetadata};
use bitcoin_consensus_core::txout::Output;
use bitcoin_consensus_core::validate;

mod common;
use common::fake_signature;

fn p2pkh_scripts(pubkey: &[u8]) -> (Script, Script) {
    let pubkey_hash = hash::hash160(pubkey);
    let script_pubkey = Script::from_ops(vec![
        Operation::new(Opcode::Dup),
        Operation::new(Opcode::Hash160),
        Operation::from_data(pubkey_hash.to_vec()),
        Operation::new(Opcode::EqualVerify),
        Operation::new(Opcode::CheckSig),
    ]);

    let script_sig = Script::from_ops(vec![
        Operation::from_data(fake_signature()),
        Operation::from_data(pubkey.to_vec()),
    ]);

    (script_sig, script_pubkey)
}

fn spending_tx(script_sig: Script, script_pubkey: Script, value: i64) -> Transaction {
    let input = Input::new(Point::new([0x22; 32], 3), script_sig, 0xffff_ffff).with_metadata(
        PreviousOutputMetadata {
            output: Output::new(value, script_pubkey),
            confirmed_height: 50,
            confirmed_median_time_past: 0,
            coinbase: false,
            spent_elsewhere: false,
        },
    );
    Transaction::new(
        1,
        vec![input],
        vec![Output::new(value - 1_000, Script::from_bytes(&[]))],
        0,
    )
}

#[test]
fn valid_p2pkh_spend_passes_the_full_pipeline() {
    let pubkey = [0x02u8; 33];
    let (script_sig, script_pubkey) = p2pkh_scripts(&pubkey);
    let tx = spending_tx(script_sig, script_pubkey, 100_000);

    let context = ValidationContext {
        height: 160,
        median_time_past: 0,
        timestamp: 0,
        forks: Forks::NONE,
    };

    assert!(validate::validate(&tx, &context).is_ok());
}

#[test]
fn wrong_pubkey_hash_fails_equalverify() {
    let pubkey = [0x02u8; 33];
    let (script_sig, _) = p2pkh_scripts(&pubkey);
    // scriptPubKey locks a *different* pubkey's hash.
    let (_, wrong_script_pubkey) = p2pkh_scripts(&[0x03u8; 33]);
    let tx = spending_tx(script_sig, wrong_script_pubkey, 100_000);

    let context = ValidationContext {
        height: 160,
        median_time_past: 0,
        timestamp: 0,
        forks: Forks::NONE,
    };

    assert!(validate::validate(&tx, &context).is_err());
}

#[test]
fn overspend_is_rejected_before_script_evaluation() {
    let pubkey = [0x02u8; 33];
    let (script_sig, script_pubkey) = p2pkh_scripts(&pubkey);
    // Output claims more than the referenced previous output carries.
    let input = Input::new(Point::new([0x22; 32], 3), script_sig, 0xffff_ffff).with_metadata(
        PreviousOutputMetadata {
            output: Output::new(1_000, script_pubkey),
            confirmed_height: 50,
            confirmed_median_time_past: 0,
            coinbase: false,
            spent_elsewhere: false,
        },
    );
    let tx = Transaction::new(1, vec![input], vec![Output::new(5_000, Script::from_bytes(&[]))], 0);

    let context = ValidationContext {
        height: 160,
        median_time_past: 0,
        timestamp: 0,
        forks: Forks::NONE,
    };

    assert!(matches!(
        validate::validate(&tx, &context),
        Err(bitcoin_consensus_core::error::TxError::SpendExceedsValue)
    ));
}
