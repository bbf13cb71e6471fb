//! End-to-end redemption tests for P2SH (BIP16) and native segwit v0
//! (BIP141/143) outputs, run directly through [`machine::verify_input`]
//! rather than the full transaction pipeline, since these fixtures focus
//! on the script/witness composition rather than on chain-context checks.

use bitcoin_consensus_core::forks::{Fork, Forks};
use bitcoin_consensus_core::hash;
use bitcoin_consensus_core::machine::verify_input;
use bitcoin_consensus_core::opcode::Opcode;
use bitcoin_consensus_core::operation::Operation;
use bitcoin_consensus_core::point::Point;
use bitcoin_consensus_core::script::Script;
use bitcoin_consensus_core::transaction::Transaction;
use bitcoin_consensus_core::txin::Input;
use bitcoin_consensus_core::txout::Output;
use bitcoin_consensus_core::witness::Witness;

mod common;
use common::fake_signature;

#[test]
fn p2sh_redeems_a_trivially_true_script() {
    // redeem script: OP_1 (always succeeds once pushed through).
    let redeem_script = Script::from_ops(vec![Operation::new(Opcode::Op1)]);
    let redeem_bytes = redeem_script.to_bytes();
    let redeem_hash = hash::hash160(&redeem_bytes);

    let output_script = Script::from_ops(vec![
        Operation::new(Opcode::Hash160),
        Operation::from_data(redeem_hash.to_vec()),
        Operation::new(Opcode::Equal),
    ]);
    assert!(output_script.is_pay_script_hash_pattern());

    // scriptSig: push-only, ending in the serialized redeem script.
    let script_sig = Script::from_ops(vec![Operation::from_data(redeem_bytes)]);

    let input = Input::new(Point::new([9u8; 32], 0), script_sig, 0xffff_ffff);
    let tx = Transaction::new(1, vec![input], vec![Output::new(900, Script::from_bytes(&[]))], 0);

    let forks = Fork::Bip16.into();
    assert!(verify_input(&tx, 0, forks, &output_script, 1_000).is_ok());
}

#[test]
fn p2sh_without_bip16_falls_back_to_legacy_evaluation() {
    // With bip16 inactive, the redeem-script bytes are just leftover data
    // on the stack after the bare output script (hash160 ... equal)
    // succeeds; legacy evaluation ignores the embedded script entirely.
    let redeem_script = Script::from_ops(vec![Operation::new(Opcode::Op1)]);
    let redeem_bytes = redeem_script.to_bytes();
    let redeem_hash = hash::hash160(&redeem_bytes);

    let output_script = Script::from_ops(vec![
        Operation::new(Opcode::Hash160),
        Operation::from_data(redeem_hash.to_vec()),
        Operation::new(Opcode::Equal),
    ]);
    let script_sig = Script::from_ops(vec![Operation::from_data(redeem_bytes)]);

    let input = Input::new(Point::new([9u8; 32], 0), script_sig, 0xffff_ffff);
    let tx = Transaction::new(1, vec![input], vec![Output::new(900, Script::from_bytes(&[]))], 0);

    assert!(verify_input(&tx, 0, Forks::NONE, &output_script, 1_000).is_ok());
}

#[test]
fn p2wpkh_redeems_with_a_clean_two_element_witness() {
    let pubkey = [0x02u8; 33];
    let pubkey_hash = hash::hash160(&pubkey);
    let output_script = Script::from_ops(vec![
        Operation::new(Opcode::Op0),
        Operation::from_data(pubkey_hash.to_vec()),
    ]);
    assert!(output_script.is_pay_witness_key_hash_pattern());

    let witness = Witness::new(vec![fake_signature(), pubkey.to_vec()]);

    let input = Input::new(Point::new([3u8; 32], 1), Script::from_bytes(&[]), 0xffff_ffff)
        .with_witness(witness);
    let tx = Transaction::new(1, vec![input], vec![Output::new(900, Script::from_bytes(&[]))], 0);

    let forks = Fork::Bip141 | Fork::Bip143;
    assert!(verify_input(&tx, 0, forks, &output_script, 1_000).is_ok());
}

#[test]
fn p2wpkh_with_nonempty_scriptsig_is_rejected() {
    let pubkey = [0x02u8; 33];
    let pubkey_hash = hash::hash160(&pubkey);
    let output_script = Script::from_ops(vec![
        Operation::new(Opcode::Op0),
        Operation::from_data(pubkey_hash.to_vec()),
    ]);

    let witness = Witness::new(vec![fake_signature(), pubkey.to_vec()]);

    // A non-empty scriptSig alongside a witness-program output is invalid.
    let bogus_sig = Script::from_ops(vec![Operation::new(Opcode::Op1)]);
    let input = Input::new(Point::new([3u8; 32], 1), bogus_sig, 0xffff_ffff).with_witness(witness);
    let tx = Transaction::new(1, vec![input], vec![Output::new(900, Script::from_bytes(&[]))], 0);

    let forks = Fork::Bip141 | Fork::Bip143;
    assert!(verify_input(&tx, 0, forks, &output_script, 1_000).is_err());
}

#[test]
fn p2wsh_redeems_a_trivially_true_witness_script() {
    let witness_script = Script::from_ops(vec![Operation::new(Opcode::Op1)]);
    let witness_script_bytes = witness_script.to_bytes();
    let program = hash::sha256(&witness_script_bytes);

    let output_script = Script::from_ops(vec![
        Operation::new(Opcode::Op0),
        Operation::from_data(program.to_vec()),
    ]);
    assert!(output_script.is_pay_witness_script_hash_pattern());

    let witness = Witness::new(vec![witness_script_bytes]);
    let input = Input::new(Point::new([4u8; 32], 0), Script::from_bytes(&[]), 0xffff_ffff)
        .with_witness(witness);
    let tx = Transaction::new(1, vec![input], vec![Output::new(900, Script::from_bytes(&[]))], 0);

    let forks = Fork::Bip141 | Fork::Bip143;
    assert!(verify_input(&tx, 0, forks, &output_script, 1_000).is_ok());
}
