//! Demonstrates the complete Pay-to-Public-Key-Hash (P2PKH) validation flow:
//! building a scriptSig/scriptPubKey pair, wiring them into a spending
//! transaction, and running them through the validation pipeline.
//!
//! Run with: `cargo run --example p2pkh`

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

/// A syntactically valid low-S DER signature plus a trailing `SIGHASH_ALL`
/// byte. Real signing would derive this from a private key and the
/// transaction's signature hash; this demo only exercises script logic, so
/// the bytes only need to satisfy the strict-DER shape check.
fn fake_signature() -> Vec<u8> {
    let mut der = vec![0x30, 68, 0x02, 32];
    der.extend(std::iter::repeat(0x11u8).take(32));
    der.push(0x02);
    der.push(32);
    der.extend(std::iter::repeat(0x22u8).take(32));
    der.push(0x01); // SIGHASH_ALL
    der
}

fn main() {
    // 1. A fake signature (see `fake_signature`) and a 33-byte compressed
    //    public key. In a real transaction these would come from the
    //    spending input's scriptSig.
    let fake_sig = fake_signature();
    let fake_pubkey = [0x02u8; 33];

    // 2. HASH160(pubkey): the 20-byte address hash locked into the output.
    let pubkey_hash = hash::hash160(&fake_pubkey);

    // 3. scriptSig: <sig> <pubkey>
    let script_sig = Script::from_ops(vec![
        Operation::from_data(fake_sig),
        Operation::from_data(fake_pubkey.to_vec()),
    ]);

    // 4. scriptPubKey: OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG
    let script_pubkey = Script::from_ops(vec![
        Operation::new(Opcode::Dup),
        Operation::new(Opcode::Hash160),
        Operation::from_data(pubkey_hash.to_vec()),
        Operation::new(Opcode::EqualVerify),
        Operation::new(Opcode::CheckSig),
    ]);

    println!("scriptPubKey: {script_pubkey}");
    println!("pattern: {:?}", script_pubkey.output_pattern());
    println!();

    // 5. Wire up a one-input, one-output spending transaction referencing
    //    the output this scriptSig/scriptPubKey pair is meant to redeem.
    let prior_output = Output::new(50_000, script_pubkey);
    let input = Input::new(Point::new([0x11; 32], 0), script_sig, 0xffff_ffff).with_metadata(
        PreviousOutputMetadata {
            output: prior_output,
            confirmed_height: 100,
            confirmed_median_time_past: 0,
            coinbase: false,
            spent_elsewhere: false,
        },
    );
    let tx = Transaction::new(1, vec![input], vec![Output::new(49_000, Script::from_bytes(&[]))], 0);

    let context = ValidationContext {
        height: 200,
        median_time_past: 0,
        timestamp: 0,
        forks: Forks::NONE,
    };

    // 6. Run the full check/accept/connect pipeline. Without the
    //    `secp256k1` feature, CHECKSIG accepts any syntactically valid
    //    signature/pubkey pair, so this fake signature validates; with the
    //    feature enabled it would not.
    match validate::validate(&tx, &context) {
        Ok(()) => println!("validation result: success"),
        Err(err) => println!("validation result: {err}"),
    }
}
