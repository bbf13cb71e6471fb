//! Demonstrates script parsing and human-readable display.
//!
//! Run with: `cargo run --example inspect`

use bitcoin_consensus_core::hex;
use bitcoin_consensus_core::script::Script;

fn main() {
    // A standard P2PKH scriptPubKey in hex:
    // OP_DUP OP_HASH160 <20-byte pubkey hash> OP_EQUALVERIFY OP_CHECKSIG
    let raw = "76a91489abcdefabbaabbaabbaabbaabbaabbaabbaabba88ac";

    println!("Raw hex: {raw}");
    println!();

    let bytes = hex::decode(raw).expect("valid hex script");
    let script = Script::from_bytes(&bytes);

    println!("Parsed operations:");
    for (i, op) in script.ops().iter().enumerate() {
        println!("  [{i}] {op}");
    }
    println!();
    println!("scriptPubKey pattern: {:?}", script.output_pattern());
}
