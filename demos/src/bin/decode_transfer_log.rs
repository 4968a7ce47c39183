//! # decode_transfer_log
//!
//! Demonstrates decoding a real ERC-20 `Transfer` event log — topics + data —
//! via the Interface Registry's Log Decoder facade.
//!
//! Run with:
//! ```sh
//! cargo run --bin decode_transfer_log
//! ```

use anyhow::Result;

use abicodec_registry::InterfaceRegistry;

const ERC20_ABI: &str = r#"[
    {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]}
]"#;

fn main() -> Result<()> {
    let registry = InterfaceRegistry::from_document(ERC20_ABI)?;
    println!("✓ Registry loaded (Transfer topic: {})", hex::encode(registry.event_topic("Transfer")?));

    // A well-known USDC Transfer: 1,000,000,000 (1000 USDC at 6 decimals)
    // from 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045
    // to   0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B
    let topics: Vec<[u8; 32]> = [
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
        "0x000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045",
        "0x000000000000000000000000ab5801a7d398351b8be11c439e05c5b3259aec9b",
    ]
    .iter()
    .map(|s| {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap()).unwrap();
        let mut word = [0u8; 32];
        word.copy_from_slice(&bytes);
        word
    })
    .collect();

    let data = hex::decode("000000000000000000000000000000000000000000000000000000003b9aca00")?;

    let decoded = registry.decode_log(&data, &topics, None)?;

    println!("\n─── Decoded Event ──────────────────────────────");
    println!("  name: {}", decoded.name);
    for (name, value) in &decoded.args {
        println!("  {:6} = {:?}", name, value);
    }

    Ok(())
}
