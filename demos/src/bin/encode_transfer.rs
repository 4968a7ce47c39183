//! # encode_transfer
//!
//! Demonstrates encoding an ERC-20-shaped `transfer(address,uint256)` call
//! against a Contract Interface Document, then round-tripping it back through
//! the decoder.
//!
//! Run with:
//! ```sh
//! cargo run --bin encode_transfer
//! ```

use anyhow::Result;

use abicodec_core::AbiValue;
use abicodec_registry::InterfaceRegistry;
use alloy_primitives::U256;

const ERC20_ABI: &str = r#"[
    {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
    {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]}
]"#;

fn main() -> Result<()> {
    let registry = InterfaceRegistry::from_document(ERC20_ABI)?;
    println!("✓ Registry loaded (transfer selector: {})", hex_sel(&registry)?);

    let args = vec![
        AbiValue::Address("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B".parse()?),
        AbiValue::Uint(U256::from(1_000_000_000u64)), // 1000 USDC at 6 decimals
    ];

    let call_data = registry.encode_function("transfer", &args)?;
    println!("\n─── Encoded call-data ──────────────────────────");
    println!("0x{}", hex::encode(&call_data));

    let decoded = registry.decode_function("transfer", &call_data)?;
    println!("\n─── Round-tripped inputs ───────────────────────");
    for (field, value) in registry.function("transfer")?.inputs.iter().zip(decoded.iter()) {
        println!("  {:8} = {:?}", field.name, value);
    }
    assert_eq!(decoded, args);
    println!("\n✓ decode(encode(args)) == args");

    Ok(())
}

fn hex_sel(registry: &InterfaceRegistry) -> Result<String> {
    Ok(abicodec_vm::signature::to_hex(&registry.function_selector("transfer")?))
}
