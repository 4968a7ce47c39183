//! abicodec CLI — encode and decode ABI call-data, return-data, and event
//! logs against a Contract Interface Document (spec.md §6).
//!
//! # Commands
//! ```text
//! abicodec encode-function --abi <path.json> --function <name> --args <json>
//! abicodec decode-function --abi <path.json> --calldata <hex> [--function <name>]
//! abicodec decode-result    --abi <path.json> --function <name> --data <hex>
//! abicodec encode-params    --types <json> --values <json>
//! abicodec decode-params    --types <json> --data <hex>
//! abicodec decode-log       --abi <path.json> --topics <hex...> --data <hex> [--event <name>]
//! abicodec selector         --abi <path.json> --function <name>
//! abicodec topic            --abi <path.json> --event <name>
//! abicodec info
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

mod argvalue;
mod logging;

use abicodec_core::AbiType;
use abicodec_registry::InterfaceRegistry;
use abicodec_vm::signature::to_hex;

use argvalue::{abi_value_to_display, abi_value_to_json, values_from_json_array};

#[derive(Parser)]
#[command(
    name = "abicodec",
    about = "ABI codec for a smart-contract VM — encode/decode call-data, return-data, and event logs",
    version
)]
struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a function call to call-data: selector ‖ encode(inputs, args)
    #[command(name = "encode-function")]
    EncodeFunction {
        /// Path to the Contract Interface Document (JSON)
        #[arg(long)]
        abi: String,
        /// Function name
        #[arg(long)]
        function: String,
        /// JSON array of arguments, e.g. '["0xabc...", "1000000000000000000"]'
        #[arg(long)]
        args: String,
    },

    /// Decode call-data against a function's declared inputs
    #[command(name = "decode-function")]
    DecodeFunction {
        #[arg(long)]
        abi: String,
        /// Raw call-data (0x-prefixed hex), selector ‖ encoded inputs
        #[arg(long)]
        calldata: String,
        /// Function name; if omitted, resolved from the call-data's selector
        #[arg(long)]
        function: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode return-data against a function's declared outputs
    #[command(name = "decode-result")]
    DecodeResult {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        function: String,
        /// Raw return-data (0x-prefixed hex)
        #[arg(long)]
        data: String,
        #[arg(long)]
        json: bool,
    },

    /// Encode a bare parameter list (no selector, no registry lookup)
    #[command(name = "encode-params")]
    EncodeParams {
        /// JSON array of canonical type strings, e.g. '["address","uint256"]'
        #[arg(long)]
        types: String,
        /// JSON array of values matching `types`
        #[arg(long)]
        values: String,
    },

    /// Decode a bare byte block against a parameter type list
    #[command(name = "decode-params")]
    DecodeParams {
        #[arg(long)]
        types: String,
        /// Raw bytes (0x-prefixed hex)
        #[arg(long)]
        data: String,
        #[arg(long)]
        json: bool,
    },

    /// Decode an event log's topics and data against an event definition
    #[command(name = "decode-log")]
    DecodeLog {
        #[arg(long)]
        abi: String,
        /// Ordered 32-byte topics (0x-prefixed hex); topics[0] is the event's
        /// own topic hash for non-anonymous events
        #[arg(long, num_args = 1..)]
        topics: Vec<String>,
        /// Non-indexed parameter bytes (0x-prefixed hex)
        #[arg(long, default_value = "0x")]
        data: String,
        /// Event name; if omitted, resolved from `topics[0]`
        #[arg(long)]
        event: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Print a function's 4-byte selector
    Selector {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        function: String,
    },

    /// Print an event's 32-byte topic hash
    Topic {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        event: String,
    },

    /// Show abicodec build info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::EncodeFunction { abi, function, args } => cmd_encode_function(&abi, &function, &args),
        Commands::DecodeFunction { abi, calldata, function, json } => {
            cmd_decode_function(&abi, &calldata, function.as_deref(), json)
        }
        Commands::DecodeResult { abi, function, data, json } => cmd_decode_result(&abi, &function, &data, json),
        Commands::EncodeParams { types, values } => cmd_encode_params(&types, &values),
        Commands::DecodeParams { types, data, json } => cmd_decode_params(&types, &data, json),
        Commands::DecodeLog { abi, topics, data, event, json } => {
            cmd_decode_log(&abi, &topics, &data, event.as_deref(), json)
        }
        Commands::Selector { abi, function } => cmd_selector(&abi, &function),
        Commands::Topic { abi, event } => cmd_topic(&abi, &event),
        Commands::Info => cmd_info(),
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn load_registry(abi_path: &str) -> Result<InterfaceRegistry> {
    let json = std::fs::read_to_string(abi_path)
        .with_context(|| format!("reading contract interface document '{abi_path}'"))?;
    InterfaceRegistry::from_document(&json)
        .map_err(|e| anyhow!("parsing contract interface document '{abi_path}': {e}"))
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).with_context(|| format!("invalid hex: {s:?}"))
}

fn cmd_encode_function(abi: &str, function: &str, args_json: &str) -> Result<()> {
    let registry = load_registry(abi)?;
    let f = registry.function(function).map_err(|e| anyhow!("{e}"))?;
    let args = values_from_json_array(&f.input_types(), args_json)?;
    let call_data = registry.encode_function(function, &args).map_err(|e| anyhow!("{e}"))?;
    println!("0x{}", hex::encode(call_data));
    Ok(())
}

fn cmd_decode_function(abi: &str, calldata: &str, function: Option<&str>, as_json: bool) -> Result<()> {
    let registry = load_registry(abi)?;
    let bytes = decode_hex(calldata)?;

    let (f, decoded) = match function {
        Some(name) => {
            let decoded = registry.decode_function(name, &bytes).map_err(|e| anyhow!("{e}"))?;
            (registry.function(name).map_err(|e| anyhow!("{e}"))?, decoded)
        }
        None => {
            if bytes.len() < 4 {
                return Err(anyhow!("call-data shorter than a 4-byte selector"));
            }
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&bytes[0..4]);
            let f = registry.function_by_selector(&selector).map_err(|e| anyhow!("{e}"))?;
            let decoded = abicodec_vm::decode_params(&f.input_types(), &bytes[4..]).map_err(|e| anyhow!("{e}"))?;
            (f, decoded)
        }
    };

    if as_json {
        let obj = serde_json::json!({
            "function": f.name,
            "selector": to_hex(&f.selector()),
            "inputs": f.inputs.iter().zip(decoded.iter())
                .map(|(field, v)| serde_json::json!({"name": field.name, "value": abi_value_to_json(v)}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        println!("Function: {}", f.name);
        println!("Selector: {}", to_hex(&f.selector()));
        println!("Inputs:");
        for (field, value) in f.inputs.iter().zip(decoded.iter()) {
            println!("  {}: {}", field.name, abi_value_to_display(value));
        }
    }
    Ok(())
}

fn cmd_decode_result(abi: &str, function: &str, data: &str, as_json: bool) -> Result<()> {
    let registry = load_registry(abi)?;
    let bytes = decode_hex(data)?;
    let f = registry.function(function).map_err(|e| anyhow!("{e}"))?;
    let decoded = registry.decode_function_result(function, &bytes).map_err(|e| anyhow!("{e}"))?;

    if as_json {
        let obj = serde_json::json!({
            "function": f.name,
            "outputs": f.outputs.iter().zip(decoded.iter())
                .map(|(field, v)| serde_json::json!({"name": field.name, "value": abi_value_to_json(v)}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        println!("Function: {}", f.name);
        println!("Outputs:");
        for (field, value) in f.outputs.iter().zip(decoded.iter()) {
            println!("  {}: {}", field.name, abi_value_to_display(value));
        }
    }
    Ok(())
}

fn cmd_encode_params(types_json: &str, values_json: &str) -> Result<()> {
    let type_strings: Vec<String> = serde_json::from_str(types_json).context("--types is not a JSON array of strings")?;
    let types: Vec<AbiType> = type_strings
        .iter()
        .map(|s| AbiType::parse(s).map_err(|e| anyhow!("{e}")))
        .collect::<Result<_>>()?;
    let values = values_from_json_array(&types, values_json)?;
    let encoded = abicodec_vm::encode_params(&types, &values).map_err(|e| anyhow!("{e}"))?;
    println!("0x{}", hex::encode(encoded));
    Ok(())
}

fn cmd_decode_params(types_json: &str, data: &str, as_json: bool) -> Result<()> {
    let type_strings: Vec<String> = serde_json::from_str(types_json).context("--types is not a JSON array of strings")?;
    let types: Vec<AbiType> = type_strings
        .iter()
        .map(|s| AbiType::parse(s).map_err(|e| anyhow!("{e}")))
        .collect::<Result<_>>()?;
    let bytes = decode_hex(data)?;
    let decoded = abicodec_vm::decode_params(&types, &bytes).map_err(|e| anyhow!("{e}"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&decoded.iter().map(abi_value_to_json).collect::<Vec<_>>())?);
    } else {
        for (i, value) in decoded.iter().enumerate() {
            println!("[{i}]: {}", abi_value_to_display(value));
        }
    }
    Ok(())
}

fn cmd_decode_log(abi: &str, topics: &[String], data: &str, event: Option<&str>, as_json: bool) -> Result<()> {
    let registry = load_registry(abi)?;
    let topic_words: Vec<[u8; 32]> = topics
        .iter()
        .map(|t| {
            let bytes = decode_hex(t)?;
            if bytes.len() != 32 {
                return Err(anyhow!("topic {t:?} is not 32 bytes"));
            }
            let mut word = [0u8; 32];
            word.copy_from_slice(&bytes);
            Ok(word)
        })
        .collect::<Result<_>>()?;
    let data_bytes = decode_hex(data)?;

    let decoded = registry
        .decode_log(&data_bytes, &topic_words, event)
        .map_err(|e| anyhow!("{e}"))?;

    if as_json {
        let obj = serde_json::json!({
            "name": decoded.name,
            "args": decoded.args.iter()
                .map(|(name, v)| serde_json::json!({"name": name, "value": abi_value_to_json(v)}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        println!("Event: {}", decoded.name);
        println!("Args:");
        for (name, value) in &decoded.args {
            println!("  {name}: {}", abi_value_to_display(value));
        }
    }
    Ok(())
}

fn cmd_selector(abi: &str, function: &str) -> Result<()> {
    let registry = load_registry(abi)?;
    let selector = registry.function_selector(function).map_err(|e| anyhow!("{e}"))?;
    println!("{}", to_hex(&selector));
    Ok(())
}

fn cmd_topic(abi: &str, event: &str) -> Result<()> {
    let registry = load_registry(abi)?;
    let topic = registry.event_topic(event).map_err(|e| anyhow!("{e}"))?;
    println!("{}", to_hex(&topic));
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("abicodec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capabilities:");
    println!("  encode/decode function call-data and return-data");
    println!("  encode/decode bare parameter lists");
    println!("  decode event logs (indexed + non-indexed parameters)");
    println!("  function selector / event topic computation");
    Ok(())
}
