//! Typed Data CLI Example
//!
//! Hashes EIP-712 documents from JSON files and walks a full
//! `eth_signTypedData_*` request through parsing and chain id checks.
//!
//! # Quick Start
//!
//! ```bash
//! cargo run --example typed-data-cli -p eth-typed-data-core -- hash mail.json
//! cargo run --example typed-data-cli -p eth-typed-data-core -- --v3 hash mail.json
//! cargo run --example typed-data-cli -p eth-typed-data-core -- encode-type mail.json Mail
//! cargo run --example typed-data-cli -p eth-typed-data-core -- request body.json 0x1
//! ```
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hash <file>` | Print the domain hash, primary hash and digest of a typed data document |
//! | `encode-type <file> <Type>` | Print the `encodeType` string and type hash of `Type` |
//! | `request <file> [chain]` | Parse a JSON-RPC request body and build the signing payload |
//!
//! `--v3` / `--v4` select the encoding version for `hash` and `encode-type`
//! (default `--v4`). `request` takes the version from the method name.
//!
//! Set `RUST_LOG=eth_typed_data_core=trace` to see skipped fields and
//! encoding failures.

#![expect(unused_crate_dependencies, reason = "needed for CLI example")]

use std::env;
use std::fs;
use std::process::ExitCode;

use eth_typed_data_core::{TypedData, Version, parse_request};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("eth_typed_data_core=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut version = Version::default();
    let mut args = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--v3" => version = Version::V3,
            "--v4" => version = Version::V4,
            _ => args.push(arg),
        }
    }

    let Some(command) = args.first() else {
        print_help();
        return ExitCode::SUCCESS;
    };

    let result = match command.as_str() {
        "hash" => cmd_hash(&args[1..], version),
        "encode-type" => cmd_encode_type(&args[1..], version),
        "request" => cmd_request(&args[1..]),
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        _ => Err(format!("Unknown command: {command}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!(
        r#"Typed Data CLI

USAGE:
    typed-data-cli [--v3|--v4] <COMMAND>

COMMANDS:
    hash <file>                 Hash a typed data document
    encode-type <file> <Type>   Show the encodeType string and type hash
    request <file> [chain]      Parse an eth_signTypedData_* request body
    help                        Show this help message

EXAMPLES:
    cargo run --example typed-data-cli -- hash mail.json
    cargo run --example typed-data-cli -- --v3 encode-type mail.json Mail
    cargo run --example typed-data-cli -- request body.json 0x1
"#
    );
}

fn read_file(path: Option<&String>) -> Result<String, String> {
    let path = path.ok_or("missing <file> argument")?;
    fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))
}

fn load_typed_data(path: Option<&String>) -> Result<TypedData, String> {
    let json = read_file(path)?;
    TypedData::from_json(&json).map_err(|e| e.to_string())
}

fn cmd_hash(args: &[String], version: Version) -> Result<(), String> {
    let typed_data = load_typed_data(args.first())?;
    let hashes = typed_data.hash(version).map_err(|e| e.to_string())?;

    println!("Version:         {version}");
    println!("Primary type:    {}", typed_data.primary_type);
    println!("Domain hash:     {}", hashes.domain_hash);
    println!("Primary hash:    {}", hashes.primary_hash);
    println!("Message to sign: {}", hashes.message_to_sign);
    Ok(())
}

fn cmd_encode_type(args: &[String], version: Version) -> Result<(), String> {
    let typed_data = load_typed_data(args.first())?;
    let type_name = args.get(1).unwrap_or(&typed_data.primary_type);
    let encoder = typed_data.encoder(version);

    let encoded = encoder.encode_types(type_name);
    if encoded.is_empty() {
        return Err(format!("type {type_name} is not defined or is malformed"));
    }

    println!("Encoded type: {encoded}");
    println!("Type hash:    {}", encoder.type_hash(type_name));
    Ok(())
}

fn cmd_request(args: &[String]) -> Result<(), String> {
    let body = read_file(args.first())?;
    let request = parse_request(&body).map_err(|e| e.to_string())?;

    println!("Method:       {}", request.version.method());
    println!("Address:      {}", request.address);
    println!("Primary type: {}", request.primary_type);
    let chain_id = request.chain_id_hex().map_err(|e| e.to_string())?;
    println!("Chain id:     {}", chain_id.as_deref().unwrap_or("(none)"));
    println!("Message:\n{}", request.message);

    let Some(active_chain) = args.get(1) else {
        println!("\nPass the active chain id to build the signing payload.");
        return Ok(());
    };

    let sign_data = request.sign_data(active_chain).map_err(|e| e.to_string())?;
    println!();
    println!("Domain:          {}", sign_data.domain);
    println!("Domain hash:     {}", sign_data.domain_hash);
    println!("Primary hash:    {}", sign_data.primary_hash);
    println!("Message to sign: {}", sign_data.message_to_sign);
    Ok(())
}
