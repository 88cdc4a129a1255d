//! CLI Smoke Test
//!
//! Runs the built binary for each subcommand and checks its output. The
//! configuration is pinned through the environment so a local config file
//! cannot change the results.

use crate::common::{EMPTY_CELL_BOC, MINTER_FRIENDLY};
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jetton-codec"))
        .args(args)
        .env("JETTON_CODEC_CODEC__BOC_CRC32C", "false")
        .env("JETTON_CODEC_CODEC__KEY_VARIANT", "hashed")
        .env("JETTON_CODEC_OUTPUT__FORMAT", "text")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run jetton-codec")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_metadata_encode_then_decode() {
    let boc = stdout_of(&run_cli(&[
        "metadata",
        "encode",
        "--name",
        "Awesome Token",
        "--symbol",
        "AWS",
    ]));
    assert!(boc.starts_with("te6cc"));

    let decoded = stdout_of(&run_cli(&["metadata", "decode", &boc]));
    assert_eq!(decoded, "name: Awesome Token\nsymbol: AWS");

    let json = stdout_of(&run_cli(&["metadata", "decode", &boc, "--format", "json"]));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "Awesome Token");
    assert!(value.get("image").is_none());
}

#[test]
fn test_metadata_decode_empty_cell_fails() {
    let output = run_cli(&["metadata", "decode", EMPTY_CELL_BOC]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("on-chain"), "stderr: {}", stderr);
}

#[test]
fn test_message_encode_then_decode() {
    let json = format!(
        r#"{{"type":"BuyTokens","query_id":5,"token_address":"{}"}}"#,
        MINTER_FRIENDLY
    );
    let boc = stdout_of(&run_cli(&["message", "encode", &json]));

    let decoded = stdout_of(&run_cli(&[
        "message", "decode", &boc, "--family", "curve", "--format", "json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&decoded).unwrap();
    assert_eq!(value["type"], "BuyTokens");
    assert_eq!(value["query_id"], 5);

    let text = stdout_of(&run_cli(&["message", "decode", &boc, "--family", "curve"]));
    assert!(text.starts_with("type: BuyTokens\nquery_id: 5"), "{}", text);

    let wrong_family = run_cli(&["message", "decode", &boc, "--family", "minter"]);
    assert!(!wrong_family.status.success());
}

#[test]
fn test_message_decode_text_shows_ton_amounts() {
    let json = format!(
        r#"{{"type":"SellTokens","query_id":3,"token_address":"{}","amount":"1.5 TON"}}"#,
        MINTER_FRIENDLY
    );
    let boc = stdout_of(&run_cli(&["message", "encode", &json]));
    let text = stdout_of(&run_cli(&["message", "decode", &boc, "--family", "curve"]));
    assert!(
        text.ends_with("amount: 1.500000000 TON (1500000000 nanotons)"),
        "{}",
        text
    );
}

#[test]
fn test_message_encode_unknown_type_fails() {
    let output = run_cli(&["message", "encode", r#"{"type":"Burn","query_id":1}"#]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Burn"));
}

#[test]
fn test_inspect_empty_cell() {
    let text = stdout_of(&run_cli(&["inspect", EMPTY_CELL_BOC]));
    assert!(text.starts_with("x{}"));
    assert!(text.contains("depth: 0"));
    assert!(text.contains("96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"));

    let hex = stdout_of(&run_cli(&["inspect", "b5ee9c72010101010002000000", "--format", "json"]));
    let value: serde_json::Value = serde_json::from_str(&hex).unwrap();
    assert_eq!(value["bits"], 0);
}
