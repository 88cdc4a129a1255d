//! Integration Tests Module
//!
//! End-to-end tests that build the payloads of a full jetton deployment
//! and drive the command-line tool.

pub mod cli_smoke_test;
pub mod deployment_payloads;
