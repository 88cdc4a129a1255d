//! Unit Tests Module
//!
//! Component-level tests for the cell layer and each codec built on it.

pub mod dictionary;
pub mod message;
pub mod metadata;
