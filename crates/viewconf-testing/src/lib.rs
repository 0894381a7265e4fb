//! Testing infrastructure for viewconf integration tests.
//!
//! This crate provides utilities for writing integration tests:
//! - `TestWorld`: Isolated data directory, seeded catalog, CLI execution
//! - `assertions`: Arch and JSON checks
//! - `fixtures`: The sample catalog shared by every test suite

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
