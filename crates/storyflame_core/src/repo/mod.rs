//! Persistence boundary for the project list.
//!
//! # Responsibility
//! - Define the gateway contract the store writes through.
//! - Provide the JSON codec and the file/in-memory gateway implementations.
//!
//! # Invariants
//! - At most one persisted document (`projects.json`) per data directory.
//! - Gateways move raw text only; they never interpret project data.

pub mod codec;
pub mod file_gateway;
pub mod gateway;
pub mod memory_gateway;
