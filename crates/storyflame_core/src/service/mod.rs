//! Core use-case services.
//!
//! # Responsibility
//! - Hold the project store and the pure rules it applies.
//! - Keep hosts decoupled from codec and gateway details.

pub mod export;
pub mod ordering;
pub mod project_store;
