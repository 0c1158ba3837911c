//! Domain model for writing projects and their chapters.
//!
//! # Responsibility
//! - Define the value records shared by the store, codec and export paths.
//! - Keep records plain data: mutations build new values instead of editing
//!   stored ones in place.
//!
//! # Invariants
//! - Every project and chapter is identified by a stable UUID.
//! - Within one project, chapter `order` values form a dense `0..N-1` range
//!   once a store operation completes.

pub mod chapter;
pub mod project;
