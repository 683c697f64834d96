//! Repository layer over the statement builders.
//!
//! # Responsibility
//! - Offer select/insert/update/delete helpers that build, render and run
//!   statements through a borrowed adapter.
//! - Expose a capability trait that callers program against.
//!
//! # Invariants
//! - No operation runs without a configured adapter.
//! - The statement factory is created once per repository.

pub mod base_repo;
pub mod condition;
pub mod result_set;
