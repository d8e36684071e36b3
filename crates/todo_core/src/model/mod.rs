//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define canonical data structures used by use-cases and controllers.
//! - Keep storage record shapes out of domain signatures.
//!
//! # Invariants
//! - Every persisted task is identified by a stable, never-reused `TaskId`.

pub mod outcome;
pub mod task;
