//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the raw record store contract (`TaskStore`) and its SQLite
//!   implementation.
//! - Map stored records to domain tasks.
//! - Expose a domain-shaped facade that normalizes faults and publishes the
//!   live task list.
//!
//! # Invariants
//! - Store faults never cross the repository boundary untranslated.

pub mod mapper;
pub mod task_repository;
pub mod task_store;
