//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep controllers and FFI layers decoupled from storage details.

pub mod task_use_cases;
