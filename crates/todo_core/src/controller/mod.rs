//! Per-screen view state controllers.
//!
//! # Responsibility
//! - Hold screen state and publish it through `watch` channels.
//! - Translate UI events into use-case calls.
//!
//! # Invariants
//! - Every failure ends up in `error_message`; controllers never panic on
//!   use-case errors.
//! - State structs are plain values composed of their fields; no shared
//!   base type.

pub mod task_detail;
pub mod task_list;
