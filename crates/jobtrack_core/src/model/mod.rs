//! Domain model for tracked job applications and UI preferences.
//!
//! # Responsibility
//! - Define the canonical record shape persisted in the key-value store.
//! - Define form-side input and its presence validation.
//!
//! # Invariants
//! - Every record is identified by a stable, non-empty `JobId`.
//! - Deletion is a hard delete; ids are still never reissued within a process.

pub mod job;
pub mod theme;
