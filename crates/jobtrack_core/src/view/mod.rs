//! Read-side projections over record snapshots.
//!
//! # Responsibility
//! - Derive filtered views, aggregate counts and follow-up reminders.
//! - Project session state into a presentation-agnostic display model.
//!
//! # Invariants
//! - Every function here is pure: inputs are borrowed and never mutated.

pub mod display;
pub mod filter;
pub mod reminder;
