//! Session-level use cases.
//!
//! # Responsibility
//! - Route explicit commands through the record store's public contract.
//! - Keep UI/FFI/CLI layers decoupled from storage details.

pub mod theme_service;
pub mod tracker_service;
