//! Persistence layer: the key-value adapter and the record store over it.
//!
//! # Responsibility
//! - Isolate SQLite details behind the `KeyValueStore` contract.
//! - Own the ordered record sequence and persist it on every mutation.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to storage transport errors.

pub mod job_repo;
pub mod kv_repo;
