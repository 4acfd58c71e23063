//! Flutter bridge crate for the job tracker.
//!
//! Only `api` is exposed to codegen; everything else stays in `jobtrack_core`.

pub mod api;
