//! Vigil — file integrity monitoring.
//!
//! Establishes a cryptographic and metadata baseline for a configured set
//! of filesystem paths, then re-scans and reports drift: files added,
//! removed, or modified relative to the baseline.

pub mod cli;
pub mod core;
