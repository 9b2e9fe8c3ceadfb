//! Baseline/diff engine — matching, hashing, storage, drift classification.

pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod matcher;
pub mod store;
pub mod types;
