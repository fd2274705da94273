//! Integration tests for connectome-shimmer.
//!
//! Seeded clustered corpora with known label anomalies:
//! - boundary bounds and the mislabeled/untagged cases
//! - full engine run, determinism and record writeback
//! - neighbor preservation through a projected delta round trip

mod helpers;
mod boundary_tests;
mod engine_tests;
mod fidelity_tests;
