//! Integration tests for the connectome-delta pipeline.
//!
//! Real data end to end (seeded generators, no mocks):
//! - corpus → basis → projected records → decode within bound
//! - checksum sensitivity and its documented blind spot
//! - record capacity limits
//! - basis artifact persistence through the filesystem

mod helpers;
mod artifact_tests;
mod capacity_tests;
mod checksum_tests;
mod end_to_end_tests;
