//! Scenario, property and determinism tests.
//!
//! # Test Structure
//!
//! - `scenarios.rs`: end-to-end turns through a [`Session`](crate::Session)
//! - `properties.rs`: proptest laws for health, ranges and mitigation
//! - `determinism.rs`: same seed, same grid and event stream
//! - `helpers.rs`: world builders, scripted input and a recording presenter

mod helpers;
mod scenarios;

// Re-export for convenience
pub use helpers::*;
