//! Scenario and determinism tests for the whole encounter layer.
//!
//! - `determinism.rs`: same seed, same inputs, same run
//! - `integration.rs`: behaviours driven through the world's public entry points
//! - `helpers.rs`: collaborator doubles and fixtures

mod helpers;

pub use helpers::*;
