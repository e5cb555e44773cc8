//! Scenario tests for the full resolution pipeline.
//!
//! Unit tests next to each resolver cover a single stage. The tests here
//! drive whole matches through [`Simulation`](crate::simulation::Simulation):
//! - **Integration tests**: weapons, gates, bosses and modes end to end
//! - **Determinism tests**: same seed and inputs give the same event stream,
//!   across save and restore
//! - **Property tests**: blast idempotency, shield one-shot, split bounds
//!
//! # Test Structure
//!
//! - `helpers.rs`: quiet configurations and placement utilities
//! - `integration.rs`: end-to-end combat scenarios
//! - `determinism.rs`: replay and persistence checks
//! - `properties.rs`: proptest and statistical checks

mod helpers;

pub use helpers::*;
