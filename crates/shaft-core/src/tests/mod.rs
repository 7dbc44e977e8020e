//! Crate-level test suites.
//!
//! - `helpers.rs`: board builders and session drivers shared by every test
//! - `determinism.rs`: same seed and same inputs give the same results
//! - `integration.rs`: full session scenarios through the queue
//! - `properties.rs`: property tests over generated boards and inputs

mod determinism;
pub(crate) mod helpers;
