//! CAVP test-vector ingestion and verification.
//!
//! Re-export the public surface so callers can do
//! `use aes_harness::suites::cavp::*;`.

pub mod engine;
pub mod loader;
pub mod model;
pub mod runner;

pub use engine::*;
pub use loader::*;
pub use model::*;
pub use runner::*;
