//! The three conformance suites: CAVP `.rsp` vectors, SP800-38A
//! known answers, and file round-trips.

pub mod cavp;
pub mod file;
pub mod nist;
