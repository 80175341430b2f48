//! Conformance-test harness for external AES block-cipher tools.
//!
//! Nothing here implements cryptography. The harness feeds published
//! known-answer vectors (NIST CAVP `.rsp` archives and the SP800-38A
//! example vectors) to independently built `encrypt_block` /
//! `decrypt_block` style executables and checks their output, tallying
//! SUCCESS / FAILURE / ERROR / SKIPPED outcomes into a single verdict.

pub mod error;
pub mod model;
pub mod source;
pub mod suites;
pub mod tools;
