//! Library surface of the `scribe` binary: configuration loading and the
//! JSONL replay event source. Kept as a library so integration tests can
//! drive the same code paths the binary uses.

pub mod config;
pub mod jsonl;
