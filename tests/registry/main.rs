//! Registry integration tests, including the process-wide registry.
//!
//! The process-wide registry can be installed once per process, so every
//! test touching it lives in this binary.

#[path = "../common/mod.rs"]
mod common;

mod local;
