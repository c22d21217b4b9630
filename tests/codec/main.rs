//! Codec integration tests: canonical encoding, strict decoding, containers.

#[path = "../common/mod.rs"]
mod common;

mod scenarios;
