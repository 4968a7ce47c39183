//! Error types for the ABI codec kernel and the interface registry.

use thiserror::Error;

/// Errors that can occur while computing a signature, encoding a value
/// list, decoding call-data/return-data, or decoding an event log.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("unknown event: {name}")]
    UnknownEvent { name: String },

    #[error("selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch { expected: String, got: String },

    #[error("arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("type mismatch at `{path}`: value does not match declared type {expected}")]
    TypeMismatch { path: String, expected: String },

    #[error("value out of range for `{ty}` at `{path}`")]
    RangeError { ty: String, path: String },

    #[error("invalid type: {reason}")]
    InvalidType { reason: String },

    #[error("truncated input: expected at least {needed} bytes at offset {offset}, buffer has {available}")]
    Truncated {
        needed: usize,
        offset: usize,
        available: usize,
    },

    #[error("invalid offset {offset} while decoding `{path}` (buffer length {len})")]
    InvalidOffset {
        offset: usize,
        len: usize,
        path: String,
    },

    #[error("invalid UTF-8 in string payload at `{path}`")]
    InvalidUtf8 { path: String },

    #[error("not enough topics: expected {expected}, got {got}")]
    TopicCount { expected: usize, got: usize },

    #[error("type/recursion depth exceeds limit {limit}")]
    DepthExceeded { limit: usize },
}
