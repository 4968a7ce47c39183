//! # abicodec-registry
//!
//! The Interface Registry: parses a Contract Interface Document into an
//! [`InterfaceRegistry`] indexed by function/event name, selector, and
//! topic, and exposes the public encode/decode operations as methods on it
//! ([`interface`]). [`receipt`] adds the batch-oriented Receipt Helpers
//! built on top of the registry and the Log Decoder.

pub mod error;
pub mod interface;
pub mod receipt;

pub use error::RegistryError;
pub use interface::InterfaceRegistry;
pub use receipt::{decode_receipt_logs, decode_receipt_logs_by_name, DecodedLogRecord, RawLog};
