//! # abicodec-core
//!
//! The type model shared by every other crate in the workspace: [`types::AbiType`]
//! (canonical signature rendering, the dynamism predicate, and the textual
//! type parser), [`types::AbiValue`] (decoded/to-be-encoded content), and the
//! [`error::AbiError`] kind shared by the encoder, decoder, and registry.

pub mod error;
pub mod types;

pub use error::AbiError;
pub use types::{AbiType, AbiValue, TupleField, MAX_TYPE_DEPTH};
