//! Errors from parsing a Contract Interface Document. Kept distinct from
//! [`abicodec_core::AbiError`] because a malformed document is a
//! whole-document failure, not a single type-string or value failure.

use thiserror::Error;

use abicodec_core::AbiError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("entry #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: String },

    #[error("duplicate function `{name}` with identical signature")]
    DuplicateFunction { name: String },

    #[error("duplicate event `{name}` with identical signature")]
    DuplicateEvent { name: String },

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("malformed interface document: {0}")]
    Json(#[from] serde_json::Error),
}
