//! # abicodec-vm
//!
//! The ABI codec kernel: canonical signature/selector/topic computation
//! ([`signature`]), the recursive head/tail encoder ([`encoder`]) and
//! decoder ([`decoder`]), and the Log Decoder built on top of the decoder
//! ([`logdecoder`]).
//!
//! Pure and stateless — no module here performs I/O or logging; ambient
//! concerns (tracing, CLI error rendering) live one layer up, in `cli`.

mod range;

pub mod decoder;
pub mod encoder;
pub mod logdecoder;
pub mod signature;

pub use decoder::decode_params;
pub use encoder::encode_params;
pub use logdecoder::{decode_log, DecodedLog};
pub use signature::{event_topic, function_selector, EventDef, EventParam, FunctionDef};
