//! Log Decoder (spec §4.6): splits an event's parameters into indexed
//! (topics) and non-indexed (data), decodes each half, and merges them back
//! into a single named record in the event's original declaration order.
//!
//! Grounded on the teacher's `chaincodec-evm::decoder::EvmDecoder::decode_topic`/`decode_data`
//! split — in particular the rule that a dynamic-typed indexed parameter's
//! topic is the `keccak256` of its encoding, not the value, and is therefore
//! unrecoverable from the log alone.

use abicodec_core::{AbiError, AbiValue};

use crate::decoder::{decode_params, decode_single_static};
use crate::signature::EventDef;

/// A decoded event log: the event name plus its arguments in declaration
/// order. Unnamed parameters receive synthetic names `field0`, `field1`, ….
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub name: String,
    pub args: Vec<(String, AbiValue)>,
}

impl DecodedLog {
    pub fn get(&self, name: &str) -> Option<&AbiValue> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Decode a log's `data` and `topics` against an [`EventDef`].
///
/// `topics[0]` is assumed to already match `event.topic()` for non-anonymous
/// events — this function does not re-check it, matching spec §4.6 step 1
/// ("the caller ensures it matches").
pub fn decode_log(event: &EventDef, data: &[u8], topics: &[[u8; 32]]) -> Result<DecodedLog, AbiError> {
    let topic_skip = usize::from(!event.anonymous);
    let indexed_count = event.inputs.iter().filter(|p| p.indexed).count();
    if topics.len() < topic_skip + indexed_count {
        return Err(AbiError::TopicCount {
            expected: topic_skip + indexed_count,
            got: topics.len(),
        });
    }

    let mut indexed_values = Vec::with_capacity(indexed_count);
    let mut next_topic = topic_skip;
    for param in event.inputs.iter().filter(|p| p.indexed) {
        let topic = &topics[next_topic];
        next_topic += 1;
        let value = if param.ty.is_dynamic() {
            // Reference types are hashed in indexed position; the original
            // value is unrecoverable from the log alone (spec §4.6 step 3).
            AbiValue::Bytes(topic.to_vec())
        } else {
            decode_single_static(&param.ty, topic)?
        };
        indexed_values.push(value);
    }

    let non_indexed_types: Vec<_> = event
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| p.ty.clone())
        .collect();
    let non_indexed_values = decode_params(&non_indexed_types, data)?;

    let mut indexed_iter = indexed_values.into_iter();
    let mut non_indexed_iter = non_indexed_values.into_iter();
    let mut args = Vec::with_capacity(event.inputs.len());
    for (i, param) in event.inputs.iter().enumerate() {
        let name = if param.name.is_empty() {
            format!("field{i}")
        } else {
            param.name.clone()
        };
        let value = if param.indexed {
            indexed_iter
                .next()
                .expect("one value computed per indexed parameter above")
        } else {
            non_indexed_iter
                .next()
                .expect("one value computed per non-indexed parameter above")
        };
        args.push((name, value));
    }

    Ok(DecodedLog {
        name: event.name.clone(),
        args,
    })
}
