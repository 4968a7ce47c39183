//! Contract Interface Document parsing and the [`InterfaceRegistry`] facade
//! that exposes the public encode/decode operations by function/event name
//! (spec §6).
//!
//! Grounded on the teacher's `chaincodec-registry::memory::MemoryRegistry`
//! (`Inner { by_fingerprint, by_name_version, versions }` held behind an
//! index built once at load time) — generalized from chain-fingerprinted ABI
//! versions to a single document's functions and events, indexed by
//! selector/topic instead of by fingerprint/version.

use std::collections::HashMap;

use serde::Deserialize;

use abicodec_core::{AbiError, AbiType, AbiValue, TupleField, MAX_TYPE_DEPTH};
use abicodec_vm::{
    decode_log as vm_decode_log, decode_params as vm_decode_params, encode_params as vm_encode_params,
    signature::to_hex, DecodedLog, EventDef, EventParam, FunctionDef,
};

use crate::error::RegistryError;

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: String,
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(default)]
    anonymous: bool,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    indexed: bool,
    #[serde(default)]
    components: Vec<RawParam>,
}

fn apply_array_suffix(mut base: AbiType, suffix: &str) -> Result<AbiType, String> {
    let mut i = 0;
    while i < suffix.len() {
        if suffix.as_bytes()[i] != b'[' {
            return Err(format!("malformed array suffix {suffix:?}"));
        }
        let close = suffix[i..]
            .find(']')
            .map(|p| p + i)
            .ok_or_else(|| format!("unmatched '[' in array suffix {suffix:?}"))?;
        let inner = &suffix[i + 1..close];
        base = if inner.is_empty() {
            AbiType::DynamicArray(Box::new(base))
        } else {
            let n: usize = inner
                .parse()
                .map_err(|_| format!("non-numeric array length in {suffix:?}"))?;
            AbiType::FixedArray(Box::new(base), n)
        };
        i = close + 1;
    }
    Ok(base)
}

/// Mirrors `AbiType::parse`'s depth guard (`types.rs`'s `MAX_TYPE_DEPTH`):
/// a Contract Interface Document's `"components"` nesting reaches the
/// encoder/decoder exactly like a type string does, so it needs the same
/// guard against a pathological tuple-of-tuple-of-tuple… document.
fn abi_type_from_raw(index: usize, p: &RawParam, depth: usize) -> Result<AbiType, RegistryError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(RegistryError::MalformedEntry {
            index,
            reason: AbiError::DepthExceeded { limit: MAX_TYPE_DEPTH }.to_string(),
        });
    }
    if p.ty == "tuple" || p.ty.starts_with("tuple[") {
        let suffix = &p.ty["tuple".len()..];
        let fields = p
            .components
            .iter()
            .map(|c| Ok(TupleField::new(c.name.clone(), abi_type_from_raw(index, c, depth + 1)?)))
            .collect::<Result<Vec<_>, RegistryError>>()?;
        apply_array_suffix(AbiType::Tuple(fields), suffix)
            .map_err(|reason| RegistryError::MalformedEntry { index, reason })
    } else {
        AbiType::parse(&p.ty).map_err(|e| RegistryError::MalformedEntry {
            index,
            reason: e.to_string(),
        })
    }
}

fn fields_from_raw(index: usize, params: &[RawParam]) -> Result<Vec<TupleField>, RegistryError> {
    params
        .iter()
        .map(|p| Ok(TupleField::new(p.name.clone(), abi_type_from_raw(index, p, 0)?)))
        .collect()
}

fn function_from_raw(index: usize, entry: &RawEntry) -> Result<FunctionDef, RegistryError> {
    let name = entry.name.clone().ok_or_else(|| RegistryError::MissingField {
        index,
        field: "name".to_string(),
    })?;
    let inputs = fields_from_raw(index, &entry.inputs)?;
    let outputs = fields_from_raw(index, &entry.outputs)?;
    Ok(FunctionDef::new(name, inputs, outputs))
}

fn event_from_raw(index: usize, entry: &RawEntry) -> Result<EventDef, RegistryError> {
    let name = entry.name.clone().ok_or_else(|| RegistryError::MissingField {
        index,
        field: "name".to_string(),
    })?;
    let inputs = entry
        .inputs
        .iter()
        .map(|p| Ok(EventParam::new(p.name.clone(), abi_type_from_raw(index, p, 0)?, p.indexed)))
        .collect::<Result<Vec<_>, RegistryError>>()?;
    Ok(EventDef::new(name, inputs, entry.anonymous))
}

/// Functions and events parsed from a Contract Interface Document, indexed
/// by name, selector, and topic for the public operations below.
#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    functions_by_name: HashMap<String, Vec<FunctionDef>>,
    functions_by_selector: HashMap<[u8; 4], FunctionDef>,
    events_by_name: HashMap<String, Vec<EventDef>>,
    events_by_topic: HashMap<[u8; 32], EventDef>,
}

impl InterfaceRegistry {
    /// Parse a Contract Interface Document (a JSON array of function/event
    /// entries). Entries whose `type` is neither `"function"` nor `"event"`
    /// (constructor, fallback, receive) are accepted and ignored.
    pub fn from_document(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<RawEntry> = serde_json::from_str(json)?;
        let mut registry = InterfaceRegistry::default();
        for (index, entry) in entries.iter().enumerate() {
            match entry.kind.as_str() {
                "function" => {
                    let f = function_from_raw(index, entry)?;
                    if registry.functions_by_selector.contains_key(&f.selector()) {
                        return Err(RegistryError::DuplicateFunction { name: f.name.clone() });
                    }
                    registry
                        .functions_by_name
                        .entry(f.name.clone())
                        .or_default()
                        .push(f.clone());
                    registry.functions_by_selector.insert(f.selector(), f);
                }
                "event" => {
                    let e = event_from_raw(index, entry)?;
                    if registry.events_by_topic.contains_key(&e.topic()) {
                        return Err(RegistryError::DuplicateEvent { name: e.name.clone() });
                    }
                    registry
                        .events_by_name
                        .entry(e.name.clone())
                        .or_default()
                        .push(e.clone());
                    registry.events_by_topic.insert(e.topic(), e);
                }
                _ => {}
            }
        }
        Ok(registry)
    }

    /// Resolve a function by name. Errs with [`AbiError::UnknownFunction`] if
    /// no overload matches, and with [`AbiError::SelectorMismatch`] if more
    /// than one overload shares the name — the caller must disambiguate by
    /// selector via [`InterfaceRegistry::function_by_selector`].
    pub fn function(&self, name: &str) -> Result<&FunctionDef, AbiError> {
        match self.functions_by_name.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(AbiError::UnknownFunction { name: name.to_string() }),
            Some([f]) => Ok(f),
            Some(overloads) => Err(AbiError::SelectorMismatch {
                expected: overloads.iter().map(|f| to_hex(&f.selector())).collect::<Vec<_>>().join(", "),
                got: format!("ambiguous function name {name:?}; call by selector instead"),
            }),
        }
    }

    pub fn function_by_selector(&self, selector: &[u8; 4]) -> Result<&FunctionDef, AbiError> {
        self.functions_by_selector
            .get(selector)
            .ok_or_else(|| AbiError::UnknownFunction { name: to_hex(selector) })
    }

    pub fn event(&self, name: &str) -> Result<&EventDef, AbiError> {
        match self.events_by_name.get(name).map(Vec::as_slice) {
            None | Some([]) => Err(AbiError::UnknownEvent { name: name.to_string() }),
            Some([e]) => Ok(e),
            Some(overloads) => Err(AbiError::SelectorMismatch {
                expected: overloads.iter().map(|e| to_hex(&e.topic())).collect::<Vec<_>>().join(", "),
                got: format!("ambiguous event name {name:?}; call by topic instead"),
            }),
        }
    }

    pub fn event_by_topic(&self, topic: &[u8; 32]) -> Result<&EventDef, AbiError> {
        self.events_by_topic
            .get(topic)
            .ok_or_else(|| AbiError::UnknownEvent { name: to_hex(topic) })
    }

    /// Public operation: `encode_function(name, args)` — selector prepended
    /// to the head/tail encoding of `args` against the function's inputs.
    pub fn encode_function(&self, name: &str, args: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
        let f = self.function(name)?;
        let mut out = f.selector().to_vec();
        out.extend(vm_encode_params(&f.input_types(), args)?);
        Ok(out)
    }

    /// Public operation: `decode_function(name, call_data)` — verifies the
    /// leading 4-byte selector before decoding the remainder against the
    /// function's inputs.
    pub fn decode_function(&self, name: &str, call_data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        let f = self.function(name)?;
        if call_data.len() < 4 {
            return Err(AbiError::Truncated {
                needed: 4,
                offset: 0,
                available: call_data.len(),
            });
        }
        let (selector, body) = call_data.split_at(4);
        if selector != f.selector() {
            return Err(AbiError::SelectorMismatch {
                expected: to_hex(&f.selector()),
                got: to_hex(selector),
            });
        }
        vm_decode_params(&f.input_types(), body)
    }

    /// Public operation: `decode_function_result(name, bytes)` — decodes a
    /// call's return data against the function's declared outputs.
    pub fn decode_function_result(&self, name: &str, data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        let f = self.function(name)?;
        vm_decode_params(&f.output_types(), data)
    }

    /// Public operation: `encode_params(types, values)` — bare head/tail
    /// encoding with no selector, for callers that already hold a type list.
    pub fn encode_params(&self, types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
        vm_encode_params(types, values)
    }

    /// Public operation: `decode_params(types, bytes)` — the decoder's
    /// inverse of [`InterfaceRegistry::encode_params`].
    pub fn decode_params(&self, types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        vm_decode_params(types, data)
    }

    /// Public operation: `decode_log(data, topics, name)` — resolves the
    /// event by `name` if given, otherwise by `topics[0]`, then runs the Log
    /// Decoder.
    pub fn decode_log(&self, data: &[u8], topics: &[[u8; 32]], name: Option<&str>) -> Result<DecodedLog, AbiError> {
        let event = match name {
            Some(name) => self.event(name)?,
            None => {
                let topic0 = topics.first().ok_or(AbiError::TopicCount { expected: 1, got: 0 })?;
                self.event_by_topic(topic0)?
            }
        };
        vm_decode_log(event, data, topics)
    }

    /// Public operation: `function_selector(name)`.
    pub fn function_selector(&self, name: &str) -> Result<[u8; 4], AbiError> {
        self.function(name).map(FunctionDef::selector)
    }

    /// Public operation: `event_topic(name)`.
    pub fn event_topic(&self, name: &str) -> Result<[u8; 32], AbiError> {
        self.event(name).map(EventDef::topic)
    }
}
