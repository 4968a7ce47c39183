//! Canonical signature rendering and keccak256-derived selector/topic
//! computation (spec §4.1/§4.2).
//!
//! Grounded on the teacher's `chaincodec-evm::fingerprint::keccak256_signature`
//! (same `tiny_keccak::Keccak::v256` usage), generalized to also produce the
//! 4-byte function selector from the same hash.

use abicodec_core::{AbiType, TupleField};
use tiny_keccak::{Hasher, Keccak};

/// A single (possibly indexed) event parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct EventParam {
    pub name: String,
    pub ty: AbiType,
    pub indexed: bool,
}

impl EventParam {
    pub fn new(name: impl Into<String>, ty: AbiType, indexed: bool) -> Self {
        Self { name: name.into(), ty, indexed }
    }
}

/// A function definition: name, ordered inputs/outputs, and a selector
/// cached at construction time (never recomputed during decode).
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub inputs: Vec<TupleField>,
    pub outputs: Vec<TupleField>,
    selector: [u8; 4],
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, inputs: Vec<TupleField>, outputs: Vec<TupleField>) -> Self {
        let name = name.into();
        let selector = function_selector(&name, &inputs);
        Self { name, inputs, outputs, selector }
    }

    /// The canonical signature string, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        signature_string(&self.name, &self.inputs)
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn input_types(&self) -> Vec<AbiType> {
        self.inputs.iter().map(|f| f.ty.clone()).collect()
    }

    pub fn output_types(&self) -> Vec<AbiType> {
        self.outputs.iter().map(|f| f.ty.clone()).collect()
    }
}

/// An event definition: name, ordered (possibly indexed) inputs, and a
/// topic hash cached at construction time.
#[derive(Debug, Clone)]
pub struct EventDef {
    pub name: String,
    pub inputs: Vec<EventParam>,
    pub anonymous: bool,
    topic: [u8; 32],
}

impl EventDef {
    pub fn new(name: impl Into<String>, inputs: Vec<EventParam>, anonymous: bool) -> Self {
        let name = name.into();
        let fields: Vec<TupleField> = inputs
            .iter()
            .map(|p| TupleField::new(p.name.clone(), p.ty.clone()))
            .collect();
        let topic = event_topic(&name, &fields);
        Self { name, inputs, anonymous, topic }
    }

    pub fn signature(&self) -> String {
        let fields: Vec<TupleField> = self
            .inputs
            .iter()
            .map(|p| TupleField::new(p.name.clone(), p.ty.clone()))
            .collect();
        signature_string(&self.name, &fields)
    }

    pub fn topic(&self) -> [u8; 32] {
        self.topic
    }
}

/// `name(canonical(type1),canonical(type2),...)` — field names are dropped.
pub fn signature_string(name: &str, fields: &[TupleField]) -> String {
    format!("{name}{}", AbiType::Tuple(fields.to_vec()))
}

fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(bytes);
    hasher.finalize(&mut output);
    output
}

/// First 4 bytes of `keccak256(signature)`.
pub fn function_selector(name: &str, fields: &[TupleField]) -> [u8; 4] {
    let hash = keccak256(signature_string(name, fields).as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&hash[0..4]);
    sel
}

/// `keccak256(signature)`, used whole as the event's topic[0].
pub fn event_topic(name: &str, fields: &[TupleField]) -> [u8; 32] {
    keccak256(signature_string(name, fields).as_bytes())
}

pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
