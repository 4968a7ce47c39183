//! Converts between `serde_json::Value` (the CLI's argument/output wire
//! format) and [`AbiValue`] — numbers large enough to overflow `u64`
//! (`uint256`, `int256`) travel as decimal or `0x`-prefixed strings, never
//! as JSON numbers.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use abicodec_core::{AbiType, AbiValue};
use alloy_primitives::{Address, I256, U256};

fn json_as_str(json: &Value) -> Result<String> {
    match json {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(anyhow!("expected a string or number, got {other}")),
    }
}

pub fn value_from_json(ty: &AbiType, json: &Value) -> Result<AbiValue> {
    match ty {
        AbiType::Uint(_) => {
            let s = json_as_str(json)?;
            Ok(AbiValue::Uint(s.parse::<U256>().with_context(|| format!("parsing uint value {s:?}"))?))
        }
        AbiType::Int(_) => {
            let s = json_as_str(json)?;
            Ok(AbiValue::Int(s.parse::<I256>().with_context(|| format!("parsing int value {s:?}"))?))
        }
        AbiType::Bool => Ok(AbiValue::Bool(json.as_bool().ok_or_else(|| anyhow!("expected a bool"))?)),
        AbiType::Address => {
            let s = json.as_str().ok_or_else(|| anyhow!("expected an address string"))?;
            Ok(AbiValue::Address(s.parse::<Address>().with_context(|| format!("parsing address {s:?}"))?))
        }
        AbiType::FixedBytes(n) => {
            let s = json.as_str().ok_or_else(|| anyhow!("expected a hex string"))?;
            let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s)).with_context(|| format!("parsing bytes{n} value {s:?}"))?;
            if bytes.len() != *n as usize {
                return Err(anyhow!("expected {n} bytes for bytes{n}, got {}", bytes.len()));
            }
            Ok(AbiValue::FixedBytes(bytes))
        }
        AbiType::Bytes => {
            let s = json.as_str().ok_or_else(|| anyhow!("expected a hex string"))?;
            Ok(AbiValue::Bytes(
                hex::decode(s.strip_prefix("0x").unwrap_or(s)).with_context(|| format!("parsing bytes value {s:?}"))?,
            ))
        }
        AbiType::String => Ok(AbiValue::String(
            json.as_str().ok_or_else(|| anyhow!("expected a string"))?.to_string(),
        )),
        AbiType::FixedArray(elem, n) => {
            let arr = json.as_array().ok_or_else(|| anyhow!("expected a JSON array"))?;
            if arr.len() != *n {
                return Err(anyhow!("expected {n} elements, got {}", arr.len()));
            }
            Ok(AbiValue::Array(
                arr.iter().map(|v| value_from_json(elem, v)).collect::<Result<_>>()?,
            ))
        }
        AbiType::DynamicArray(elem) => {
            let arr = json.as_array().ok_or_else(|| anyhow!("expected a JSON array"))?;
            Ok(AbiValue::Array(
                arr.iter().map(|v| value_from_json(elem, v)).collect::<Result<_>>()?,
            ))
        }
        AbiType::Tuple(fields) => {
            let arr = json.as_array().ok_or_else(|| anyhow!("expected a JSON array for a tuple value"))?;
            if arr.len() != fields.len() {
                return Err(anyhow!("expected {} tuple fields, got {}", fields.len(), arr.len()));
            }
            let values = fields
                .iter()
                .zip(arr.iter())
                .map(|(f, v)| Ok((f.name.clone(), value_from_json(&f.ty, v)?)))
                .collect::<Result<_>>()?;
            Ok(AbiValue::Tuple(values))
        }
    }
}

pub fn values_from_json_array(types: &[AbiType], json: &str) -> Result<Vec<AbiValue>> {
    let parsed: Vec<Value> = serde_json::from_str(json).context("--args is not a JSON array")?;
    if parsed.len() != types.len() {
        return Err(anyhow!("expected {} arguments, got {}", types.len(), parsed.len()));
    }
    types.iter().zip(parsed.iter()).map(|(t, v)| value_from_json(t, v)).collect()
}

pub fn abi_value_to_json(v: &AbiValue) -> Value {
    match v {
        AbiValue::Uint(u) => Value::String(u.to_string()),
        AbiValue::Int(i) => Value::String(i.to_string()),
        AbiValue::Bool(b) => Value::Bool(*b),
        AbiValue::Address(a) => Value::String(a.to_string().to_lowercase()),
        AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),
        AbiValue::String(s) => Value::String(s.clone()),
        AbiValue::Array(items) => Value::Array(items.iter().map(abi_value_to_json).collect()),
        AbiValue::Tuple(fields) => {
            let mut map = serde_json::Map::new();
            for (i, (name, val)) in fields.iter().enumerate() {
                let key = if name.is_empty() { format!("field{i}") } else { name.clone() };
                map.insert(key, abi_value_to_json(val));
            }
            Value::Object(map)
        }
    }
}

pub fn abi_value_to_display(v: &AbiValue) -> String {
    match v {
        AbiValue::Uint(u) => u.to_string(),
        AbiValue::Int(i) => i.to_string(),
        AbiValue::Bool(b) => b.to_string(),
        AbiValue::Address(a) => a.to_string().to_lowercase(),
        AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        AbiValue::String(s) => s.clone(),
        AbiValue::Array(items) => format!(
            "[{}]",
            items.iter().map(abi_value_to_display).collect::<Vec<_>>().join(", ")
        ),
        AbiValue::Tuple(fields) => format!(
            "({})",
            fields
                .iter()
                .map(|(n, v)| format!("{n}={}", abi_value_to_display(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_uint_and_address_through_json() {
        let ty = AbiType::Uint(256);
        let json = Value::String("1000000000000000000".to_string());
        let value = value_from_json(&ty, &json).unwrap();
        assert_eq!(value, AbiValue::Uint(U256::from(1_000_000_000_000_000_000u64)));
        assert_eq!(abi_value_to_json(&value), json);
    }

    #[test]
    fn rejects_wrong_array_length() {
        let ty = AbiType::FixedArray(Box::new(AbiType::Uint(8)), 3);
        let json: Value = serde_json::from_str("[1,2]").unwrap();
        assert!(value_from_json(&ty, &json).is_err());
    }
}
