//! The ABI codec kernel's encode half (spec §4.3): a recursive, offset-driven
//! head/tail layout algorithm.
//!
//! Every recursive call produces its own head+tail pair and concatenates
//! them before returning, so a dynamic field nested inside a tuple or array
//! is always encoded relative to *that entity's own* layout origin — the
//! tuple-relative-offset invariant spec.md's Design Notes call the most
//! common source of off-by-one bugs. Grounded structurally on
//! `alloy-rs-core`'s `Decoder::child` pattern (the same relativity rule,
//! applied on the decode side).

use abicodec_core::{AbiError, AbiType, AbiValue, MAX_TYPE_DEPTH};
use alloy_primitives::U256;

use crate::range::{check_int_range, check_uint_range};

/// Encode a parameter list against its matching type list.
///
/// Invariant E1: the result's length is always a multiple of 32.
pub fn encode_params(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            got: values.len(),
        });
    }
    encode_sequence(types, values, 0)
}

/// Encode one parameter list as a self-contained head/tail block. Called
/// recursively for tuples and arrays so that each entity's dynamic children
/// are offset relative to *this* block, not the outermost buffer.
fn encode_sequence(types: &[AbiType], values: &[AbiValue], depth: usize) -> Result<Vec<u8>, AbiError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(AbiError::DepthExceeded { limit: MAX_TYPE_DEPTH });
    }
    let head_size: usize = types.iter().map(AbiType::head_width).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (i, (ty, val)) in types.iter().zip(values.iter()).enumerate() {
        if !val.matches_type(ty) {
            return Err(AbiError::TypeMismatch {
                path: format!("[{i}]"),
                expected: ty.to_string(),
            });
        }
        if ty.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend_from_slice(&encode_uint_word(U256::from(offset as u64)));
            tail.extend_from_slice(&encode_value(ty, val, depth + 1)?);
        } else {
            head.extend_from_slice(&encode_value(ty, val, depth + 1)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Encode a single value against its type. For composite types this
/// recurses into `encode_sequence`, producing the nested entity's own
/// head/tail block.
fn encode_value(ty: &AbiType, val: &AbiValue, depth: usize) -> Result<Vec<u8>, AbiError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(AbiError::DepthExceeded { limit: MAX_TYPE_DEPTH });
    }
    match (ty, val) {
        (AbiType::Uint(bits), AbiValue::Uint(v)) => {
            check_uint_range(*v, *bits).map_err(|_| AbiError::RangeError {
                ty: ty.to_string(),
                path: String::new(),
            })?;
            Ok(encode_uint_word(*v))
        }
        (AbiType::Int(bits), AbiValue::Int(v)) => {
            check_int_range(*v, *bits).map_err(|_| AbiError::RangeError {
                ty: ty.to_string(),
                path: String::new(),
            })?;
            Ok(v.to_be_bytes::<32>().to_vec())
        }
        (AbiType::Bool, AbiValue::Bool(b)) => {
            let mut word = [0u8; 32];
            word[31] = u8::from(*b);
            Ok(word.to_vec())
        }
        (AbiType::Address, AbiValue::Address(a)) => {
            let mut word = [0u8; 32];
            word[12..32].copy_from_slice(a.as_slice());
            Ok(word.to_vec())
        }
        (AbiType::FixedBytes(n), AbiValue::FixedBytes(b)) => {
            let mut word = [0u8; 32];
            word[..*n as usize].copy_from_slice(b);
            Ok(word.to_vec())
        }
        (AbiType::Bytes, AbiValue::Bytes(b)) => Ok(encode_bytes_like(b)),
        (AbiType::String, AbiValue::String(s)) => Ok(encode_bytes_like(s.as_bytes())),
        (AbiType::FixedArray(elem, n), AbiValue::Array(vals)) => {
            let types: Vec<AbiType> = std::iter::repeat((**elem).clone()).take(*n).collect();
            encode_sequence(&types, vals, depth)
        }
        (AbiType::DynamicArray(elem), AbiValue::Array(vals)) => {
            let mut out = encode_uint_word(U256::from(vals.len() as u64));
            let types: Vec<AbiType> = std::iter::repeat((**elem).clone()).take(vals.len()).collect();
            out.extend_from_slice(&encode_sequence(&types, vals, depth)?);
            Ok(out)
        }
        (AbiType::Tuple(fields), AbiValue::Tuple(vals)) => {
            let types: Vec<AbiType> = fields.iter().map(|f| f.ty.clone()).collect();
            let values: Vec<AbiValue> = vals.iter().map(|(_, v)| v.clone()).collect();
            encode_sequence(&types, &values, depth)
        }
        _ => Err(AbiError::TypeMismatch {
            path: String::new(),
            expected: ty.to_string(),
        }),
    }
}

/// Length word followed by the payload, right-padded to the next multiple
/// of 32 (invariant E3: padding bytes are zero).
fn encode_bytes_like(payload: &[u8]) -> Vec<u8> {
    let mut out = encode_uint_word(U256::from(payload.len() as u64));
    out.extend_from_slice(payload);
    let padded_len = payload.len().div_ceil(32) * 32;
    out.resize(32 + padded_len, 0);
    out
}

fn encode_uint_word(value: U256) -> Vec<u8> {
    value.to_be_bytes::<32>().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use abicodec_core::TupleField;
    use alloy_primitives::I256;

    fn addr(hex_str: &str) -> alloy_primitives::Address {
        hex_str.parse().unwrap()
    }

    #[test]
    fn encode_address_uint256_pair() {
        // Scenario 1 from spec.md §8.
        let types = vec![AbiType::Address, AbiType::Uint(256)];
        let values = vec![
            AbiValue::Address(addr("0x742d35Cc6634C0532925a3b8D8e9eED89B7A6de6")),
            AbiValue::Uint(U256::from(1_000_000_000_000_000_000u64)),
        ];
        let encoded = encode_params(&types, &values).unwrap();
        let expected_hex = "000000000000000000000000742d35cc6634c0532925a3b8d8e9eed89b7a6de6\
0000000000000000000000000000000000000000000000000de0b6b3a7640000";
        assert_eq!(hex::encode(&encoded), expected_hex);
    }

    #[test]
    fn encode_bytes_and_uint_seed_scenario() {
        // Scenario 5 from spec.md §8.
        let types = vec![AbiType::Bytes, AbiType::Uint(256)];
        let values = vec![
            AbiValue::Bytes(vec![0x12, 0x34]),
            AbiValue::Uint(U256::from(42u64)),
        ];
        let encoded = encode_params(&types, &values).unwrap();
        assert_eq!(encoded.len() % 32, 0);
        // head: offset(0x40) | word(42)
        assert_eq!(&encoded[0..32], &U256::from(0x40u64).to_be_bytes::<32>());
        assert_eq!(&encoded[32..64], &U256::from(42u64).to_be_bytes::<32>());
        // tail: length(2) | 0x1234 padded to 32 bytes
        assert_eq!(&encoded[64..96], &U256::from(2u64).to_be_bytes::<32>());
        assert_eq!(&encoded[96..98], &[0x12, 0x34]);
        assert!(encoded[98..128].iter().all(|b| *b == 0));
    }

    #[test]
    fn bytes_zero_length_encodes_to_one_word() {
        let encoded = encode_bytes_like(&[]);
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded, U256::ZERO.to_be_bytes::<32>().to_vec());
    }

    #[test]
    fn fixed_array_of_zero_length_encodes_empty() {
        let ty = AbiType::FixedArray(Box::new(AbiType::Uint(256)), 0);
        let val = AbiValue::Array(vec![]);
        let encoded = encode_value(&ty, &val, 0).unwrap();
        assert!(encoded.is_empty());
    }

    #[test]
    fn uint8_overflow_is_range_error() {
        let types = vec![AbiType::Uint(8)];
        let values = vec![AbiValue::Uint(U256::from(256u64))];
        let err = encode_params(&types, &values).unwrap_err();
        assert!(matches!(err, AbiError::RangeError { .. }));
    }

    #[test]
    fn int8_negative_one_is_all_ff() {
        let types = vec![AbiType::Int(8)];
        let values = vec![AbiValue::Int(I256::try_from(-1i64).unwrap())];
        let encoded = encode_params(&types, &values).unwrap();
        assert!(encoded.iter().all(|b| *b == 0xff));
    }

    #[test]
    fn arity_mismatch_rejected() {
        let types = vec![AbiType::Uint(256)];
        let values = vec![];
        assert!(matches!(
            encode_params(&types, &values),
            Err(AbiError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn type_mismatch_rejected() {
        let types = vec![AbiType::Address];
        let values = vec![AbiValue::Uint(U256::from(1u64))];
        assert!(matches!(
            encode_params(&types, &values),
            Err(AbiError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn nested_tuple_offsets_are_self_relative() {
        // A tuple containing a dynamic field, nested inside a dynamic array —
        // if offsets were computed relative to the outermost buffer instead
        // of each entity's own block, this would corrupt.
        let inner_tuple = AbiType::Tuple(vec![
            TupleField::new("label", AbiType::String),
            TupleField::new("amount", AbiType::Uint(256)),
        ]);
        let types = vec![AbiType::DynamicArray(Box::new(inner_tuple))];
        let values = vec![AbiValue::Array(vec![
            AbiValue::Tuple(vec![
                ("label".into(), AbiValue::String("a".into())),
                ("amount".into(), AbiValue::Uint(U256::from(1u64))),
            ]),
            AbiValue::Tuple(vec![
                ("label".into(), AbiValue::String("bb".into())),
                ("amount".into(), AbiValue::Uint(U256::from(2u64))),
            ]),
        ])];
        let encoded = encode_params(&types, &values).unwrap();
        assert_eq!(encoded.len() % 32, 0);

        let decoded = crate::decoder::decode_params(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }
}
