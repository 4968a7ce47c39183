//! The ABI codec kernel's decode half (spec §4.4): inverse of the encoder.
//!
//! Grounded on `alloy-rs-core`'s `coder::decoder::Decoder`: a cursor over a
//! fixed buffer (`buf`/`offset`) whose `child(offset)` method hands back a
//! *fresh* decoder rooted at `offset` within the same buffer — never a
//! decoder threaded through with an absolute, accumulated position. Every
//! dynamic parameter is decoded through such a child, so tuple-relative
//! offsets are correct by construction rather than by careful bookkeeping.

use abicodec_core::{AbiError, AbiType, AbiValue, MAX_TYPE_DEPTH};
use alloy_primitives::{Address, I256, U256};

use crate::range::{check_int_range, check_uint_range};

/// A cursor over one layout "block" — the current buffer within which head
/// offsets are relative. `buf` never shrinks as the cursor advances; only
/// `offset` (the head-reading position) does, so `child()` can always slice
/// from `buf`'s own origin.
struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take_word(&self, offset: &mut usize) -> Result<[u8; 32], AbiError> {
        let start = *offset;
        let end = start + 32;
        if end > self.buf.len() {
            return Err(AbiError::Truncated {
                needed: 32,
                offset: start,
                available: self.buf.len().saturating_sub(start),
            });
        }
        let mut word = [0u8; 32];
        word.copy_from_slice(&self.buf[start..end]);
        *offset = end;
        Ok(word)
    }

    fn take_slice(&self, offset: &mut usize, len: usize) -> Result<&'a [u8], AbiError> {
        let start = *offset;
        let end = start + len;
        if end > self.buf.len() {
            return Err(AbiError::Truncated {
                needed: len,
                offset: start,
                available: self.buf.len().saturating_sub(start),
            });
        }
        *offset = end;
        Ok(&self.buf[start..end])
    }

    /// A fresh decoder rooted at `at` within this block — the key to
    /// tuple-relative offsets (see module docs).
    fn child(&self, at: usize) -> Result<Decoder<'a>, AbiError> {
        if at > self.buf.len() {
            return Err(AbiError::InvalidOffset {
                offset: at,
                len: self.buf.len(),
                path: String::new(),
            });
        }
        Ok(Decoder { buf: &self.buf[at..] })
    }
}

/// Decode a byte block against a type list.
///
/// Per spec §4.4: an empty/missing buffer with `k = 0` yields the empty
/// list; with `k > 0` it yields `k` absence sentinels rather than an error —
/// callers that require strictness check the result themselves.
pub fn decode_params(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    if data.is_empty() {
        return Ok(types.iter().map(sentinel_for).collect());
    }
    decode_sequence(types, data, 0)
}

/// Decode one parameter list from a self-contained block. `block` plays the
/// role of "the current block" from spec §4.3/§4.4: every dynamic field's
/// offset is resolved relative to `block`'s own start, not the outermost
/// buffer.
fn decode_sequence(types: &[AbiType], block: &[u8], depth: usize) -> Result<Vec<AbiValue>, AbiError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(AbiError::DepthExceeded { limit: MAX_TYPE_DEPTH });
    }
    let cur = Decoder::new(block);
    let mut head_cursor = 0usize;
    let head_size: usize = types.iter().map(AbiType::head_width).sum();
    let mut values = Vec::with_capacity(types.len());

    for (i, ty) in types.iter().enumerate() {
        if ty.is_dynamic() {
            let word = cur.take_word(&mut head_cursor)?;
            let offset = word_to_usize(&word)?;
            // Decoder may optionally enforce that a tail begins past its
            // head; this implementation does (open question, decided).
            if offset < head_size || offset > block.len() {
                return Err(AbiError::InvalidOffset {
                    offset,
                    len: block.len(),
                    path: format!("[{i}]"),
                });
            }
            let child = cur.child(offset)?;
            values.push(decode_dynamic_value(ty, &child, depth + 1)?);
        } else {
            values.push(decode_static_value(ty, &cur, &mut head_cursor, depth + 1)?);
        }
    }

    Ok(values)
}

/// Decode a static (fixed-width) value directly from the head at the
/// current cursor position, advancing it by the type's `encoded_size`.
fn decode_static_value(
    ty: &AbiType,
    cur: &Decoder,
    offset: &mut usize,
    depth: usize,
) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Uint(bits) => {
            let word = cur.take_word(offset)?;
            let value = U256::from_be_bytes(word);
            check_uint_range(value, *bits).map_err(|_| AbiError::RangeError {
                ty: ty.to_string(),
                path: String::new(),
            })?;
            Ok(AbiValue::Uint(value))
        }
        AbiType::Int(bits) => {
            let word = cur.take_word(offset)?;
            let value = I256::from_raw(U256::from_be_bytes(word));
            check_int_range(value, *bits).map_err(|_| AbiError::RangeError {
                ty: ty.to_string(),
                path: String::new(),
            })?;
            Ok(AbiValue::Int(value))
        }
        AbiType::Bool => {
            let word = cur.take_word(offset)?;
            Ok(AbiValue::Bool(word[31] != 0))
        }
        AbiType::Address => {
            let word = cur.take_word(offset)?;
            Ok(AbiValue::Address(Address::from_slice(&word[12..32])))
        }
        AbiType::FixedBytes(n) => {
            let word = cur.take_word(offset)?;
            Ok(AbiValue::FixedBytes(word[..*n as usize].to_vec()))
        }
        AbiType::FixedArray(elem, n) => {
            let size = ty.encoded_size();
            let slice = cur.take_slice(offset, size)?;
            let types: Vec<AbiType> = std::iter::repeat((**elem).clone()).take(*n).collect();
            let values = decode_sequence(&types, slice, depth)?;
            Ok(AbiValue::Array(values))
        }
        AbiType::Tuple(fields) => {
            let size = ty.encoded_size();
            let slice = cur.take_slice(offset, size)?;
            let types: Vec<AbiType> = fields.iter().map(|f| f.ty.clone()).collect();
            let values = decode_sequence(&types, slice, depth)?;
            Ok(AbiValue::Tuple(
                fields
                    .iter()
                    .zip(values)
                    .map(|(f, v)| (f.name.clone(), v))
                    .collect(),
            ))
        }
        AbiType::Bytes | AbiType::String | AbiType::DynamicArray(_) => {
            unreachable!("decode_static_value called on a dynamic type")
        }
    }
}

/// Decode a dynamic value from a child decoder already rooted at the
/// value's layout origin.
fn decode_dynamic_value(ty: &AbiType, dec: &Decoder, depth: usize) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Bytes => Ok(AbiValue::Bytes(decode_bytes_like(dec)?)),
        AbiType::String => {
            let bytes = decode_bytes_like(dec)?;
            String::from_utf8(bytes)
                .map(AbiValue::String)
                .map_err(|_| AbiError::InvalidUtf8 { path: String::new() })
        }
        AbiType::DynamicArray(elem) => {
            let len_word = read_word_at(dec.buf, 0)?;
            let len = word_to_usize(&len_word)?;
            let elems_block = dec
                .buf
                .get(32..)
                .ok_or_else(|| AbiError::Truncated {
                    needed: 32,
                    offset: 0,
                    available: dec.buf.len(),
                })?;
            let types: Vec<AbiType> = std::iter::repeat((**elem).clone()).take(len).collect();
            let values = decode_sequence(&types, elems_block, depth)?;
            Ok(AbiValue::Array(values))
        }
        AbiType::FixedArray(elem, n) => {
            let types: Vec<AbiType> = std::iter::repeat((**elem).clone()).take(*n).collect();
            let values = decode_sequence(&types, dec.buf, depth)?;
            Ok(AbiValue::Array(values))
        }
        AbiType::Tuple(fields) => {
            let types: Vec<AbiType> = fields.iter().map(|f| f.ty.clone()).collect();
            let values = decode_sequence(&types, dec.buf, depth)?;
            Ok(AbiValue::Tuple(
                fields
                    .iter()
                    .zip(values)
                    .map(|(f, v)| (f.name.clone(), v))
                    .collect(),
            ))
        }
        _ => unreachable!("decode_dynamic_value called on a static type"),
    }
}

fn decode_bytes_like(dec: &Decoder) -> Result<Vec<u8>, AbiError> {
    let len_word = read_word_at(dec.buf, 0)?;
    let len = word_to_usize(&len_word)?;
    let start = 32usize;
    let end = start.checked_add(len).ok_or(AbiError::InvalidOffset {
        offset: start,
        len: dec.buf.len(),
        path: String::new(),
    })?;
    if end > dec.buf.len() {
        return Err(AbiError::Truncated {
            needed: end,
            offset: start,
            available: dec.buf.len().saturating_sub(start),
        });
    }
    Ok(dec.buf[start..end].to_vec())
}

fn read_word_at(buf: &[u8], at: usize) -> Result<[u8; 32], AbiError> {
    if at + 32 > buf.len() {
        return Err(AbiError::Truncated {
            needed: 32,
            offset: at,
            available: buf.len().saturating_sub(at),
        });
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&buf[at..at + 32]);
    Ok(word)
}

fn word_to_usize(word: &[u8; 32]) -> Result<usize, AbiError> {
    let value = U256::from_be_bytes(*word);
    let max = U256::from(usize::MAX as u64);
    if value > max {
        return Err(AbiError::InvalidOffset {
            offset: usize::MAX,
            len: 0,
            path: String::new(),
        });
    }
    Ok(value.as_limbs()[0] as usize)
}

fn sentinel_for(ty: &AbiType) -> AbiValue {
    match ty {
        AbiType::Uint(_) => AbiValue::Uint(U256::ZERO),
        AbiType::Int(_) => AbiValue::Int(I256::ZERO),
        AbiType::Bool => AbiValue::Bool(false),
        AbiType::Address => AbiValue::Address(Address::ZERO),
        AbiType::FixedBytes(n) => AbiValue::FixedBytes(vec![0u8; *n as usize]),
        AbiType::Bytes => AbiValue::Bytes(Vec::new()),
        AbiType::String => AbiValue::String(String::new()),
        AbiType::FixedArray(elem, n) => AbiValue::Array((0..*n).map(|_| sentinel_for(elem)).collect()),
        AbiType::DynamicArray(_) => AbiValue::Array(Vec::new()),
        AbiType::Tuple(fields) => AbiValue::Tuple(
            fields
                .iter()
                .map(|f| (f.name.clone(), sentinel_for(&f.ty)))
                .collect(),
        ),
    }
}

/// Decode a single static value from an exactly-32-byte topic (used by the
/// Log Decoder for non-dynamic indexed parameters).
pub(crate) fn decode_single_static(ty: &AbiType, topic: &[u8; 32]) -> Result<AbiValue, AbiError> {
    let dec = Decoder::new(topic);
    let mut offset = 0usize;
    decode_static_value(ty, &dec, &mut offset, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_params;
    use abicodec_core::TupleField;
    use alloy_primitives::Address as AlloyAddress;

    fn addr(hex_str: &str) -> AlloyAddress {
        hex_str.parse().unwrap()
    }

    #[test]
    fn round_trip_address_uint256() {
        let types = vec![AbiType::Address, AbiType::Uint(256)];
        let values = vec![
            AbiValue::Address(addr("0x742d35Cc6634C0532925a3b8D8e9eED89B7A6de6")),
            AbiValue::Uint(U256::from(1_000_000_000_000_000_000u64)),
        ];
        let encoded = encode_params(&types, &values).unwrap();
        let decoded = decode_params(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn round_trip_bytes_and_uint() {
        let types = vec![AbiType::Bytes, AbiType::Uint(256)];
        let values = vec![
            AbiValue::Bytes(vec![0x12, 0x34]),
            AbiValue::Uint(U256::from(42u64)),
        ];
        let encoded = encode_params(&types, &values).unwrap();
        let decoded = decode_params(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn uint8_overflow_in_decode_is_range_error() {
        // value 256 placed in a uint8 slot — seed scenario 6.
        let mut word = [0u8; 32];
        word[30] = 0x01; // 0x0100 = 256
        let err = decode_params(&[AbiType::Uint(8)], &word).unwrap_err();
        assert!(matches!(err, AbiError::RangeError { .. }));
    }

    #[test]
    fn empty_buffer_with_zero_types_yields_empty_list() {
        assert_eq!(decode_params(&[], &[]).unwrap(), Vec::new());
    }

    #[test]
    fn empty_buffer_with_nonzero_types_yields_sentinels() {
        let decoded = decode_params(&[AbiType::Uint(256), AbiType::Bool], &[]).unwrap();
        assert_eq!(decoded, vec![AbiValue::Uint(U256::ZERO), AbiValue::Bool(false)]);
    }

    #[test]
    fn truncated_buffer_is_truncated_error() {
        let err = decode_params(&[AbiType::Uint(256)], &[0u8; 10]).unwrap_err();
        assert!(matches!(err, AbiError::Truncated { .. }));
    }

    #[test]
    fn nested_tuple_in_dynamic_array_round_trips() {
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
        let decoded = decode_params(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn fixed_array_zero_length_round_trips() {
        let types = vec![AbiType::FixedArray(Box::new(AbiType::Uint(256)), 0)];
        let values = vec![AbiValue::Array(vec![])];
        let encoded = encode_params(&types, &values).unwrap();
        assert!(encoded.is_empty());
        let decoded = decode_params(&types, &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn invalid_offset_beyond_buffer_is_rejected() {
        let mut buf = vec![0u8; 32];
        // offset word points far beyond the buffer
        buf[31] = 0xff;
        let err = decode_params(&[AbiType::Bytes], &buf).unwrap_err();
        assert!(matches!(err, AbiError::InvalidOffset { .. }));
    }
}
