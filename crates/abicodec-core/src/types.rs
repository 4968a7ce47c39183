//! The ABI type model: [`AbiType`] (the tagged variant describing a parameter's
//! shape) and [`AbiValue`] (the parallel variant carrying decoded content).
//!
//! `AbiType` is the single source of truth for dynamism (`is_dynamic`) and for
//! canonical signature rendering (`Display`); the encoder and decoder both
//! consult it rather than re-deriving the rule, per the dynamism-closure
//! invariant.

use std::fmt;

use alloy_primitives::{Address, I256, U256};

use crate::error::AbiError;

/// Maximum nesting depth accepted by the type-string parser and by the
/// encoder/decoder's recursive walk. Guards against pathological
/// user-supplied type trees; real contracts rarely exceed a handful of
/// levels.
pub const MAX_TYPE_DEPTH: usize = 32;

/// A named field inside a [`AbiType::Tuple`]. The name is preserved for
/// decoded records but ignored when computing a canonical signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleField {
    pub name: String,
    pub ty: AbiType,
}

impl TupleField {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A parameter type in the VM's ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    Uint(u16),
    Int(u16),
    Bool,
    Address,
    FixedBytes(u8),
    Bytes,
    String,
    FixedArray(Box<AbiType>, usize),
    DynamicArray(Box<AbiType>),
    Tuple(Vec<TupleField>),
}

impl AbiType {
    /// Invariant D1: a type is dynamic iff it is `Bytes`, `String`, a
    /// `DynamicArray`, a `FixedArray` of a dynamic element, or a `Tuple`
    /// containing any dynamic field.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::DynamicArray(_) => true,
            AbiType::FixedArray(elem, _) => elem.is_dynamic(),
            AbiType::Tuple(fields) => fields.iter().any(|f| f.ty.is_dynamic()),
            _ => false,
        }
    }

    /// Width this type occupies in an encoded head: 32 (an offset slot) for
    /// dynamic types, `encoded_size()` for static ones.
    pub fn head_width(&self) -> usize {
        if self.is_dynamic() {
            32
        } else {
            self.encoded_size()
        }
    }

    /// Total encoded size in bytes. Only meaningful for static types — the
    /// size of a dynamic type depends on its value, not its type alone.
    pub fn encoded_size(&self) -> usize {
        match self {
            AbiType::Uint(_)
            | AbiType::Int(_)
            | AbiType::Bool
            | AbiType::Address
            | AbiType::FixedBytes(_) => 32,
            AbiType::FixedArray(elem, n) => elem.encoded_size() * n,
            AbiType::Tuple(fields) => fields.iter().map(|f| f.ty.encoded_size()).sum(),
            AbiType::Bytes | AbiType::String | AbiType::DynamicArray(_) => {
                unreachable!("encoded_size is only defined for static types")
            }
        }
    }

    /// Parse a canonical (or name-annotated) type string, e.g. `uint256`,
    /// `address[]`, or `(uint256 amount,address to)[3]`.
    pub fn parse(s: &str) -> Result<AbiType, AbiError> {
        let mut parser = TypeParser { bytes: s.as_bytes(), pos: 0 };
        let ty = parser.parse_type(0)?;
        parser.skip_ws();
        if parser.pos != parser.bytes.len() {
            return Err(AbiError::InvalidType {
                reason: format!("trailing characters in type string: {s:?}"),
            });
        }
        Ok(ty)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{bits}"),
            AbiType::Int(bits) => write!(f, "int{bits}"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Address => write!(f, "address"),
            AbiType::FixedBytes(n) => write!(f, "bytes{n}"),
            AbiType::Bytes => write!(f, "bytes"),
            AbiType::String => write!(f, "string"),
            AbiType::FixedArray(elem, n) => write!(f, "{elem}[{n}]"),
            AbiType::DynamicArray(elem) => write!(f, "{elem}[]"),
            AbiType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A decoded (or to-be-encoded) value, paired with an [`AbiType`] by
/// position when used in an argument/result list.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiValue {
    Uint(U256),
    Int(I256),
    Bool(bool),
    Address(Address),
    /// Always exactly the declared `n` bytes for a `FixedBytes(n)` value.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<AbiValue>),
    Tuple(Vec<(String, AbiValue)>),
}

impl AbiValue {
    /// Whether this value's shape matches `ty` structurally (not range —
    /// range is checked at the byte-layout boundary in the encoder).
    pub fn matches_type(&self, ty: &AbiType) -> bool {
        match (self, ty) {
            (AbiValue::Uint(_), AbiType::Uint(_)) => true,
            (AbiValue::Int(_), AbiType::Int(_)) => true,
            (AbiValue::Bool(_), AbiType::Bool) => true,
            (AbiValue::Address(_), AbiType::Address) => true,
            (AbiValue::FixedBytes(b), AbiType::FixedBytes(n)) => b.len() == *n as usize,
            (AbiValue::Bytes(_), AbiType::Bytes) => true,
            (AbiValue::String(_), AbiType::String) => true,
            (AbiValue::Array(vals), AbiType::FixedArray(elem, n)) => {
                vals.len() == *n && vals.iter().all(|v| v.matches_type(elem))
            }
            (AbiValue::Array(vals), AbiType::DynamicArray(elem)) => {
                vals.iter().all(|v| v.matches_type(elem))
            }
            (AbiValue::Tuple(vals), AbiType::Tuple(fields)) => {
                vals.len() == fields.len()
                    && vals
                        .iter()
                        .zip(fields.iter())
                        .all(|((_, v), f)| v.matches_type(&f.ty))
            }
            _ => false,
        }
    }
}

/// Single-pass, bracket-depth-tracking parser for canonical type strings.
/// Recursion (for tuples) naturally handles the "commas inside nested
/// tuples must not split the outer field list" requirement, since each
/// nested tuple consumes its own matching parentheses before returning.
struct TypeParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn parse_type(&mut self, depth: usize) -> Result<AbiType, AbiError> {
        if depth > MAX_TYPE_DEPTH {
            return Err(AbiError::InvalidType {
                reason: format!("type nesting exceeds depth limit {MAX_TYPE_DEPTH}"),
            });
        }
        self.skip_ws();
        let mut base = if self.peek() == Some(b'(') {
            self.parse_tuple(depth)?
        } else {
            self.parse_atomic()?
        };
        loop {
            self.skip_ws();
            if self.peek() != Some(b'[') {
                break;
            }
            self.pos += 1;
            let start = self.pos;
            while self.peek().map(|c| c != b']').unwrap_or(false) {
                self.pos += 1;
            }
            let inner = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
            if self.peek() != Some(b']') {
                return Err(AbiError::InvalidType {
                    reason: "unmatched '[' in type string".to_string(),
                });
            }
            self.pos += 1; // consume ']'
            base = if inner.is_empty() {
                AbiType::DynamicArray(Box::new(base))
            } else {
                let n: usize = inner.parse().map_err(|_| AbiError::InvalidType {
                    reason: format!("non-numeric array length: {inner:?}"),
                })?;
                AbiType::FixedArray(Box::new(base), n)
            };
        }
        Ok(base)
    }

    fn parse_tuple(&mut self, depth: usize) -> Result<AbiType, AbiError> {
        self.pos += 1; // consume '('
        let mut fields = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(AbiType::Tuple(fields));
        }
        loop {
            let ty = self.parse_type(depth + 1)?;
            self.skip_ws();
            let name = self.parse_optional_name();
            fields.push(TupleField::new(name, ty));
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    return Err(AbiError::InvalidType {
                        reason: "unmatched '(' in tuple type string".to_string(),
                    })
                }
            }
        }
        Ok(AbiType::Tuple(fields))
    }

    fn parse_optional_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_alphanumeric() || c == b'_')
            .unwrap_or(false)
        {
            self.pos += 1;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .unwrap_or("")
            .to_string()
    }

    fn parse_atomic(&mut self) -> Result<AbiType, AbiError> {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_alphanumeric())
            .unwrap_or(false)
        {
            self.pos += 1;
        }
        let token = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        if token.is_empty() {
            return Err(AbiError::InvalidType {
                reason: "expected a type token".to_string(),
            });
        }
        parse_atomic_token(token)
    }
}

/// Parse a single atomic type keyword (no array/tuple syntax).
fn parse_atomic_token(token: &str) -> Result<AbiType, AbiError> {
    match token {
        "uint" => Ok(AbiType::Uint(256)),
        "int" => Ok(AbiType::Int(256)),
        "bool" => Ok(AbiType::Bool),
        "address" => Ok(AbiType::Address),
        "bytes" => Ok(AbiType::Bytes),
        "string" => Ok(AbiType::String),
        _ if token.starts_with("uint") => {
            let bits: u16 = token[4..].parse().map_err(|_| AbiError::InvalidType {
                reason: format!("non-numeric uint width: {token:?}"),
            })?;
            validate_int_width(token, bits)?;
            Ok(AbiType::Uint(bits))
        }
        _ if token.starts_with("int") => {
            let bits: u16 = token[3..].parse().map_err(|_| AbiError::InvalidType {
                reason: format!("non-numeric int width: {token:?}"),
            })?;
            validate_int_width(token, bits)?;
            Ok(AbiType::Int(bits))
        }
        _ if token.starts_with("bytes") => {
            let n: u16 = token[5..].parse().map_err(|_| AbiError::InvalidType {
                reason: format!("non-numeric bytes width: {token:?}"),
            })?;
            if n == 0 || n > 32 {
                return Err(AbiError::InvalidType {
                    reason: format!("bytesN width out of range 1..=32: {token:?}"),
                });
            }
            Ok(AbiType::FixedBytes(n as u8))
        }
        _ => Err(AbiError::InvalidType {
            reason: format!("unknown base type token: {token:?}"),
        }),
    }
}

fn validate_int_width(token: &str, bits: u16) -> Result<(), AbiError> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::InvalidType {
            reason: format!("integer width must be a multiple of 8 in 8..=256: {token:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_type_display() {
        assert_eq!(AbiType::Uint(256).to_string(), "uint256");
        assert_eq!(AbiType::FixedBytes(32).to_string(), "bytes32");
        assert_eq!(
            AbiType::DynamicArray(Box::new(AbiType::Address)).to_string(),
            "address[]"
        );
        assert_eq!(
            AbiType::FixedArray(Box::new(AbiType::Uint(256)), 3).to_string(),
            "uint256[3]"
        );
        let tuple = AbiType::Tuple(vec![
            TupleField::new("amount", AbiType::Uint(256)),
            TupleField::new("to", AbiType::Address),
        ]);
        assert_eq!(tuple.to_string(), "(uint256,address)");
    }

    #[test]
    fn parse_atomics_and_bare_forms() {
        assert_eq!(AbiType::parse("uint").unwrap(), AbiType::Uint(256));
        assert_eq!(AbiType::parse("int").unwrap(), AbiType::Int(256));
        assert_eq!(AbiType::parse("uint8").unwrap(), AbiType::Uint(8));
        assert_eq!(AbiType::parse("bool").unwrap(), AbiType::Bool);
        assert_eq!(AbiType::parse("address").unwrap(), AbiType::Address);
        assert_eq!(AbiType::parse("bytes32").unwrap(), AbiType::FixedBytes(32));
        assert_eq!(AbiType::parse("bytes").unwrap(), AbiType::Bytes);
        assert_eq!(AbiType::parse("string").unwrap(), AbiType::String);
    }

    #[test]
    fn parse_arrays() {
        assert_eq!(
            AbiType::parse("address[]").unwrap(),
            AbiType::DynamicArray(Box::new(AbiType::Address))
        );
        assert_eq!(
            AbiType::parse("uint256[3]").unwrap(),
            AbiType::FixedArray(Box::new(AbiType::Uint(256)), 3)
        );
        assert_eq!(
            AbiType::parse("uint256[3][]").unwrap(),
            AbiType::DynamicArray(Box::new(AbiType::FixedArray(
                Box::new(AbiType::Uint(256)),
                3
            )))
        );
    }

    #[test]
    fn parse_tuples_with_names_and_nesting() {
        let ty = AbiType::parse("(uint256 amount,address to)").unwrap();
        assert_eq!(
            ty,
            AbiType::Tuple(vec![
                TupleField::new("amount", AbiType::Uint(256)),
                TupleField::new("to", AbiType::Address),
            ])
        );
        // nested tuple commas must not split the outer field list
        let ty = AbiType::parse("((uint256,uint256),bool)").unwrap();
        assert_eq!(
            ty,
            AbiType::Tuple(vec![
                TupleField::new(
                    "",
                    AbiType::Tuple(vec![
                        TupleField::new("", AbiType::Uint(256)),
                        TupleField::new("", AbiType::Uint(256)),
                    ])
                ),
                TupleField::new("", AbiType::Bool),
            ])
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(AbiType::parse("uintx").is_err());
        assert!(AbiType::parse("bytes33").is_err());
        assert!(AbiType::parse("uint7").is_err());
        assert!(AbiType::parse("(uint256,address").is_err());
        assert!(AbiType::parse("uint256)").is_err());
    }

    #[test]
    fn dynamism_predicate() {
        assert!(!AbiType::Uint(256).is_dynamic());
        assert!(AbiType::Bytes.is_dynamic());
        assert!(AbiType::String.is_dynamic());
        assert!(AbiType::DynamicArray(Box::new(AbiType::Uint(8))).is_dynamic());
        assert!(!AbiType::FixedArray(Box::new(AbiType::Uint(8)), 4).is_dynamic());
        assert!(AbiType::FixedArray(Box::new(AbiType::Bytes), 4).is_dynamic());
        let static_tuple = AbiType::Tuple(vec![TupleField::new("a", AbiType::Uint(8))]);
        assert!(!static_tuple.is_dynamic());
        let dynamic_tuple = AbiType::Tuple(vec![TupleField::new("a", AbiType::String)]);
        assert!(dynamic_tuple.is_dynamic());
    }

    #[test]
    fn head_width_matches_dynamism() {
        assert_eq!(AbiType::Uint(256).head_width(), 32);
        assert_eq!(AbiType::Bytes.head_width(), 32);
        assert_eq!(
            AbiType::FixedArray(Box::new(AbiType::Uint(256)), 4).head_width(),
            128
        );
    }
}
