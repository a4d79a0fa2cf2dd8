//! Decoded ABI values.

use super::errors::AbiError;
use super::types::ParamType;
use shared_types::{Address, U256};

/// A value that can be ABI-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Bool(bool),
    Uint(U256),
    /// Two's-complement representation.
    Int(U256),
    String(String),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    /// Whether this value lives in the tail of an encoding.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String(_) | Self::Bytes(_) | Self::Array(_) => true,
            Self::FixedArray(items) | Self::Tuple(items) => items.iter().any(Self::is_dynamic),
            _ => false,
        }
    }

    /// Whether this value can be encoded as `kind`.
    #[must_use]
    pub fn matches(&self, kind: &ParamType) -> bool {
        match (self, kind) {
            (Self::Address(_), ParamType::Address)
            | (Self::Bool(_), ParamType::Bool)
            | (Self::String(_), ParamType::String)
            | (Self::Bytes(_), ParamType::Bytes) => true,
            (Self::Uint(v), ParamType::Uint(bits)) => v.bits() <= *bits,
            (Self::Int(_), ParamType::Int(_)) => true,
            (Self::FixedBytes(b), ParamType::FixedBytes(n)) => b.len() == *n,
            (Self::Array(items), ParamType::Array(inner)) => items.iter().all(|t| t.matches(inner)),
            (Self::FixedArray(items), ParamType::FixedArray(inner, n)) => {
                items.len() == *n && items.iter().all(|t| t.matches(inner))
            }
            (Self::Tuple(items), ParamType::Tuple(kinds)) => {
                items.len() == kinds.len() && items.iter().zip(kinds).all(|(t, k)| t.matches(k))
            }
            _ => false,
        }
    }

    fn kind_name(&self) -> String {
        match self {
            Self::Address(_) => "address".into(),
            Self::Bool(_) => "bool".into(),
            Self::Uint(_) => "uint".into(),
            Self::Int(_) => "int".into(),
            Self::String(_) => "string".into(),
            Self::Bytes(_) => "bytes".into(),
            Self::FixedBytes(b) => format!("bytes{}", b.len()),
            Self::Array(_) => "array".into(),
            Self::FixedArray(_) => "fixed array".into(),
            Self::Tuple(_) => "tuple".into(),
        }
    }

    fn unexpected(&self, expected: &'static str) -> AbiError {
        AbiError::UnexpectedToken {
            expected,
            found: self.kind_name(),
        }
    }

    pub fn into_address(self) -> Result<Address, AbiError> {
        match self {
            Self::Address(a) => Ok(a),
            other => Err(other.unexpected("address")),
        }
    }

    pub fn into_bool(self) -> Result<bool, AbiError> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(other.unexpected("bool")),
        }
    }

    pub fn into_uint(self) -> Result<U256, AbiError> {
        match self {
            Self::Uint(v) | Self::Int(v) => Ok(v),
            other => Err(other.unexpected("uint")),
        }
    }

    /// Unsigned value that must fit in 64 bits (timestamps, small enums).
    pub fn into_u64(self) -> Result<u64, AbiError> {
        let v = self.into_uint()?;
        if v > U256::from(u64::MAX) {
            return Err(AbiError::InvalidData(format!("{v} does not fit in 64 bits")));
        }
        Ok(v.low_u64())
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.unexpected("string")),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, AbiError> {
        match self {
            Self::Bytes(b) | Self::FixedBytes(b) => Ok(b),
            other => Err(other.unexpected("bytes")),
        }
    }

    /// Elements of an array or fixed array.
    pub fn into_array(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Self::Array(items) | Self::FixedArray(items) => Ok(items),
            other => Err(other.unexpected("array")),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Self::Tuple(items) => Ok(items),
            other => Err(other.unexpected("tuple")),
        }
    }
}

impl From<Address> for Token {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<U256> for Token {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<u64> for Token {
    fn from(v: u64) -> Self {
        Self::Uint(U256::from(v))
    }
}

impl From<u8> for Token {
    fn from(v: u8) -> Self {
        Self::Uint(U256::from(v))
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Sequential reader over the fields of a decoded tuple.
pub struct TupleReader {
    items: std::vec::IntoIter<Token>,
    position: usize,
}

impl TupleReader {
    /// Read the fields of `token`, which must be a tuple.
    pub fn new(token: Token) -> Result<Self, AbiError> {
        Ok(Self::from_tokens(token.into_tuple()?))
    }

    /// Read a flat list of return values.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            items: tokens.into_iter(),
            position: 0,
        }
    }

    /// Next raw field.
    pub fn next_token(&mut self) -> Result<Token, AbiError> {
        self.position += 1;
        self.items
            .next()
            .ok_or_else(|| AbiError::InvalidData(format!("missing field {}", self.position)))
    }

    pub fn address(&mut self) -> Result<Address, AbiError> {
        self.next_token()?.into_address()
    }

    pub fn uint(&mut self) -> Result<U256, AbiError> {
        self.next_token()?.into_uint()
    }

    pub fn u64(&mut self) -> Result<u64, AbiError> {
        self.next_token()?.into_u64()
    }

    pub fn bool(&mut self) -> Result<bool, AbiError> {
        self.next_token()?.into_bool()
    }

    pub fn string(&mut self) -> Result<String, AbiError> {
        self.next_token()?.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_width_check() {
        assert!(Token::from(255u64).matches(&ParamType::Uint(8)));
        assert!(!Token::from(256u64).matches(&ParamType::Uint(8)));
        assert!(Token::Uint(U256::MAX).matches(&ParamType::Uint(256)));
    }

    #[test]
    fn test_tuple_match() {
        let kind = ParamType::Tuple(vec![ParamType::String, ParamType::Bool]);
        assert!(Token::Tuple(vec!["a".into(), true.into()]).matches(&kind));
        assert!(!Token::Tuple(vec![true.into(), "a".into()]).matches(&kind));
        assert!(!Token::Tuple(vec!["a".into()]).matches(&kind));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Token::from(7u64).into_u64().unwrap(), 7);
        assert!(matches!(
            Token::Bool(true).into_address(),
            Err(AbiError::UnexpectedToken { expected: "address", .. })
        ));
        assert!(Token::Uint(U256::MAX).into_u64().is_err());
    }

    #[test]
    fn test_tuple_reader_runs_out() {
        let mut reader = TupleReader::from_tokens(vec![Token::Bool(true)]);
        assert!(reader.bool().unwrap());
        assert!(reader.string().is_err());
    }
}
