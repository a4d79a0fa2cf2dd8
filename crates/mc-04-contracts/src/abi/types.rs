//! # Parameter Types
//!
//! Solidity ABI types as they appear in human-readable signatures.
//!
//! | Syntax                         | Type                         |
//! |--------------------------------|------------------------------|
//! | `address`, `bool`              | [`ParamType::Address`], [`ParamType::Bool`] |
//! | `uint`, `uint8` .. `uint256`   | [`ParamType::Uint`]          |
//! | `int`, `int8` .. `int256`      | [`ParamType::Int`]           |
//! | `string`, `bytes`              | dynamic byte strings         |
//! | `bytes1` .. `bytes32`          | [`ParamType::FixedBytes`]    |
//! | `T[]`, `T[k]`                  | dynamic and fixed arrays     |
//! | `tuple(...)`, `(...)`          | [`ParamType::Tuple`]         |

use super::errors::AbiError;
use std::fmt;

/// An ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Bool,
    /// Unsigned integer of the given bit width.
    Uint(usize),
    /// Signed integer of the given bit width.
    Int(usize),
    String,
    Bytes,
    /// `bytesN`.
    FixedBytes(usize),
    Array(Box<ParamType>),
    FixedArray(Box<ParamType>, usize),
    Tuple(Vec<ParamType>),
}

/// A named parameter of a function or event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, empty when the signature omits it.
    pub name: String,
    /// Declared type.
    pub kind: ParamType,
    /// Event parameter stored in a topic.
    pub indexed: bool,
}

/// Location and mutability keywords skipped while parsing parameters.
const MODIFIERS: [&str; 4] = ["calldata", "memory", "storage", "payable"];

impl ParamType {
    /// Parse a type name such as `uint256[]` or `tuple(string a, bool b)`.
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        let s = s.trim();

        if let Some(stripped) = s.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| AbiError::UnknownType(s.to_string()))?;
            let inner = Self::parse(&stripped[..open])?;
            let size = &stripped[open + 1..];
            return if size.is_empty() {
                Ok(Self::Array(Box::new(inner)))
            } else {
                let n = size
                    .parse()
                    .map_err(|_| AbiError::UnknownType(s.to_string()))?;
                Ok(Self::FixedArray(Box::new(inner), n))
            };
        }

        let tuple_body = s.strip_prefix("tuple").unwrap_or(s);
        if let Some(body) = tuple_body
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let components = split_top_level(body)?
                .into_iter()
                .map(|c| Param::parse(c).map(|p| p.kind))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Tuple(components));
        }

        match s {
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            "bytes" => Ok(Self::Bytes),
            "uint" => Ok(Self::Uint(256)),
            "int" => Ok(Self::Int(256)),
            _ => {
                if let Some(bits) = s.strip_prefix("uint") {
                    return int_width(bits)
                        .map(Self::Uint)
                        .ok_or_else(|| AbiError::UnknownType(s.to_string()));
                }
                if let Some(bits) = s.strip_prefix("int") {
                    return int_width(bits)
                        .map(Self::Int)
                        .ok_or_else(|| AbiError::UnknownType(s.to_string()));
                }
                if let Some(len) = s.strip_prefix("bytes") {
                    return len
                        .parse::<usize>()
                        .ok()
                        .filter(|n| (1..=32).contains(n))
                        .map(Self::FixedBytes)
                        .ok_or_else(|| AbiError::UnknownType(s.to_string()));
                }
                Err(AbiError::UnknownType(s.to_string()))
            }
        }
    }

    /// Whether values of this type live in the tail of an encoding.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String | Self::Bytes | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_dynamic(),
            Self::Tuple(items) => items.iter().any(Self::is_dynamic),
            _ => false,
        }
    }

    /// Bytes occupied in the head of an encoding.
    #[must_use]
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        match self {
            Self::FixedArray(inner, n) => inner.head_size() * n,
            Self::Tuple(items) => items.iter().map(Self::head_size).sum(),
            _ => 32,
        }
    }
}

fn int_width(bits: &str) -> Option<usize> {
    bits.parse::<usize>()
        .ok()
        .filter(|b| *b > 0 && *b <= 256 && b % 8 == 0)
}

/// Canonical form used in selectors, e.g. `(string,uint256)[]`.
impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::FixedBytes(n) => write!(f, "bytes{n}"),
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::FixedArray(inner, n) => write!(f, "{inner}[{n}]"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Param {
    /// Parse `type [indexed] [location] [name]`.
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        let s = s.trim();
        let split = type_end(s);
        let kind = ParamType::parse(&s[..split])?;

        let mut param = Self {
            name: String::new(),
            kind,
            indexed: false,
        };
        for word in s[split..].split_whitespace() {
            match word {
                "indexed" => param.indexed = true,
                w if MODIFIERS.contains(&w) => {}
                name => param.name = name.to_string(),
            }
        }
        Ok(param)
    }
}

/// Index of the first whitespace outside parentheses.
fn type_end(s: &str) -> usize {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c.is_whitespace() && depth == 0 => return i,
            _ => {}
        }
    }
    s.len()
}

/// Split a parameter list on commas that are not nested in parentheses.
pub(crate) fn split_top_level(s: &str) -> Result<Vec<&str>, AbiError> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(AbiError::InvalidSignature(s.to_string()));
                }
            }
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AbiError::InvalidSignature(s.to_string()));
    }
    let last = s[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(AbiError::InvalidSignature(s.to_string()));
    }
    Ok(parts)
}
