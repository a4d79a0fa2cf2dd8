//! # ABI Encoding
//!
//! Standard head/tail layout: static values are written inline, dynamic
//! values leave a 32-byte offset in the head and are appended to the tail.
//! Offsets are relative to the start of the enclosing sequence.

use super::errors::AbiError;
use super::token::Token;
use super::types::ParamType;
use shared_types::{Address, U256};

const WORD: usize = 32;

/// Selector of the standard `Error(string)` revert payload.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Encode a sequence of values as function arguments or return data.
#[must_use]
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_sequence(tokens)
}

fn encode_sequence(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens.iter().map(head_size).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }
    head.extend(tail);
    head
}

fn head_size(token: &Token) -> usize {
    if token.is_dynamic() {
        return WORD;
    }
    match token {
        Token::FixedArray(items) | Token::Tuple(items) => items.iter().map(head_size).sum(),
        _ => WORD,
    }
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(a) => {
            let mut word = vec![0u8; WORD];
            word[12..].copy_from_slice(a.as_bytes());
            word
        }
        Token::Bool(b) => u256_word(&U256::from(u8::from(*b))).to_vec(),
        Token::Uint(v) | Token::Int(v) => u256_word(v).to_vec(),
        Token::String(s) => encode_bytes(s.as_bytes()),
        Token::Bytes(b) => encode_bytes(b),
        Token::FixedBytes(b) => pad_right(b),
        Token::Array(items) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend(encode_sequence(items));
            out
        }
        Token::FixedArray(items) | Token::Tuple(items) => encode_sequence(items),
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = usize_word(bytes.len()).to_vec();
    out.extend(pad_right(bytes));
    out
}

fn pad_right(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let padded = bytes.len().div_ceil(WORD) * WORD;
    out.resize(padded, 0);
    out
}

fn u256_word(v: &U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    v.to_big_endian(&mut word);
    word
}

fn usize_word(n: usize) -> [u8; WORD] {
    u256_word(&U256::from(n))
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode `data` as a sequence of `types`.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_sequence(types, data)
}

/// Decode a single 32-byte word (e.g. an indexed event topic).
pub fn decode_word(kind: &ParamType, word: &[u8; 32]) -> Result<Token, AbiError> {
    if kind.is_dynamic() {
        return Ok(Token::FixedBytes(word.to_vec()));
    }
    decode_at(kind, word, 0)
}

fn decode_sequence(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut offset = 0;
    for kind in types {
        if kind.is_dynamic() {
            let pointer = read_usize(data, offset)?;
            tokens.push(decode_at(kind, data, pointer)?);
        } else {
            tokens.push(decode_at(kind, data, offset)?);
        }
        offset += kind.head_size();
    }
    Ok(tokens)
}

fn decode_at(kind: &ParamType, data: &[u8], at: usize) -> Result<Token, AbiError> {
    match kind {
        ParamType::Address => {
            let w = word(data, at)?;
            if w[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::InvalidData("dirty address padding".into()));
            }
            Address::from_slice(&w[12..])
                .map(Token::Address)
                .ok_or_else(|| AbiError::InvalidData("address".into()))
        }
        ParamType::Bool => match U256::from_big_endian(word(data, at)?) {
            v if v.is_zero() => Ok(Token::Bool(false)),
            v if v == U256::one() => Ok(Token::Bool(true)),
            v => Err(AbiError::InvalidData(format!("bool value {v}"))),
        },
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(word(data, at)?))),
        ParamType::Int(_) => Ok(Token::Int(U256::from_big_endian(word(data, at)?))),
        ParamType::FixedBytes(n) => Ok(Token::FixedBytes(word(data, at)?[..*n].to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, at)?;
            String::from_utf8(bytes)
                .map(Token::String)
                .map_err(|_| AbiError::InvalidData("string is not UTF-8".into()))
        }
        ParamType::Bytes => read_bytes(data, at).map(Token::Bytes),
        ParamType::Array(inner) => {
            let len = read_usize(data, at)?;
            let body = tail(data, at + WORD)?;
            let kinds = vec![(**inner).clone(); len];
            decode_sequence(&kinds, body).map(Token::Array)
        }
        ParamType::FixedArray(inner, n) => {
            let kinds = vec![(**inner).clone(); *n];
            decode_sequence(&kinds, tail(data, at)?).map(Token::FixedArray)
        }
        ParamType::Tuple(kinds) => decode_sequence(kinds, tail(data, at)?).map(Token::Tuple),
    }
}

fn word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    at.checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or(AbiError::ShortData {
            offset: at,
            needed: WORD,
            len: data.len(),
        })
}

fn tail(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    data.get(at..).ok_or(AbiError::ShortData {
        offset: at,
        needed: 0,
        len: data.len(),
    })
}

/// Read a word used as an offset or length; it can never exceed the buffer.
fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let v = U256::from_big_endian(word(data, at)?);
    if v > U256::from(data.len()) {
        return Err(AbiError::InvalidData(format!(
            "offset or length {v} exceeds {} bytes",
            data.len()
        )));
    }
    Ok(v.as_usize())
}

fn read_bytes(data: &[u8], at: usize) -> Result<Vec<u8>, AbiError> {
    let len = read_usize(data, at)?;
    let start = at + WORD;
    data.get(start..start + len)
        .map(<[u8]>::to_vec)
        .ok_or(AbiError::ShortData {
            offset: start,
            needed: len,
            len: data.len(),
        })
}

/// Extract the message from an `Error(string)` revert payload.
#[must_use]
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let body = data.strip_prefix(&ERROR_STRING_SELECTOR[..])?;
    match decode(&[ParamType::String], body).ok()?.pop()? {
        Token::String(reason) => Some(reason),
        _ => None,
    }
}
