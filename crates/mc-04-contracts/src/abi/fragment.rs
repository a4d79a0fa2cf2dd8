//! # Functions, Events and ABIs
//!
//! Parses the human-readable ABI strings (`"function name(type arg) external
//! view returns (type)"`, `"event Name(type indexed arg)"`) and binds each
//! fragment to its selector or topic.

use super::codec::{decode, decode_word, encode};
use super::errors::AbiError;
use super::token::Token;
use super::types::{split_top_level, Param, ParamType};
use primitive_types::H256;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;

/// Keccak-256 digest.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Function state mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

/// A contract function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub mutability: StateMutability,
}

/// A contract event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub inputs: Vec<Param>,
}

/// One decoded log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLog {
    /// Event name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<(String, Token)>,
}

impl DecodedLog {
    /// Parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

fn canonical(name: &str, params: &[Param]) -> String {
    let types: Vec<String> = params.iter().map(|p| p.kind.to_string()).collect();
    format!("{name}({})", types.join(","))
}

/// Split `name(params) rest` into its three parts.
fn split_header(s: &str) -> Result<(&str, &str, &str), AbiError> {
    let invalid = || AbiError::InvalidSignature(s.to_string());
    let open = s.find('(').ok_or_else(invalid)?;
    let close = matching_paren(s, open).ok_or_else(invalid)?;
    let name = s[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }
    Ok((name, &s[open + 1..close], &s[close + 1..]))
}

fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_params(list: &str) -> Result<Vec<Param>, AbiError> {
    split_top_level(list)?.into_iter().map(Param::parse).collect()
}

impl Function {
    /// Parse `function name(...) [visibility] [mutability] [returns (...)]`.
    pub fn parse(signature: &str) -> Result<Self, AbiError> {
        let body = signature
            .trim()
            .strip_prefix("function ")
            .ok_or_else(|| AbiError::InvalidSignature(signature.to_string()))?;
        let (name, inputs, rest) = split_header(body)?;

        let (modifiers, outputs) = match rest.find("returns") {
            Some(at) => {
                let returns = rest[at + "returns".len()..].trim();
                let close = matching_paren(returns, 0)
                    .filter(|_| returns.starts_with('('))
                    .ok_or_else(|| AbiError::InvalidSignature(signature.to_string()))?;
                (&rest[..at], parse_params(&returns[1..close])?)
            }
            None => (rest, Vec::new()),
        };

        let mut mutability = StateMutability::NonPayable;
        for word in modifiers.split_whitespace() {
            match word {
                "view" => mutability = StateMutability::View,
                "pure" => mutability = StateMutability::Pure,
                "payable" => mutability = StateMutability::Payable,
                "external" | "public" | "nonpayable" => {}
                _ => return Err(AbiError::InvalidSignature(signature.to_string())),
            }
        }

        Ok(Self {
            name: name.to_string(),
            inputs: parse_params(inputs)?,
            outputs,
            mutability,
        })
    }

    /// Canonical signature, e.g. `grantAccess(uint256,address,uint8)`.
    #[must_use]
    pub fn signature(&self) -> String {
        canonical(&self.name, &self.inputs)
    }

    /// First four bytes of the signature hash.
    #[must_use]
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Calls that cannot change state.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, StateMutability::View | StateMutability::Pure)
    }

    /// Selector followed by the encoded arguments.
    pub fn encode_input(&self, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        if args.len() != self.inputs.len() {
            return Err(AbiError::ArgumentCount {
                function: self.name.clone(),
                expected: self.inputs.len(),
                actual: args.len(),
            });
        }
        for (index, (arg, param)) in args.iter().zip(&self.inputs).enumerate() {
            if !arg.matches(&param.kind) {
                return Err(AbiError::ArgumentType {
                    function: self.name.clone(),
                    index,
                    expected: param.kind.to_string(),
                });
            }
        }
        let mut data = self.selector().to_vec();
        data.extend(encode(args));
        Ok(data)
    }

    /// Decode return data.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        let kinds: Vec<ParamType> = self.outputs.iter().map(|p| p.kind.clone()).collect();
        decode(&kinds, data)
    }
}

impl Event {
    /// Parse `event Name(type [indexed] name, ...)`.
    pub fn parse(signature: &str) -> Result<Self, AbiError> {
        let body = signature
            .trim()
            .strip_prefix("event ")
            .ok_or_else(|| AbiError::InvalidSignature(signature.to_string()))?;
        let (name, inputs, rest) = split_header(body)?;
        if !rest.trim().is_empty() {
            return Err(AbiError::InvalidSignature(signature.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            inputs: parse_params(inputs)?,
        })
    }

    /// Canonical signature, e.g. `PatientNFTMinted(uint256,address)`.
    #[must_use]
    pub fn signature(&self) -> String {
        canonical(&self.name, &self.inputs)
    }

    /// Topic 0 of logs emitted by this event.
    #[must_use]
    pub fn topic(&self) -> H256 {
        H256(keccak256(self.signature().as_bytes()))
    }

    /// Encode `args` (declaration order) into topics and data, as a node
    /// would log them.
    pub fn encode_log(&self, args: &[Token]) -> Result<(Vec<H256>, Vec<u8>), AbiError> {
        if args.len() != self.inputs.len() {
            return Err(AbiError::ArgumentCount {
                function: self.name.clone(),
                expected: self.inputs.len(),
                actual: args.len(),
            });
        }
        let mut topics = vec![self.topic()];
        let mut plain = Vec::new();
        for (index, (arg, param)) in args.iter().zip(&self.inputs).enumerate() {
            if !arg.matches(&param.kind) {
                return Err(AbiError::ArgumentType {
                    function: self.name.clone(),
                    index,
                    expected: param.kind.to_string(),
                });
            }
            if !param.indexed {
                plain.push(arg.clone());
            } else if arg.is_dynamic() {
                topics.push(H256(keccak256(&encode(std::slice::from_ref(arg)))));
            } else {
                topics.push(H256::from_slice(&encode(std::slice::from_ref(arg))));
            }
        }
        Ok((topics, encode(&plain)))
    }

    /// Decode a log's topics and data.
    pub fn decode_log(&self, topics: &[H256], data: &[u8]) -> Result<DecodedLog, AbiError> {
        let mismatch = || AbiError::EventMismatch(self.name.clone());
        let (first, indexed_topics) = topics.split_first().ok_or_else(mismatch)?;
        if *first != self.topic() {
            return Err(mismatch());
        }

        let indexed: Vec<&Param> = self.inputs.iter().filter(|p| p.indexed).collect();
        if indexed.len() != indexed_topics.len() {
            return Err(mismatch());
        }
        let plain_kinds: Vec<ParamType> = self
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.kind.clone())
            .collect();

        let mut from_topics = indexed
            .iter()
            .zip(indexed_topics)
            .map(|(p, topic)| decode_word(&p.kind, &topic.0))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let mut from_data = decode(&plain_kinds, data)?.into_iter();

        let mut params = Vec::with_capacity(self.inputs.len());
        for param in &self.inputs {
            let source = if param.indexed {
                from_topics.next()
            } else {
                from_data.next()
            };
            params.push((param.name.clone(), source.ok_or_else(mismatch)?));
        }
        Ok(DecodedLog {
            name: self.name.clone(),
            params,
        })
    }
}

/// A parsed contract interface.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    functions: HashMap<String, Function>,
    events: HashMap<String, Event>,
}

impl Abi {
    /// Parse a list of human-readable fragments. Overloads are not supported;
    /// a later fragment with the same name replaces the earlier one.
    pub fn parse<S: AsRef<str>>(fragments: &[S]) -> Result<Self, AbiError> {
        let mut abi = Self::default();
        for fragment in fragments {
            let fragment = fragment.as_ref().trim();
            if fragment.starts_with("function ") {
                let f = Function::parse(fragment)?;
                abi.functions.insert(f.name.clone(), f);
            } else if fragment.starts_with("event ") {
                let e = Event::parse(fragment)?;
                abi.events.insert(e.name.clone(), e);
            } else {
                return Err(AbiError::InvalidSignature(fragment.to_string()));
            }
        }
        Ok(abi)
    }

    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.functions
            .get(name)
            .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))
    }

    pub fn event(&self, name: &str) -> Result<&Event, AbiError> {
        self.events
            .get(name)
            .ok_or_else(|| AbiError::UnknownEvent(name.to_string()))
    }

    /// Event whose topic 0 is `topic`.
    #[must_use]
    pub fn event_by_topic(&self, topic: &H256) -> Option<&Event> {
        self.events.values().find(|e| e.topic() == *topic)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }
}
