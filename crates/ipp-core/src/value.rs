use std::fmt;

use num_bigint::BigInt;

use crate::error::{ErrorKind, IppError};
use crate::float::{format_hex_float, parse_hex_float};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Bool,
    Int,
    String,
    Nil,
    Undef,
    Float,
}

impl VarType {
    /// Name used by `TYPE`, literal tags and `READ`. `Undef` has the empty name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
            Self::Nil => "nil",
            Self::Undef => "",
            Self::Float => "float",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "string" => Some(Self::String),
            "nil" => Some(Self::Nil),
            "float" => Some(Self::Float),
            _ => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undef => f.write_str("undef"),
            other => f.write_str(other.name()),
        }
    }
}

/// A runtime value. The variant is the type tag, so the two never disagree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Var {
    Bool(bool),
    Int(BigInt),
    String(String),
    Nil,
    #[default]
    Undef,
    Float(f64),
}

impl Var {
    pub fn var_type(&self) -> VarType {
        match self {
            Self::Bool(_) => VarType::Bool,
            Self::Int(_) => VarType::Int,
            Self::String(_) => VarType::String,
            Self::Nil => VarType::Nil,
            Self::Undef => VarType::Undef,
            Self::Float(_) => VarType::Float,
        }
    }

    pub fn is_undef(&self) -> bool {
        matches!(self, Self::Undef)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Materializes a literal operand. The text is expected to be lexically valid for `var_type`;
    /// anything that still fails to coerce is reported as a structural error.
    pub fn from_literal(var_type: VarType, text: &str) -> Result<Self, IppError> {
        let malformed = || {
            IppError::new(
                ErrorKind::XmlStruct,
                format!("Malformed {} literal \"{}\".", var_type, text),
            )
        };
        match var_type {
            VarType::Int => parse_int(text).map(Self::Int).ok_or_else(malformed),
            VarType::Bool => match text {
                "true" => Ok(Self::Bool(true)),
                "false" => Ok(Self::Bool(false)),
                _ => Err(malformed()),
            },
            VarType::Nil => match text {
                "nil" => Ok(Self::Nil),
                _ => Err(malformed()),
            },
            VarType::Float => parse_hex_float(text).map(Self::Float).ok_or_else(malformed),
            VarType::String => Ok(Self::String(decode_escapes(text))),
            VarType::Undef => Err(malformed()),
        }
    }

    /// Text printed by `WRITE`. Reading an unset slot is a missing-value error.
    pub fn to_output(&self) -> Result<String, IppError> {
        match self {
            Self::Bool(value) => Ok(value.to_string()),
            Self::Int(value) => Ok(value.to_string()),
            Self::String(value) => Ok(value.clone()),
            Self::Nil => Ok(String::new()),
            Self::Float(value) => Ok(format_hex_float(*value)),
            Self::Undef => Err(IppError::new(
                ErrorKind::MissingValue,
                "Cannot print a variable without a value.",
            )),
        }
    }
}

/// `type@value` rendering used by diagnostics; never fails.
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undef => f.write_str("undef"),
            Self::Nil => f.write_str("nil@nil"),
            Self::String(value) => write!(f, "string@{:?}", value),
            other => write!(
                f,
                "{}@{}",
                other.var_type(),
                other.to_output().unwrap_or_default()
            ),
        }
    }
}

/// Parses decimal integer text with an optional sign. Surrounding whitespace is not accepted.
pub fn parse_int(text: &str) -> Option<BigInt> {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let value = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    Some(if text.starts_with('-') { -value } else { value })
}

/// Replaces every `\ddd` with the character whose code point is `ddd`; everything else is kept.
pub fn decode_escapes(text: &str) -> String {
    let chars = text.chars().collect::<Vec<_>>();
    let mut decoded = String::with_capacity(text.len());
    let mut index = 0usize;
    while index < chars.len() {
        if chars[index] == '\\' {
            if let Some(ch) = escape_at(&chars[index + 1..]) {
                decoded.push(ch);
                index += 4;
                continue;
            }
        }
        decoded.push(chars[index]);
        index += 1;
    }
    decoded
}

fn escape_at(rest: &[char]) -> Option<char> {
    let digits = rest.get(..3)?;
    let mut code = 0u32;
    for digit in digits {
        code = code * 10 + digit.to_digit(10)?;
    }
    char::from_u32(code)
}
