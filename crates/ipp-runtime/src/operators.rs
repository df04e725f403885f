//! Operator cores shared by the explicit-operand and stack-operand forms of each opcode.

use std::cmp::Ordering;

use ipp_core::{ErrorKind, IppError, Var};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
}

impl ArithOp {
    fn name(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::IDiv => "IDIV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Lt,
    Gt,
    Eq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicOp {
    And,
    Or,
}

fn type_error(operation: &str, left: &Var, right: &Var) -> IppError {
    IppError::new(
        ErrorKind::OperandType,
        format!(
            "{} cannot take {} and {}.",
            operation,
            left.var_type(),
            right.var_type()
        ),
    )
}

fn unary_type_error(operation: &str, expected: &str, value: &Var) -> IppError {
    IppError::new(
        ErrorKind::OperandType,
        format!(
            "{} expects {}, got {}.",
            operation,
            expected,
            value.var_type()
        ),
    )
}

fn zero_division(operation: &str) -> IppError {
    IppError::new(
        ErrorKind::OperandValue,
        format!("{} by zero.", operation),
    )
}

/// `ADD`/`SUB`/`MUL` on two Ints or two Floats, `IDIV` on Ints (floor), `DIV` on Floats.
pub(crate) fn arithmetic(op: ArithOp, left: &Var, right: &Var) -> Result<Var, IppError> {
    match (left, right) {
        (Var::Int(a), Var::Int(b)) => match op {
            ArithOp::Add => Ok(Var::Int(a + b)),
            ArithOp::Sub => Ok(Var::Int(a - b)),
            ArithOp::Mul => Ok(Var::Int(a * b)),
            ArithOp::IDiv if b.is_zero() => Err(zero_division(op.name())),
            ArithOp::IDiv => Ok(Var::Int(a.div_floor(b))),
            ArithOp::Div => Err(type_error(op.name(), left, right)),
        },
        (Var::Float(a), Var::Float(b)) => match op {
            ArithOp::Add => Ok(Var::Float(a + b)),
            ArithOp::Sub => Ok(Var::Float(a - b)),
            ArithOp::Mul => Ok(Var::Float(a * b)),
            ArithOp::Div if *b == 0.0 => Err(zero_division(op.name())),
            ArithOp::Div => Ok(Var::Float(a / b)),
            ArithOp::IDiv => Err(type_error(op.name(), left, right)),
        },
        _ => Err(type_error(op.name(), left, right)),
    }
}

/// Equality between matching types; Nil compares with anything and equals only Nil.
pub(crate) fn values_equal(left: &Var, right: &Var) -> Result<bool, IppError> {
    match (left, right) {
        (Var::Nil, Var::Nil) => Ok(true),
        (Var::Nil, _) | (_, Var::Nil) => Ok(false),
        (Var::Bool(a), Var::Bool(b)) => Ok(a == b),
        (Var::Int(a), Var::Int(b)) => Ok(a == b),
        (Var::Float(a), Var::Float(b)) => Ok(a == b),
        (Var::String(a), Var::String(b)) => Ok(a == b),
        _ => Err(IppError::new(
            ErrorKind::OperandType,
            format!(
                "Cannot compare {} with {} for equality.",
                left.var_type(),
                right.var_type()
            ),
        )),
    }
}

fn ordering(operation: &str, left: &Var, right: &Var) -> Result<Option<Ordering>, IppError> {
    match (left, right) {
        (Var::Bool(a), Var::Bool(b)) => Ok(Some(a.cmp(b))),
        (Var::Int(a), Var::Int(b)) => Ok(Some(a.cmp(b))),
        (Var::Float(a), Var::Float(b)) => Ok(a.partial_cmp(b)),
        (Var::String(a), Var::String(b)) => Ok(Some(a.cmp(b))),
        _ => Err(type_error(operation, left, right)),
    }
}

pub(crate) fn compare(op: CmpOp, left: &Var, right: &Var) -> Result<Var, IppError> {
    let result = match op {
        CmpOp::Eq => values_equal(left, right)?,
        CmpOp::Lt => ordering("LT", left, right)? == Some(Ordering::Less),
        CmpOp::Gt => ordering("GT", left, right)? == Some(Ordering::Greater),
    };
    Ok(Var::Bool(result))
}

pub(crate) fn logic(op: LogicOp, left: &Var, right: &Var) -> Result<Var, IppError> {
    match (left, right) {
        (Var::Bool(a), Var::Bool(b)) => Ok(Var::Bool(match op {
            LogicOp::And => *a && *b,
            LogicOp::Or => *a || *b,
        })),
        _ => {
            let name = match op {
                LogicOp::And => "AND",
                LogicOp::Or => "OR",
            };
            Err(type_error(name, left, right))
        }
    }
}

pub(crate) fn logical_not(value: &Var) -> Result<Var, IppError> {
    match value {
        Var::Bool(value) => Ok(Var::Bool(!value)),
        other => Err(unary_type_error("NOT", "bool", other)),
    }
}

pub(crate) fn concat(left: &Var, right: &Var) -> Result<Var, IppError> {
    match (left, right) {
        (Var::String(a), Var::String(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Var::String(joined))
        }
        _ => Err(type_error("CONCAT", left, right)),
    }
}

/// Length in characters, not bytes.
pub(crate) fn string_length(value: &Var) -> Result<Var, IppError> {
    match value {
        Var::String(text) => Ok(Var::Int(BigInt::from(text.chars().count()))),
        other => Err(unary_type_error("STRLEN", "string", other)),
    }
}

fn char_index(operation: &str, text: &str, index: &BigInt) -> Result<usize, IppError> {
    index
        .to_usize()
        .filter(|index| *index < text.chars().count())
        .ok_or_else(|| {
            IppError::new(
                ErrorKind::String,
                format!("{} index {} is out of range.", operation, index),
            )
        })
}

pub(crate) fn char_at(text: &Var, index: &Var) -> Result<Var, IppError> {
    let (Var::String(text), Var::Int(index)) = (text, index) else {
        return Err(type_error("GETCHAR", text, index));
    };
    let position = char_index("GETCHAR", text, index)?;
    let ch = text.chars().nth(position).unwrap_or_default();
    Ok(Var::String(ch.to_string()))
}

/// Replaces the character of `target` at `index` with the first character of `source`.
pub(crate) fn set_char(target: &Var, index: &Var, source: &Var) -> Result<Var, IppError> {
    let (Var::String(target_text), Var::Int(position), Var::String(source_text)) =
        (target, index, source)
    else {
        return Err(IppError::new(
            ErrorKind::OperandType,
            format!(
                "SETCHAR cannot take {}, {} and {}.",
                target.var_type(),
                index.var_type(),
                source.var_type()
            ),
        ));
    };
    let position = char_index("SETCHAR", target_text, position)?;
    let Some(replacement) = source_text.chars().next() else {
        return Err(IppError::new(
            ErrorKind::String,
            "SETCHAR source string is empty.",
        ));
    };
    let updated = target_text
        .chars()
        .enumerate()
        .map(|(current, ch)| if current == position { replacement } else { ch })
        .collect();
    Ok(Var::String(updated))
}

pub(crate) fn int_to_char(value: &Var) -> Result<Var, IppError> {
    let Var::Int(code) = value else {
        return Err(unary_type_error("INT2CHAR", "int", value));
    };
    code.to_u32()
        .and_then(char::from_u32)
        .map(|ch| Var::String(ch.to_string()))
        .ok_or_else(|| {
            IppError::new(
                ErrorKind::String,
                format!("INT2CHAR code point {} is not valid.", code),
            )
        })
}

pub(crate) fn string_to_int(text: &Var, index: &Var) -> Result<Var, IppError> {
    let (Var::String(text), Var::Int(index)) = (text, index) else {
        return Err(type_error("STRI2INT", text, index));
    };
    let position = char_index("STRI2INT", text, index)?;
    let ch = text.chars().nth(position).unwrap_or_default();
    Ok(Var::Int(BigInt::from(u32::from(ch))))
}

pub(crate) fn int_to_float(value: &Var) -> Result<Var, IppError> {
    let Var::Int(number) = value else {
        return Err(unary_type_error("INT2FLOAT", "int", value));
    };
    // Integers beyond the float range convert to infinity, which is rejected.
    number
        .to_f64()
        .filter(|converted| converted.is_finite())
        .map(Var::Float)
        .ok_or_else(|| {
            IppError::new(
                ErrorKind::OperandValue,
                format!("INT2FLOAT cannot represent {}.", number),
            )
        })
}

/// Truncates toward zero; infinities and NaN have no integer value.
pub(crate) fn float_to_int(value: &Var) -> Result<Var, IppError> {
    let Var::Float(number) = value else {
        return Err(unary_type_error("FLOAT2INT", "float", value));
    };
    BigInt::from_f64(number.trunc())
        .map(Var::Int)
        .ok_or_else(|| {
            IppError::new(
                ErrorKind::OperandValue,
                format!("FLOAT2INT cannot convert {}.", number),
            )
        })
}
