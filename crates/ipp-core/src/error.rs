use std::fmt;

use thiserror::Error;

/// Every way a run can fail. Each kind owns a fixed process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Args,
    Input,
    Output,
    XmlParse,
    XmlStruct,
    Semantic,
    OperandType,
    VarNotFound,
    FrameNotFound,
    MissingValue,
    OperandValue,
    String,
    Internal,
}

impl ErrorKind {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Args => 10,
            Self::Input => 11,
            Self::Output => 12,
            Self::XmlParse => 31,
            Self::XmlStruct => 32,
            Self::Semantic => 52,
            Self::OperandType => 53,
            Self::VarNotFound => 54,
            Self::FrameNotFound => 55,
            Self::MissingValue => 56,
            Self::OperandValue => 57,
            Self::String => 58,
            Self::Internal => 99,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Args => "ERR_ARGS",
            Self::Input => "ERR_INPUT",
            Self::Output => "ERR_OUTPUT",
            Self::XmlParse => "ERR_XML_PARSE",
            Self::XmlStruct => "ERR_XML_STRUCT",
            Self::Semantic => "ERR_SEMANTIC",
            Self::OperandType => "ERR_OP_TYPE",
            Self::VarNotFound => "ERR_VAR_NOT_FOUND",
            Self::FrameNotFound => "ERR_FRAME_NOT_FOUND",
            Self::MissingValue => "ERR_MISSING_VALUE",
            Self::OperandValue => "ERR_OP_VALUE",
            Self::String => "ERR_STRING",
            Self::Internal => "ERR_INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct IppError {
    pub kind: ErrorKind,
    pub message: String,
    /// Order key of the instruction that was executing, when known.
    pub order: Option<u64>,
}

impl IppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            order: None,
        }
    }

    pub fn with_order(kind: ErrorKind, message: impl Into<String>, order: u64) -> Self {
        Self {
            kind,
            message: message.into(),
            order: Some(order),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }
}
