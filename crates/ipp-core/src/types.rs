use std::fmt;

use crate::value::{Var, VarType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameScope {
    Global,
    Local,
    Temporary,
}

impl FrameScope {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Global => "GF",
            Self::Local => "LF",
            Self::Temporary => "TF",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "GF" => Some(Self::Global),
            "LF" => Some(Self::Local),
            "TF" => Some(Self::Temporary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub scope: FrameScope,
    pub name: String,
}

impl VarRef {
    /// Splits `GF@name` style text.
    pub fn parse(text: &str) -> Option<Self> {
        let (prefix, name) = text.split_once('@')?;
        Some(Self {
            scope: FrameScope::from_prefix(prefix)?,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.scope.prefix(), self.name)
    }
}

/// Operand slot kinds of an opcode signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Var,
    Symbol,
    Label,
    Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Var(VarRef),
    Const(Var),
    Label(String),
    Type(VarType),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(var) => write!(f, "{}", var),
            Self::Const(value) => write!(f, "{}", value),
            Self::Label(label) => write!(f, "label@{}", label),
            Self::Type(var_type) => write!(f, "type@{}", var_type),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar,
    Call,
    Return,
    PushS,
    PopS,
    ClearS,
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    AddS,
    SubS,
    MulS,
    DivS,
    IDivS,
    Lt,
    Gt,
    Eq,
    LtS,
    GtS,
    EqS,
    And,
    Or,
    Not,
    AndS,
    OrS,
    NotS,
    Int2Float,
    Float2Int,
    Int2Char,
    Stri2Int,
    Int2FloatS,
    Float2IntS,
    Int2CharS,
    Stri2IntS,
    Read,
    Write,
    Concat,
    StrLen,
    GetChar,
    SetChar,
    Type,
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    JumpIfEqS,
    JumpIfNeqS,
    Exit,
    DPrint,
    Break,
}

const OPCODE_NAMES: &[(Opcode, &str)] = &[
    (Opcode::Move, "MOVE"),
    (Opcode::CreateFrame, "CREATEFRAME"),
    (Opcode::PushFrame, "PUSHFRAME"),
    (Opcode::PopFrame, "POPFRAME"),
    (Opcode::DefVar, "DEFVAR"),
    (Opcode::Call, "CALL"),
    (Opcode::Return, "RETURN"),
    (Opcode::PushS, "PUSHS"),
    (Opcode::PopS, "POPS"),
    (Opcode::ClearS, "CLEARS"),
    (Opcode::Add, "ADD"),
    (Opcode::Sub, "SUB"),
    (Opcode::Mul, "MUL"),
    (Opcode::Div, "DIV"),
    (Opcode::IDiv, "IDIV"),
    (Opcode::AddS, "ADDS"),
    (Opcode::SubS, "SUBS"),
    (Opcode::MulS, "MULS"),
    (Opcode::DivS, "DIVS"),
    (Opcode::IDivS, "IDIVS"),
    (Opcode::Lt, "LT"),
    (Opcode::Gt, "GT"),
    (Opcode::Eq, "EQ"),
    (Opcode::LtS, "LTS"),
    (Opcode::GtS, "GTS"),
    (Opcode::EqS, "EQS"),
    (Opcode::And, "AND"),
    (Opcode::Or, "OR"),
    (Opcode::Not, "NOT"),
    (Opcode::AndS, "ANDS"),
    (Opcode::OrS, "ORS"),
    (Opcode::NotS, "NOTS"),
    (Opcode::Int2Float, "INT2FLOAT"),
    (Opcode::Float2Int, "FLOAT2INT"),
    (Opcode::Int2Char, "INT2CHAR"),
    (Opcode::Stri2Int, "STRI2INT"),
    (Opcode::Int2FloatS, "INT2FLOATS"),
    (Opcode::Float2IntS, "FLOAT2INTS"),
    (Opcode::Int2CharS, "INT2CHARS"),
    (Opcode::Stri2IntS, "STRI2INTS"),
    (Opcode::Read, "READ"),
    (Opcode::Write, "WRITE"),
    (Opcode::Concat, "CONCAT"),
    (Opcode::StrLen, "STRLEN"),
    (Opcode::GetChar, "GETCHAR"),
    (Opcode::SetChar, "SETCHAR"),
    (Opcode::Type, "TYPE"),
    (Opcode::Label, "LABEL"),
    (Opcode::Jump, "JUMP"),
    (Opcode::JumpIfEq, "JUMPIFEQ"),
    (Opcode::JumpIfNeq, "JUMPIFNEQ"),
    (Opcode::JumpIfEqS, "JUMPIFEQS"),
    (Opcode::JumpIfNeqS, "JUMPIFNEQS"),
    (Opcode::Exit, "EXIT"),
    (Opcode::DPrint, "DPRINT"),
    (Opcode::Break, "BREAK"),
];

impl Opcode {
    /// Looks up an opcode by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        OPCODE_NAMES
            .iter()
            .find(|(_, known)| *known == upper)
            .map(|(opcode, _)| *opcode)
    }

    pub fn name(self) -> &'static str {
        OPCODE_NAMES
            .iter()
            .find(|(opcode, _)| *opcode == self)
            .map(|(_, name)| *name)
            .unwrap_or("?")
    }

    pub fn all() -> impl Iterator<Item = Opcode> {
        OPCODE_NAMES.iter().map(|(opcode, _)| *opcode)
    }

    pub fn signature(self) -> &'static [ArgKind] {
        use ArgKind as K;
        match self {
            Self::CreateFrame
            | Self::PushFrame
            | Self::PopFrame
            | Self::Return
            | Self::Break
            | Self::ClearS
            | Self::AddS
            | Self::SubS
            | Self::MulS
            | Self::DivS
            | Self::IDivS
            | Self::LtS
            | Self::GtS
            | Self::EqS
            | Self::AndS
            | Self::OrS
            | Self::NotS
            | Self::Int2FloatS
            | Self::Float2IntS
            | Self::Int2CharS
            | Self::Stri2IntS => &[],
            Self::DefVar | Self::PopS => &[K::Var],
            Self::PushS | Self::Write | Self::Exit | Self::DPrint => &[K::Symbol],
            Self::Label | Self::Call | Self::Jump | Self::JumpIfEqS | Self::JumpIfNeqS => {
                &[K::Label]
            }
            Self::Move
            | Self::Int2Char
            | Self::StrLen
            | Self::Type
            | Self::Not
            | Self::Int2Float
            | Self::Float2Int => &[K::Var, K::Symbol],
            Self::Read => &[K::Var, K::Type],
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::IDiv
            | Self::Lt
            | Self::Gt
            | Self::Eq
            | Self::And
            | Self::Or
            | Self::Concat
            | Self::GetChar
            | Self::SetChar
            | Self::Stri2Int => &[K::Var, K::Symbol, K::Symbol],
            Self::JumpIfEq | Self::JumpIfNeq => &[K::Label, K::Symbol, K::Symbol],
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub order: u64,
    pub opcode: Opcode,
    pub args: Vec<Operand>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.order, self.opcode)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A validated program: instructions sorted ascending by their unique order keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Vec<Instruction>,
}
