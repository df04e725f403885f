use ipp_core::{Instruction, IppError, Opcode, Var};

use super::operands::{arg, var_ref};
use super::Interpreter;
use crate::operators::{
    arithmetic, char_at, compare, concat, float_to_int, int_to_char, int_to_float, logic,
    logical_not, set_char, string_length, string_to_int, ArithOp, CmpOp, LogicOp,
};

/// Where execution continues after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Next,
    Jump(usize),
    Exit(i32),
}

impl Interpreter<'_> {
    pub(super) fn execute(&mut self, instruction: &Instruction) -> Result<Flow, IppError> {
        match instruction.opcode {
            Opcode::Move => {
                let value = self.symbol(instruction, 1)?;
                self.store(instruction, 0, value)?;
            }
            Opcode::CreateFrame => self.frames.create_frame(),
            Opcode::PushFrame => self.frames.push_frame()?,
            Opcode::PopFrame => self.frames.pop_frame()?,
            Opcode::DefVar => {
                let target = var_ref(instruction, 0)?;
                self.frames.define(target.scope, &target.name)?;
            }
            Opcode::Call => return self.call(instruction),
            Opcode::Return => return self.return_from_call(),
            Opcode::PushS => {
                let value = self.symbol(instruction, 0)?;
                self.data_stack.push(value);
            }
            Opcode::PopS => {
                let value = self.pop_value()?;
                self.store(instruction, 0, value)?;
            }
            Opcode::ClearS => self.data_stack.clear(),

            Opcode::Add => self.binary(instruction, |l, r| arithmetic(ArithOp::Add, l, r))?,
            Opcode::Sub => self.binary(instruction, |l, r| arithmetic(ArithOp::Sub, l, r))?,
            Opcode::Mul => self.binary(instruction, |l, r| arithmetic(ArithOp::Mul, l, r))?,
            Opcode::Div => self.binary(instruction, |l, r| arithmetic(ArithOp::Div, l, r))?,
            Opcode::IDiv => self.binary(instruction, |l, r| arithmetic(ArithOp::IDiv, l, r))?,
            Opcode::AddS => self.binary_stack(|l, r| arithmetic(ArithOp::Add, l, r))?,
            Opcode::SubS => self.binary_stack(|l, r| arithmetic(ArithOp::Sub, l, r))?,
            Opcode::MulS => self.binary_stack(|l, r| arithmetic(ArithOp::Mul, l, r))?,
            Opcode::DivS => self.binary_stack(|l, r| arithmetic(ArithOp::Div, l, r))?,
            Opcode::IDivS => self.binary_stack(|l, r| arithmetic(ArithOp::IDiv, l, r))?,

            Opcode::Lt => self.binary(instruction, |l, r| compare(CmpOp::Lt, l, r))?,
            Opcode::Gt => self.binary(instruction, |l, r| compare(CmpOp::Gt, l, r))?,
            Opcode::Eq => self.binary(instruction, |l, r| compare(CmpOp::Eq, l, r))?,
            Opcode::LtS => self.binary_stack(|l, r| compare(CmpOp::Lt, l, r))?,
            Opcode::GtS => self.binary_stack(|l, r| compare(CmpOp::Gt, l, r))?,
            Opcode::EqS => self.binary_stack(|l, r| compare(CmpOp::Eq, l, r))?,

            Opcode::And => self.binary(instruction, |l, r| logic(LogicOp::And, l, r))?,
            Opcode::Or => self.binary(instruction, |l, r| logic(LogicOp::Or, l, r))?,
            Opcode::Not => self.unary(instruction, logical_not)?,
            Opcode::AndS => self.binary_stack(|l, r| logic(LogicOp::And, l, r))?,
            Opcode::OrS => self.binary_stack(|l, r| logic(LogicOp::Or, l, r))?,
            Opcode::NotS => self.unary_stack(logical_not)?,

            Opcode::Int2Float => self.unary(instruction, int_to_float)?,
            Opcode::Float2Int => self.unary(instruction, float_to_int)?,
            Opcode::Int2Char => self.unary(instruction, int_to_char)?,
            Opcode::Stri2Int => self.binary(instruction, string_to_int)?,
            Opcode::Int2FloatS => self.unary_stack(int_to_float)?,
            Opcode::Float2IntS => self.unary_stack(float_to_int)?,
            Opcode::Int2CharS => self.unary_stack(int_to_char)?,
            Opcode::Stri2IntS => self.binary_stack(string_to_int)?,

            Opcode::Read => self.read(instruction)?,
            Opcode::Write => self.write(instruction)?,

            Opcode::Concat => self.binary(instruction, concat)?,
            Opcode::StrLen => self.unary(instruction, string_length)?,
            Opcode::GetChar => self.binary(instruction, char_at)?,
            Opcode::SetChar => {
                let index = self.symbol(instruction, 1)?;
                let source = self.symbol(instruction, 2)?;
                let target = self.symbol(instruction, 0)?;
                let updated = set_char(&target, &index, &source)?;
                self.store(instruction, 0, updated)?;
            }
            Opcode::Type => {
                let value = self.raw_symbol(arg(instruction, 1)?)?;
                let name = value.var_type().name().to_string();
                self.store(instruction, 0, Var::String(name))?;
            }

            Opcode::Label => {}
            Opcode::Jump => return self.jump(instruction),
            Opcode::JumpIfEq => return self.jump_if(instruction, true),
            Opcode::JumpIfNeq => return self.jump_if(instruction, false),
            Opcode::JumpIfEqS => return self.jump_if_stack(instruction, true),
            Opcode::JumpIfNeqS => return self.jump_if_stack(instruction, false),
            Opcode::Exit => return self.exit(instruction),

            Opcode::DPrint => self.dprint(instruction),
            Opcode::Break => self.break_state(instruction),
        }
        Ok(Flow::Next)
    }

    /// `OP var symb` form: evaluates the source, then writes the destination.
    fn unary(
        &mut self,
        instruction: &Instruction,
        op: impl Fn(&Var) -> Result<Var, IppError>,
    ) -> Result<(), IppError> {
        let value = self.symbol(instruction, 1)?;
        let result = op(&value)?;
        self.store(instruction, 0, result)
    }

    /// `OP var symb symb` form: sources left to right, then the destination.
    fn binary(
        &mut self,
        instruction: &Instruction,
        op: impl Fn(&Var, &Var) -> Result<Var, IppError>,
    ) -> Result<(), IppError> {
        let left = self.symbol(instruction, 1)?;
        let right = self.symbol(instruction, 2)?;
        let result = op(&left, &right)?;
        self.store(instruction, 0, result)
    }

    fn unary_stack(&mut self, op: impl Fn(&Var) -> Result<Var, IppError>) -> Result<(), IppError> {
        let value = self.pop_value()?;
        let result = op(&value)?;
        self.data_stack.push(result);
        Ok(())
    }

    fn binary_stack(
        &mut self,
        op: impl Fn(&Var, &Var) -> Result<Var, IppError>,
    ) -> Result<(), IppError> {
        let (left, right) = self.pop_pair()?;
        let result = op(&left, &right)?;
        self.data_stack.push(result);
        Ok(())
    }
}
