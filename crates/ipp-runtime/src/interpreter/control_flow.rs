use ipp_core::{ErrorKind, Instruction, IppError, Var};

use super::dispatch::Flow;
use super::Interpreter;
use crate::operators::values_equal;

impl Interpreter<'_> {
    pub(super) fn jump(&self, instruction: &Instruction) -> Result<Flow, IppError> {
        Ok(Flow::Jump(self.label_target(instruction, 0)?))
    }

    pub(super) fn call(&mut self, instruction: &Instruction) -> Result<Flow, IppError> {
        let target = self.label_target(instruction, 0)?;
        self.call_stack.push(self.ip + 1);
        Ok(Flow::Jump(target))
    }

    pub(super) fn return_from_call(&mut self) -> Result<Flow, IppError> {
        self.call_stack.pop().map(Flow::Jump).ok_or_else(|| {
            IppError::new(ErrorKind::MissingValue, "RETURN with an empty call stack.")
        })
    }

    /// `JUMPIFEQ`/`JUMPIFNEQ`. The label is checked before the operands are read.
    pub(super) fn jump_if(
        &self,
        instruction: &Instruction,
        when_equal: bool,
    ) -> Result<Flow, IppError> {
        let target = self.label_target(instruction, 0)?;
        let left = self.symbol(instruction, 1)?;
        let right = self.symbol(instruction, 2)?;
        Ok(branch(target, values_equal(&left, &right)? == when_equal))
    }

    pub(super) fn jump_if_stack(
        &mut self,
        instruction: &Instruction,
        when_equal: bool,
    ) -> Result<Flow, IppError> {
        let target = self.label_target(instruction, 0)?;
        let (left, right) = self.pop_pair()?;
        Ok(branch(target, values_equal(&left, &right)? == when_equal))
    }

    pub(super) fn exit(&self, instruction: &Instruction) -> Result<Flow, IppError> {
        let value = self.symbol(instruction, 0)?;
        exit_code(&value).map(Flow::Exit)
    }
}

fn branch(target: usize, taken: bool) -> Flow {
    if taken {
        Flow::Jump(target)
    } else {
        Flow::Next
    }
}

fn exit_code(value: &Var) -> Result<i32, IppError> {
    let Var::Int(code) = value else {
        return Err(IppError::new(
            ErrorKind::OperandType,
            format!("EXIT expects int, got {}.", value.var_type()),
        ));
    };
    i32::try_from(code)
        .ok()
        .filter(|code| (0..=49).contains(code))
        .ok_or_else(|| {
            IppError::new(
                ErrorKind::OperandValue,
                format!("EXIT code {} is outside 0..=49.", code),
            )
        })
}
