use ipp_core::{ErrorKind, Instruction, IppError, Operand, Var, VarRef, VarType};

use super::Interpreter;

pub(super) fn arg(instruction: &Instruction, index: usize) -> Result<&Operand, IppError> {
    instruction.args.get(index).ok_or_else(|| {
        IppError::new(
            ErrorKind::Internal,
            format!("{} is missing operand {}.", instruction.opcode, index + 1),
        )
    })
}

pub(super) fn var_ref(instruction: &Instruction, index: usize) -> Result<&VarRef, IppError> {
    match arg(instruction, index)? {
        Operand::Var(target) => Ok(target),
        other => Err(unexpected_operand(instruction, other, "a variable")),
    }
}

pub(super) fn type_name(instruction: &Instruction, index: usize) -> Result<VarType, IppError> {
    match arg(instruction, index)? {
        Operand::Type(var_type) => Ok(*var_type),
        other => Err(unexpected_operand(instruction, other, "a type")),
    }
}

fn unexpected_operand(instruction: &Instruction, operand: &Operand, expected: &str) -> IppError {
    IppError::new(
        ErrorKind::Internal,
        format!(
            "{} expected {}, got {}.",
            instruction.opcode, expected, operand
        ),
    )
}

impl Interpreter<'_> {
    /// Value of a symbol operand, `Undef` included.
    pub(super) fn raw_symbol(&self, operand: &Operand) -> Result<Var, IppError> {
        match operand {
            Operand::Const(value) => Ok(value.clone()),
            Operand::Var(source) => self
                .frames
                .resolve(source.scope, &source.name)
                .cloned(),
            other => Err(IppError::new(
                ErrorKind::Internal,
                format!("{} is not a symbol.", other),
            )),
        }
    }

    pub(super) fn symbol(&self, instruction: &Instruction, index: usize) -> Result<Var, IppError> {
        let operand = arg(instruction, index)?;
        let value = self.raw_symbol(operand)?;
        if value.is_undef() {
            return Err(IppError::new(
                ErrorKind::MissingValue,
                format!("{} reads {} before it has a value.", instruction.opcode, operand),
            ));
        }
        Ok(value)
    }

    pub(super) fn store(
        &mut self,
        instruction: &Instruction,
        index: usize,
        value: Var,
    ) -> Result<(), IppError> {
        let target = var_ref(instruction, index)?;
        self.frames.assign(target.scope, &target.name, value)
    }

    pub(super) fn pop_value(&mut self) -> Result<Var, IppError> {
        self.data_stack.pop().ok_or_else(|| {
            IppError::new(ErrorKind::MissingValue, "Data stack is empty.")
        })
    }

    /// Pops `(left, right)`; the right operand is the one on top.
    pub(super) fn pop_pair(&mut self) -> Result<(Var, Var), IppError> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        Ok((left, right))
    }

    pub(super) fn label_target(
        &self,
        instruction: &Instruction,
        index: usize,
    ) -> Result<usize, IppError> {
        let name = match arg(instruction, index)? {
            Operand::Label(name) => name,
            other => return Err(unexpected_operand(instruction, other, "a label")),
        };
        self.labels.get(name).copied().ok_or_else(|| {
            IppError::new(
                ErrorKind::Semantic,
                format!("Label \"{}\" does not exist.", name),
            )
        })
    }
}
