use ipp_core::Opcode;

/// Counters collected while a program runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStats {
    /// Executed instructions, not counting `LABEL`, `DPRINT` and `BREAK`.
    pub instructions: u64,
    /// Highest number of initialized variables seen across all frames after any instruction.
    pub max_initialized_vars: usize,
}

impl ExecStats {
    pub(super) fn record(&mut self, opcode: Opcode, initialized_vars: usize) {
        if !matches!(opcode, Opcode::Label | Opcode::DPrint | Opcode::Break) {
            self.instructions += 1;
        }
        self.max_initialized_vars = self.max_initialized_vars.max(initialized_vars);
    }
}
