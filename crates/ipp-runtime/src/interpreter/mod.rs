use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::rc::Rc;

use ipp_core::{ErrorKind, Instruction, IppError, Opcode, Operand, Program, Var};
use tracing::{debug, trace, warn};

use crate::frames::FrameManager;

mod control_flow;
mod dispatch;
mod io;
mod operands;
mod stats;


pub use stats::ExecStats;

use dispatch::Flow;

pub struct InterpreterOptions<'io> {
    pub program: Program,
    pub input: Box<dyn BufRead + 'io>,
    pub output: Box<dyn Write + 'io>,
    pub diagnostics: Box<dyn Write + 'io>,
    /// Maximum number of executed instructions; `None` runs until the program stops.
    pub step_limit: Option<u64>,
}

pub struct Interpreter<'io> {
    instructions: Rc<[Instruction]>,
    labels: HashMap<String, usize>,
    ip: usize,
    frames: FrameManager,
    data_stack: Vec<Var>,
    call_stack: Vec<usize>,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
    diagnostics: Box<dyn Write + 'io>,
    stats: ExecStats,
    step_limit: Option<u64>,
    steps: u64,
    exit_code: Option<i32>,
}

impl<'io> Interpreter<'io> {
    pub fn new(options: InterpreterOptions<'io>) -> Result<Self, IppError> {
        let InterpreterOptions {
            program,
            input,
            output,
            diagnostics,
            step_limit,
        } = options;
        let labels = build_label_table(&program.instructions)?;
        debug!(
            instructions = program.instructions.len(),
            labels = labels.len(),
            "interpreter ready"
        );

        Ok(Self {
            instructions: program.instructions.into(),
            labels,
            ip: 0,
            frames: FrameManager::new(),
            data_stack: Vec::new(),
            call_stack: Vec::new(),
            input,
            output,
            diagnostics,
            stats: ExecStats::default(),
            step_limit,
            steps: 0,
            exit_code: None,
        })
    }

    /// Runs to completion and returns the process exit code. Program output is flushed
    /// whether or not execution fails.
    pub fn run(&mut self) -> Result<i32, IppError> {
        let result = self.run_to_end();
        let flushed = self.flush_output();
        let code = result?;
        flushed?;
        Ok(code)
    }

    /// Executes one instruction. Returns the exit code once the program has stopped.
    pub fn step(&mut self) -> Result<Option<i32>, IppError> {
        if let Some(code) = self.exit_code {
            return Ok(Some(code));
        }

        let instructions = Rc::clone(&self.instructions);
        let Some(instruction) = instructions.get(self.ip) else {
            self.exit_code = Some(0);
            return Ok(Some(0));
        };

        if self.step_limit.is_some_and(|limit| self.steps >= limit) {
            return Err(IppError::with_order(
                ErrorKind::Internal,
                format!("Step limit of {} instructions exceeded.", self.steps),
                instruction.order,
            ));
        }
        self.steps += 1;
        trace!(ip = self.ip, instruction = %instruction, "execute");

        let flow = self.execute(instruction).map_err(|mut error| {
            error.order.get_or_insert(instruction.order);
            error
        })?;
        self.stats
            .record(instruction.opcode, self.frames.initialized_count());

        match flow {
            Flow::Next => self.ip += 1,
            Flow::Jump(target) => self.ip = target,
            Flow::Exit(code) => {
                debug!(code, order = instruction.order, "program exited");
                self.exit_code = Some(code);
                return Ok(Some(code));
            }
        }
        Ok(None)
    }

    pub fn stats(&self) -> ExecStats {
        self.stats
    }

    pub fn frames(&self) -> &FrameManager {
        &self.frames
    }

    pub fn data_stack(&self) -> &[Var] {
        &self.data_stack
    }

    fn run_to_end(&mut self) -> Result<i32, IppError> {
        loop {
            if let Some(code) = self.step()? {
                return Ok(code);
            }
        }
    }

    fn flush_output(&mut self) -> Result<(), IppError> {
        self.output
            .flush()
            .map_err(|error| IppError::new(ErrorKind::Internal, error.to_string()))
    }
}

fn build_label_table(instructions: &[Instruction]) -> Result<HashMap<String, usize>, IppError> {
    let mut labels = HashMap::new();
    for (index, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != Opcode::Label {
            continue;
        }
        let Some(Operand::Label(name)) = instruction.args.first() else {
            return Err(IppError::with_order(
                ErrorKind::Internal,
                "LABEL without a label operand.",
                instruction.order,
            ));
        };
        if labels.insert(name.clone(), index).is_some() {
            warn!(label = %name, order = instruction.order, "duplicate label");
            return Err(IppError::with_order(
                ErrorKind::Semantic,
                format!("Label \"{}\" is defined more than once.", name),
                instruction.order,
            ));
        }
    }
    Ok(labels)
}
