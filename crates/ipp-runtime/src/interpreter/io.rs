use std::io::{BufRead, Write};

use ipp_core::float::parse_hex_float;
use ipp_core::{parse_int, ErrorKind, Instruction, IppError, Var, VarType};
use tracing::debug;

use super::operands::{arg, type_name};
use super::Interpreter;
use crate::frames::Frame;

impl Interpreter<'_> {
    /// Reads one line. End of input or text that does not parse stores `nil`.
    pub(super) fn read(&mut self, instruction: &Instruction) -> Result<(), IppError> {
        let var_type = type_name(instruction, 1)?;
        let value = match self.read_line() {
            Some(line) => convert_line(var_type, &line),
            None => Var::Nil,
        };
        self.store(instruction, 0, value)
    }

    pub(super) fn write(&mut self, instruction: &Instruction) -> Result<(), IppError> {
        let text = self.symbol(instruction, 0)?.to_output()?;
        self.output
            .write_all(text.as_bytes())
            .map_err(|error| IppError::new(ErrorKind::Internal, error.to_string()))
    }

    pub(super) fn dprint(&mut self, instruction: &Instruction) {
        let text = match arg(instruction, 0).and_then(|operand| self.raw_symbol(operand)) {
            Ok(Var::Undef) => "undef".to_string(),
            Ok(value) => value.to_output().unwrap_or_default(),
            Err(error) => error.to_string(),
        };
        let _ = writeln!(self.diagnostics, "{}", text);
    }

    pub(super) fn break_state(&mut self, instruction: &Instruction) {
        let report = self.state_report(instruction);
        let _ = self.diagnostics.write_all(report.as_bytes());
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(error) => {
                debug!(%error, "input read failed");
                None
            }
        }
    }

    fn state_report(&self, instruction: &Instruction) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Position: {} (ip {}), executed {}\n",
            instruction, self.ip, self.stats.instructions
        ));
        report.push_str(&format!("GF: {}\n", render_frame(self.frames.global())));
        for (depth, frame) in self.frames.locals().iter().enumerate().rev() {
            report.push_str(&format!("LF[{}]: {}\n", depth, render_frame(frame)));
        }
        match self.frames.temporary() {
            Some(frame) => report.push_str(&format!("TF: {}\n", render_frame(frame))),
            None => report.push_str("TF: <none>\n"),
        }
        let stack = self
            .data_stack
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        report.push_str(&format!("Data stack: [{}]\n", stack.join(", ")));
        report.push_str(&format!("Call stack: {:?}\n", self.call_stack));
        report
    }
}

fn convert_line(var_type: VarType, line: &str) -> Var {
    let trimmed = line.trim();
    let value = match var_type {
        VarType::Int => parse_int(trimmed).map(Var::Int),
        VarType::Float => parse_hex_float(trimmed).map(Var::Float),
        VarType::Bool => Some(Var::Bool(trimmed.eq_ignore_ascii_case("true"))),
        VarType::String => Some(Var::String(line.to_string())),
        VarType::Nil | VarType::Undef => None,
    };
    value.unwrap_or(Var::Nil)
}

fn render_frame(frame: &Frame) -> String {
    let entries = frame
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>();
    format!("{{{}}}", entries.join(", "))
}
