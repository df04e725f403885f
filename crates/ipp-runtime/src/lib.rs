mod frames;
mod interpreter;
mod operators;

pub use frames::{Frame, FrameManager};
pub use interpreter::{ExecStats, Interpreter, InterpreterOptions};
