use std::collections::BTreeMap;

use ipp_core::{ErrorKind, FrameScope, IppError, Var};

pub type Frame = BTreeMap<String, Var>;

/// Global frame, local frame stack and the optional temporary frame.
///
/// Frames move between the temporary slot and the local stack by value, so no frame is
/// ever reachable from two places at once.
#[derive(Debug, Default)]
pub struct FrameManager {
    global: Frame,
    locals: Vec<Frame>,
    temporary: Option<Frame>,
    /// Running count of non-`Undef` variables in every existing frame.
    initialized: usize,
}

impl FrameManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_frame(&mut self) {
        self.discard_temporary();
        self.temporary = Some(Frame::new());
    }

    pub fn push_frame(&mut self) -> Result<(), IppError> {
        let frame = self.temporary.take().ok_or_else(|| {
            IppError::new(
                ErrorKind::FrameNotFound,
                "PUSHFRAME without a temporary frame.",
            )
        })?;
        self.locals.push(frame);
        Ok(())
    }

    pub fn pop_frame(&mut self) -> Result<(), IppError> {
        let frame = self.locals.pop().ok_or_else(|| {
            IppError::new(ErrorKind::FrameNotFound, "POPFRAME with no local frame.")
        })?;
        self.discard_temporary();
        self.temporary = Some(frame);
        Ok(())
    }

    pub fn define(&mut self, scope: FrameScope, name: &str) -> Result<(), IppError> {
        let frame = self.frame_mut(scope)?;
        if frame.contains_key(name) {
            return Err(IppError::new(
                ErrorKind::Semantic,
                format!("Variable {}@{} is already defined.", scope.prefix(), name),
            ));
        }
        frame.insert(name.to_string(), Var::Undef);
        Ok(())
    }

    pub fn resolve(&self, scope: FrameScope, name: &str) -> Result<&Var, IppError> {
        self.frame(scope)?
            .get(name)
            .ok_or_else(|| missing_variable(scope, name))
    }

    /// Overwrites a defined variable, keeping the initialized count in step.
    pub fn assign(&mut self, scope: FrameScope, name: &str, value: Var) -> Result<(), IppError> {
        let slot = self
            .frame_mut(scope)?
            .get_mut(name)
            .ok_or_else(|| missing_variable(scope, name))?;
        let was_undef = slot.is_undef();
        let now_undef = value.is_undef();
        *slot = value;
        match (was_undef, now_undef) {
            (true, false) => self.initialized += 1,
            (false, true) => self.initialized -= 1,
            _ => {}
        }
        Ok(())
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    pub fn locals(&self) -> &[Frame] {
        &self.locals
    }

    pub fn temporary(&self) -> Option<&Frame> {
        self.temporary.as_ref()
    }

    /// Number of variables holding a value, across every frame that currently exists.
    pub fn initialized_count(&self) -> usize {
        self.initialized
    }

    fn discard_temporary(&mut self) {
        if let Some(frame) = self.temporary.take() {
            self.initialized -= initialized_in(&frame);
        }
    }

    fn frame(&self, scope: FrameScope) -> Result<&Frame, IppError> {
        match scope {
            FrameScope::Global => Ok(&self.global),
            FrameScope::Local => self.locals.last().ok_or_else(|| missing_frame(scope)),
            FrameScope::Temporary => self.temporary.as_ref().ok_or_else(|| missing_frame(scope)),
        }
    }

    fn frame_mut(&mut self, scope: FrameScope) -> Result<&mut Frame, IppError> {
        match scope {
            FrameScope::Global => Ok(&mut self.global),
            FrameScope::Local => self.locals.last_mut().ok_or_else(|| missing_frame(scope)),
            FrameScope::Temporary => self.temporary.as_mut().ok_or_else(|| missing_frame(scope)),
        }
    }
}

fn initialized_in(frame: &Frame) -> usize {
    frame.values().filter(|value| !value.is_undef()).count()
}

fn missing_frame(scope: FrameScope) -> IppError {
    let message = match scope {
        FrameScope::Local => "Local frame stack is empty.",
        _ => "Temporary frame does not exist.",
    };
    IppError::new(ErrorKind::FrameNotFound, message)
}

fn missing_variable(scope: FrameScope, name: &str) -> IppError {
    IppError::new(
        ErrorKind::VarNotFound,
        format!("Variable {}@{} is not defined.", scope.prefix(), name),
    )
}
