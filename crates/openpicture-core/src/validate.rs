//! Structural validation of scope markers.

use crate::sink::{PictureSink, SinkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    StateChange,
    FontState,
    SavedState,
}

impl Scope {
    fn name(self) -> &'static str {
        match self {
            Scope::StateChange => "ENTER_STATE_CHANGE",
            Scope::FontState => "ENTER_FONT_STATE",
            Scope::SavedState => "PUSH_STATE",
        }
    }

    fn closer(self) -> &'static str {
        match self {
            Scope::StateChange => "EXIT_STATE_CHANGE",
            Scope::FontState => "EXIT_FONT_STATE",
            Scope::SavedState => "POP_STATE",
        }
    }
}

/// A sink that checks scope-marker balance and nothing else.
///
/// Accepts a stream only when every Enter has its matching Exit before the
/// enclosing scope closes and the nesting depth returns to zero at the end of
/// each ops block. Pairs well with any other sink over two passes, or by
/// itself as a cheap structural lint.
#[derive(Debug, Default)]
pub struct ScopeValidator {
    stack: Vec<Scope>,
    max_depth: usize,
}

impl ScopeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest nesting observed so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn open(&mut self, scope: Scope) -> Result<(), SinkError> {
        self.stack.push(scope);
        self.max_depth = self.max_depth.max(self.stack.len());
        Ok(())
    }

    fn close(&mut self, scope: Scope) -> Result<(), SinkError> {
        match self.stack.pop() {
            Some(open) if open == scope => Ok(()),
            Some(open) => Err(SinkError::UnbalancedScope(format!(
                "expected {}, found {}",
                open.closer(),
                scope.closer()
            ))),
            None => Err(SinkError::UnbalancedScope(format!(
                "{} without a matching {}",
                scope.closer(),
                scope.name()
            ))),
        }
    }
}

impl PictureSink for ScopeValidator {
    fn enter_state_change(&mut self) -> Result<(), SinkError> {
        self.open(Scope::StateChange)
    }

    fn exit_state_change(&mut self) -> Result<(), SinkError> {
        self.close(Scope::StateChange)
    }

    fn enter_font_state(&mut self) -> Result<(), SinkError> {
        self.open(Scope::FontState)
    }

    fn exit_font_state(&mut self) -> Result<(), SinkError> {
        self.close(Scope::FontState)
    }

    fn push_state(&mut self) -> Result<(), SinkError> {
        self.open(Scope::SavedState)
    }

    fn pop_state(&mut self) -> Result<(), SinkError> {
        self.close(Scope::SavedState)
    }

    fn exit_ops(&mut self) -> Result<(), SinkError> {
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(SinkError::UnbalancedScope(format!(
                "{} scope(s) still open at end of ops block, innermost {}",
                self.stack.len(),
                self.stack.last().map(|s| s.name()).unwrap_or("?"),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    fn play(commands: &[Command]) -> Result<(), SinkError> {
        let mut validator = ScopeValidator::new();
        validator.enter_ops()?;
        for c in commands {
            c.dispatch(&mut validator)?;
        }
        validator.exit_ops()
    }

    #[test]
    fn test_balanced_stream_accepted() {
        play(&[
            Command::PushState,
            Command::EnterStateChange,
            Command::SetPenSize(1.0),
            Command::ExitStateChange,
            Command::PopState,
        ])
        .unwrap();
    }

    #[test]
    fn test_unmatched_push_rejected() {
        let err = play(&[Command::PushState]).unwrap_err();
        assert!(matches!(err, SinkError::UnbalancedScope(_)));
    }

    #[test]
    fn test_mismatched_exit_rejected() {
        let err = play(&[Command::EnterFontState, Command::ExitStateChange]).unwrap_err();
        assert!(matches!(err, SinkError::UnbalancedScope(_)));
    }

    #[test]
    fn test_pop_without_push_rejected() {
        let err = play(&[Command::PopState]).unwrap_err();
        assert!(matches!(err, SinkError::UnbalancedScope(_)));
    }

    #[test]
    fn test_max_depth_tracked() {
        let mut validator = ScopeValidator::new();
        for _ in 0..3 {
            validator.push_state().unwrap();
        }
        for _ in 0..3 {
            validator.pop_state().unwrap();
        }
        assert_eq!(validator.max_depth(), 3);
        assert_eq!(validator.depth(), 0);
    }
}
