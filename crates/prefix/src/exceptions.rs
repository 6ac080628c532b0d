//! Runtime errors and tracebacks.
//!
//! Every operator and statement that can fail produces a [`RunError`]
//! carrying a message and the source location of the failing call or
//! statement. `TRY`/`CATCH` is the only recovery site; an error that unwinds
//! past the last enclosing `TRY` is converted into a public [`Exception`]
//! whose `Display` output is the formatted traceback.

use std::fmt;

use strum::{Display, IntoStaticStr};

use crate::{
    environment::EnvError,
    expressions::CodeLoc,
};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// Categorical error kinds.
///
/// The kinds are diagnostic: `CATCH` binds only the message, so user code
/// never branches on them. `Thrown` covers errors raised by user code
/// through `THROW` and failed `ASSERT`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Name,
    Uninitialized,
    Type,
    Arity,
    Arithmetic,
    Control,
    Extension,
    Thrown,
}

/// A runtime error in flight: message plus the source location it was
/// raised at.
#[derive(Debug, Clone)]
pub struct RunError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: CodeLoc,
}

impl RunError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: CodeLoc) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    pub(crate) fn name_error(name: &str, location: CodeLoc) -> Self {
        Self::new(ErrorKind::Name, format!("'{name}' is not defined"), location)
    }

    pub(crate) fn uninitialized(name: &str, location: CodeLoc) -> Self {
        Self::new(
            ErrorKind::Uninitialized,
            format!("'{name}' is declared but not initialized"),
            location,
        )
    }

    pub(crate) fn type_error(message: impl Into<String>, location: CodeLoc) -> Self {
        Self::new(ErrorKind::Type, message, location)
    }

    pub(crate) fn arity_error(op: &str, min: usize, max: Option<usize>, got: usize, location: CodeLoc) -> Self {
        let expected = match max {
            Some(max) if max == min => format!("exactly {min}"),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        Self::new(
            ErrorKind::Arity,
            format!("{op} takes {expected} arguments, got {got}"),
            location,
        )
    }

    pub(crate) fn arithmetic(message: impl Into<String>, location: CodeLoc) -> Self {
        Self::new(ErrorKind::Arithmetic, message, location)
    }

    pub(crate) fn control(message: impl Into<String>, location: CodeLoc) -> Self {
        Self::new(ErrorKind::Control, message, location)
    }

    pub(crate) fn extension(message: impl Into<String>, location: CodeLoc) -> Self {
        Self::new(ErrorKind::Extension, message, location)
    }

    pub(crate) fn thrown(message: impl Into<String>, location: CodeLoc) -> Self {
        Self::new(ErrorKind::Thrown, message, location)
    }

    /// Attaches a location to an environment-layer error.
    pub(crate) fn from_env(err: EnvError, location: CodeLoc) -> Self {
        match err {
            EnvError::NotFound(name) => Self::name_error(&name, location),
            EnvError::Uninitialized(name) => Self::uninitialized(&name, location),
            EnvError::TypeMismatch { name, expected, found } => Self::type_error(
                format!("cannot assign {found} to '{name}' declared as {expected}"),
                location,
            ),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Thrown => write!(f, "error: {}", self.message),
            kind => write!(f, "{kind} error: {}", self.message),
        }
    }
}

/// One record on the interpreter's diagnostic stack: an active function
/// call, updated with the last executed line/column as its body runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Function name, or `<program>` for the top-level frame.
    pub function: String,
    pub source_path: String,
    pub location: CodeLoc,
}

/// An error that unwound past the last enclosing `TRY`.
///
/// `Display` renders the traceback: one line per trace frame, innermost
/// last, followed by the error itself.
#[derive(Debug, Clone)]
pub struct Exception {
    pub kind: ErrorKind,
    pub message: String,
    pub location: CodeLoc,
    pub frames: Vec<StackFrame>,
}

impl Exception {
    pub(crate) fn from_error(error: RunError, frames: Vec<StackFrame>) -> Self {
        Self {
            kind: error.kind,
            message: error.message,
            location: error.location,
            frames,
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "traceback (innermost call last):")?;
        for frame in &self.frames {
            writeln!(
                f,
                "  in {} at {}:{}",
                frame.function, frame.source_path, frame.location
            )?;
        }
        let error = RunError::new(self.kind, self.message.clone(), self.location);
        write!(f, "{error} ({})", self.location)
    }
}

impl std::error::Error for Exception {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn traceback_lists_frames_innermost_last() {
        let exc = Exception::from_error(
            RunError::type_error("bad tag", CodeLoc::new(4, 9)),
            vec![
                StackFrame {
                    function: "<program>".to_owned(),
                    source_path: "main.pfx".to_owned(),
                    location: CodeLoc::new(2, 1),
                },
                StackFrame {
                    function: "add".to_owned(),
                    source_path: "main.pfx".to_owned(),
                    location: CodeLoc::new(4, 9),
                },
            ],
        );
        assert_eq!(
            exc.to_string(),
            "traceback (innermost call last):\n  in <program> at main.pfx:2:1\n  in add at main.pfx:4:9\ntype error: bad tag (4:9)"
        );
    }
}
