//! Argument plumbing for builtin and extension operators.

use crate::{
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

/// Evaluated call arguments.
///
/// Specific variants cover the common shapes (0-3 arguments) so most calls
/// avoid a heap allocation; variadic operators fall back to `Many`.
#[derive(Debug)]
pub enum ArgValues {
    Empty,
    One(Value),
    Two(Value, Value),
    Three(Value, Value, Value),
    Many(Vec<Value>),
}

impl ArgValues {
    #[must_use]
    pub fn from_vec(mut values: Vec<Value>) -> Self {
        match values.len() {
            0 => Self::Empty,
            1 => Self::One(values.remove(0)),
            2 => {
                let b = values.pop().expect("len 2");
                let a = values.pop().expect("len 2");
                Self::Two(a, b)
            }
            3 => {
                let c = values.pop().expect("len 3");
                let b = values.pop().expect("len 3");
                let a = values.pop().expect("len 3");
                Self::Three(a, b, c)
            }
            _ => Self::Many(values),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Two(..) => 2,
            Self::Three(..) => 3,
            Self::Many(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Self::Empty => vec![],
            Self::One(a) => vec![a],
            Self::Two(a, b) => vec![a, b],
            Self::Three(a, b, c) => vec![a, b, c],
            Self::Many(values) => values,
        }
    }

    /// Exactly one argument.
    pub fn get_one(self, op: &str, location: CodeLoc) -> RunResult<Value> {
        match self {
            Self::One(a) => Ok(a),
            other => Err(RunError::arity_error(op, 1, Some(1), other.len(), location)),
        }
    }

    /// Exactly two arguments.
    pub fn get_two(self, op: &str, location: CodeLoc) -> RunResult<(Value, Value)> {
        match self {
            Self::Two(a, b) => Ok((a, b)),
            other => Err(RunError::arity_error(op, 2, Some(2), other.len(), location)),
        }
    }

    /// Exactly three arguments.
    pub fn get_three(self, op: &str, location: CodeLoc) -> RunResult<(Value, Value, Value)> {
        match self {
            Self::Three(a, b, c) => Ok((a, b, c)),
            other => Err(RunError::arity_error(op, 3, Some(3), other.len(), location)),
        }
    }

    /// Zero or one argument.
    pub fn get_zero_one(self, op: &str, location: CodeLoc) -> RunResult<Option<Value>> {
        match self {
            Self::Empty => Ok(None),
            Self::One(a) => Ok(Some(a)),
            other => Err(RunError::arity_error(op, 0, Some(1), other.len(), location)),
        }
    }

    /// One or two arguments.
    pub fn get_one_two(self, op: &str, location: CodeLoc) -> RunResult<(Value, Option<Value>)> {
        match self {
            Self::One(a) => Ok((a, None)),
            Self::Two(a, b) => Ok((a, Some(b))),
            other => Err(RunError::arity_error(op, 1, Some(2), other.len(), location)),
        }
    }
}

impl IntoIterator for ArgValues {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// Requires an `int` argument, reporting the operator name on mismatch.
pub(crate) fn expect_int(value: &Value, op: &str, location: CodeLoc) -> RunResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        other => Err(RunError::type_error(
            format!("{op} requires an int argument, found {}", other.type_name()),
            location,
        )),
    }
}

/// Requires a `str` argument, reporting the operator name on mismatch.
pub(crate) fn expect_str<'a>(value: &'a Value, op: &str, location: CodeLoc) -> RunResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(RunError::type_error(
            format!("{op} requires a str argument, found {}", other.type_name()),
            location,
        )),
    }
}
