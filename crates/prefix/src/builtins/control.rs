//! `ASSERT` and `THROW`.

use crate::{
    args::{ArgValues, expect_str},
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

/// `ASSERT(cond[, message])`: fails on a falsy condition.
pub(super) fn op_assert(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let (cond, message) = args.get_one_two("ASSERT", loc)?;
    if cond.is_truthy() {
        return Ok(Value::Null);
    }
    let message = match message {
        Some(value) => value.to_string(),
        None => "assertion failed".to_owned(),
    };
    Err(RunError::thrown(message, loc))
}

/// `THROW(message)`: fails with the string argument as the error message.
pub(super) fn op_throw(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("THROW", loc)?;
    let message = expect_str(&value, "THROW", loc)?;
    Err(RunError::thrown(message, loc))
}
