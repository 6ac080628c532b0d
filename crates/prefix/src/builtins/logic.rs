//! Logical operators over truthiness. Results are always 0/1 ints.

use crate::{
    args::ArgValues,
    builtins::Builtins,
    exceptions::RunResult,
    expressions::CodeLoc,
    value::Value,
};

pub(super) fn binary(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let (a, b) = (a.is_truthy(), b.is_truthy());
    let result = match op {
        Builtins::And => a && b,
        Builtins::Or => a || b,
        Builtins::Xor => a != b,
        other => unreachable!("{other} is not a binary logical operator"),
    };
    Ok(Value::truth(result))
}

pub(super) fn unary(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let truthy = args.get_one(name, loc)?.is_truthy();
    Ok(Value::truth(if op == Builtins::Not { !truthy } else { truthy }))
}
