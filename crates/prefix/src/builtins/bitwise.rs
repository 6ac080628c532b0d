//! Bitwise operators. Int only; shift amounts must be non-negative.

use crate::{
    args::ArgValues,
    builtins::Builtins,
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

pub(super) fn binary(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let (a, b) = (int_only(&a, name, loc)?, int_only(&b, name, loc)?);
    let value = match op {
        Builtins::Band => a & b,
        Builtins::Bor => a | b,
        Builtins::Bxor => a ^ b,
        other => unreachable!("{other} is not a binary bitwise operator"),
    };
    Ok(Value::Int(value))
}

pub(super) fn op_bnot(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("BNOT", loc)?;
    Ok(Value::Int(!int_only(&value, "BNOT", loc)?))
}

/// `SHL`/`SHR`. Shifts of 64 bits or more drain to the sign-extended
/// result instead of wrapping the shift amount.
pub(super) fn shift(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let (a, b) = (int_only(&a, name, loc)?, int_only(&b, name, loc)?);
    if b < 0 {
        return Err(RunError::arithmetic(format!("negative shift amount in {name}"), loc));
    }
    let amount = u32::try_from(b.min(64)).expect("clamped shift amount fits");
    let value = if amount >= 64 {
        match op {
            Builtins::Shl => 0,
            Builtins::Shr if a < 0 => -1,
            Builtins::Shr => 0,
            other => unreachable!("{other} is not a shift operator"),
        }
    } else if op == Builtins::Shl {
        a << amount
    } else {
        a >> amount
    };
    Ok(Value::Int(value))
}

fn int_only(value: &Value, op: &str, loc: CodeLoc) -> RunResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        other => Err(RunError::type_error(
            format!("{op} requires int arguments, found {}", other.type_name()),
            loc,
        )),
    }
}
