//! Comparison operators. Results are always 0/1 ints.

use crate::{
    args::ArgValues,
    builtins::Builtins,
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

/// `EQ`: structural for scalars and strings, handle identity for functions
/// and tensors, and simply 0 on a tag mismatch.
pub(super) fn op_eq(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let (a, b) = args.get_two("EQ", loc)?;
    Ok(Value::truth(a.eq_value(&b)))
}

/// `LT`/`LTE`/`GT`/`GTE`: both arguments must carry the same numeric tag.
pub(super) fn ordered(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let result = match (&a, &b) {
        (Value::Int(a), Value::Int(b)) => match op {
            Builtins::Lt => a < b,
            Builtins::Lte => a <= b,
            Builtins::Gt => a > b,
            Builtins::Gte => a >= b,
            other => unreachable!("{other} is not an ordered comparison"),
        },
        (Value::Flt(a), Value::Flt(b)) => match op {
            Builtins::Lt => a < b,
            Builtins::Lte => a <= b,
            Builtins::Gt => a > b,
            Builtins::Gte => a >= b,
            other => unreachable!("{other} is not an ordered comparison"),
        },
        _ => {
            return Err(RunError::type_error(
                format!(
                    "{name} requires two int or two flt arguments, found {} and {}",
                    a.type_name(),
                    b.type_name()
                ),
                loc,
            ));
        }
    };
    Ok(Value::truth(result))
}
