//! Variadic reduction operators with same-tag enforcement.

use crate::{
    args::ArgValues,
    builtins::Builtins,
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

/// `SUM`/`PROD`: strict numeric folds. The first argument fixes the tag.
pub(super) fn numeric(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let mut values = args.into_vec().into_iter();
    let mut acc = values.next().expect("arity checked: at least one argument");
    if !matches!(acc, Value::Int(_) | Value::Flt(_)) {
        return Err(RunError::type_error(
            format!("{name} requires numeric arguments, found {}", acc.type_name()),
            loc,
        ));
    }
    for value in values {
        acc = match (&acc, &value) {
            (Value::Int(a), Value::Int(b)) => {
                let combined = if op == Builtins::Sum {
                    a.checked_add(*b)
                } else {
                    a.checked_mul(*b)
                };
                Value::Int(combined.ok_or_else(|| {
                    RunError::arithmetic(format!("integer overflow in {name}"), loc)
                })?)
            }
            (Value::Flt(a), Value::Flt(b)) => {
                Value::Flt(if op == Builtins::Sum { a + b } else { a * b })
            }
            _ => {
                return Err(RunError::type_error(
                    format!(
                        "{name} requires arguments of one tag, found {} and {}",
                        acc.type_name(),
                        value.type_name()
                    ),
                    loc,
                ));
            }
        };
    }
    Ok(acc)
}

/// `MAX`/`MIN`: same-tag extremum. Strings compare by length; ties keep the
/// earliest argument.
pub(super) fn extremum(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let mut values = args.into_vec().into_iter();
    let mut best = values.next().expect("arity checked: at least one argument");
    if !matches!(best, Value::Int(_) | Value::Flt(_) | Value::Str(_)) {
        return Err(RunError::type_error(
            format!("{name} cannot order {} values", best.type_name()),
            loc,
        ));
    }
    for value in values {
        let beats = match (&value, &best) {
            (Value::Int(a), Value::Int(b)) => {
                if op == Builtins::Max { a > b } else { a < b }
            }
            (Value::Flt(a), Value::Flt(b)) => {
                if op == Builtins::Max { a > b } else { a < b }
            }
            (Value::Str(a), Value::Str(b)) => {
                let (a, b) = (a.chars().count(), b.chars().count());
                if op == Builtins::Max { a > b } else { a < b }
            }
            _ => {
                return Err(RunError::type_error(
                    format!(
                        "{name} requires arguments of one tag, found {} and {}",
                        best.type_name(),
                        value.type_name()
                    ),
                    loc,
                ));
            }
        };
        if beats {
            best = value;
        }
    }
    Ok(best)
}

/// `ANY`/`ALL`: truthiness folds yielding 0/1.
pub(super) fn predicate(op: Builtins, args: ArgValues, _loc: CodeLoc) -> RunResult<Value> {
    let mut iter = args.into_vec().into_iter().map(|v| v.is_truthy());
    let result = if op == Builtins::Any {
        iter.any(|t| t)
    } else {
        iter.all(|t| t)
    };
    Ok(Value::truth(result))
}
