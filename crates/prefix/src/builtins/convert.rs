//! Conversion operators and runtime type probes.
//!
//! Numeric/string conversions use the language's base-2 numeral convention;
//! see `value.rs` for the exact parsing and formatting rules.

use crate::{
    args::ArgValues,
    builtins::Builtins,
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::{self, Value},
};

/// `INT`: identity on ints, truncation on floats, base-2 parse on strings.
pub(super) fn op_int(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    match args.get_one("INT", loc)? {
        Value::Int(v) => Ok(Value::Int(v)),
        Value::Flt(v) => Ok(Value::Int(v as i64)),
        Value::Str(s) => Ok(Value::Int(value::binary_to_int(&s))),
        other => Err(RunError::type_error(
            format!("INT cannot convert {}", other.type_name()),
            loc,
        )),
    }
}

/// `FLT`: identity on floats, widening on ints, base-2 parse on strings.
pub(super) fn op_flt(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    match args.get_one("FLT", loc)? {
        Value::Int(v) => Ok(Value::Flt(v as f64)),
        Value::Flt(v) => Ok(Value::Flt(v)),
        Value::Str(s) => Ok(Value::Flt(value::binary_to_flt(&s))),
        other => Err(RunError::type_error(
            format!("FLT cannot convert {}", other.type_name()),
            loc,
        )),
    }
}

/// `STR`: identity on strings, base-2 formatting on numerics.
pub(super) fn op_str(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    match args.get_one("STR", loc)? {
        Value::Int(v) => Ok(Value::Str(value::int_to_binary(v))),
        Value::Flt(v) => Ok(Value::Str(value::flt_to_binary(v))),
        Value::Str(s) => Ok(Value::Str(s)),
        other => Err(RunError::type_error(
            format!("STR cannot convert {}", other.type_name()),
            loc,
        )),
    }
}

/// `ISINT`/`ISFLT`/`ISSTR`: runtime tag probes.
pub(super) fn probe(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let value = args.get_one(name, loc)?;
    let result = match op {
        Builtins::Isint => matches!(value, Value::Int(_)),
        Builtins::Isflt => matches!(value, Value::Flt(_)),
        Builtins::Isstr => matches!(value, Value::Str(_)),
        other => unreachable!("{other} is not a type probe"),
    };
    Ok(Value::truth(result))
}

/// `TYPE`: the runtime tag's name as a string.
pub(super) fn op_type(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("TYPE", loc)?;
    Ok(Value::Str(value.type_name().to_owned()))
}
