//! Arithmetic operators: the strict same-tag family, the coercing integer
//! and float families, rounding division, negation, and reciprocal.

use crate::{
    args::ArgValues,
    builtins::Builtins,
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

/// The underlying binary operation shared by the strict and coercing
/// operator families.
#[derive(Debug, Clone, Copy)]
enum ArithKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl ArithKind {
    fn of(op: Builtins) -> Self {
        match op {
            Builtins::Add | Builtins::Iadd | Builtins::Fadd => Self::Add,
            Builtins::Sub | Builtins::Isub | Builtins::Fsub => Self::Sub,
            Builtins::Mul | Builtins::Imul | Builtins::Fmul => Self::Mul,
            Builtins::Div | Builtins::Idiv | Builtins::Fdiv => Self::Div,
            Builtins::Mod => Self::Mod,
            Builtins::Pow | Builtins::Ipow | Builtins::Fpow => Self::Pow,
            other => unreachable!("{other} is not an arithmetic operator"),
        }
    }
}

/// Strict arithmetic: both arguments must carry the same numeric tag and the
/// result keeps it.
pub(super) fn strict_binary(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    match (&a, &b) {
        (Value::Int(a), Value::Int(b)) => int_apply(name, ArithKind::of(op), *a, *b, loc),
        (Value::Flt(a), Value::Flt(b)) => flt_apply(name, ArithKind::of(op), *a, *b, loc),
        _ => Err(RunError::type_error(
            format!(
                "{name} requires two int or two flt arguments, found {} and {}",
                a.type_name(),
                b.type_name()
            ),
            loc,
        )),
    }
}

/// Coercing integer arithmetic: floats truncate toward zero, result is int.
pub(super) fn int_binary(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let a = coerce_int(&a, name, loc)?;
    let b = coerce_int(&b, name, loc)?;
    int_apply(name, ArithKind::of(op), a, b, loc)
}

/// Coercing float arithmetic: integers widen, result is flt.
pub(super) fn flt_binary(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let a = coerce_flt(&a, name, loc)?;
    let b = coerce_flt(&b, name, loc)?;
    flt_apply(name, ArithKind::of(op), a, b, loc)
}

/// `ISUM`/`IPROD`: variadic coercing reductions with an int result.
pub(super) fn int_fold(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let kind = if op == Builtins::Isum { ArithKind::Add } else { ArithKind::Mul };
    let mut acc: Option<i64> = None;
    for value in args {
        let value = coerce_int(&value, name, loc)?;
        acc = Some(match acc {
            None => value,
            Some(acc) => match int_apply(name, kind, acc, value, loc)? {
                Value::Int(v) => v,
                _ => unreachable!("integer arithmetic yields int"),
            },
        });
    }
    Ok(Value::Int(acc.expect("arity checked: at least one argument")))
}

/// `FSUM`/`FPROD`: variadic coercing reductions with a flt result.
pub(super) fn flt_fold(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let mut acc: Option<f64> = None;
    for value in args {
        let value = coerce_flt(&value, name, loc)?;
        acc = Some(match acc {
            None => value,
            Some(acc) if op == Builtins::Fsum => acc + value,
            Some(acc) => acc * value,
        });
    }
    Ok(Value::Flt(acc.expect("arity checked: at least one argument")))
}

/// `CDIV`: ceiling division on integers.
pub(super) fn op_cdiv(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let (a, b) = args.get_two("CDIV", loc)?;
    let (Value::Int(a), Value::Int(b)) = (&a, &b) else {
        return Err(RunError::type_error(
            format!(
                "CDIV requires two int arguments, found {} and {}",
                a.type_name(),
                b.type_name()
            ),
            loc,
        ));
    };
    if *b == 0 {
        return Err(RunError::arithmetic("division by zero in CDIV", loc));
    }
    if *a == i64::MIN && *b == -1 {
        return Err(RunError::arithmetic("integer overflow in CDIV", loc));
    }
    Ok(Value::Int(num_integer::Integer::div_ceil(a, b)))
}

/// `NEG`: strict numeric negation.
pub(super) fn op_neg(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    match args.get_one("NEG", loc)? {
        Value::Int(v) => v
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| RunError::arithmetic("integer overflow in NEG", loc)),
        Value::Flt(v) => Ok(Value::Flt(-v)),
        other => Err(RunError::type_error(
            format!("NEG requires a numeric argument, found {}", other.type_name()),
            loc,
        )),
    }
}

/// `INV`: reciprocal; coerces to flt.
pub(super) fn op_inv(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("INV", loc)?;
    let value = coerce_flt(&value, "INV", loc)?;
    if value == 0.0 {
        return Err(RunError::arithmetic("division by zero in INV", loc));
    }
    Ok(Value::Flt(1.0 / value))
}

fn int_apply(name: &'static str, kind: ArithKind, a: i64, b: i64, loc: CodeLoc) -> RunResult<Value> {
    let overflow = || RunError::arithmetic(format!("integer overflow in {name}"), loc);
    let value = match kind {
        ArithKind::Add => a.checked_add(b).ok_or_else(overflow)?,
        ArithKind::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        ArithKind::Mul => a.checked_mul(b).ok_or_else(overflow)?,
        ArithKind::Div | ArithKind::Mod => {
            if b == 0 {
                return Err(RunError::arithmetic(format!("division by zero in {name}"), loc));
            }
            let result = if matches!(kind, ArithKind::Div) {
                a.checked_div(b)
            } else {
                a.checked_rem(b)
            };
            result.ok_or_else(overflow)?
        }
        ArithKind::Pow => {
            let exp = u32::try_from(b)
                .map_err(|_| RunError::arithmetic(format!("negative exponent in {name}"), loc))?;
            a.checked_pow(exp).ok_or_else(overflow)?
        }
    };
    Ok(Value::Int(value))
}

fn flt_apply(name: &'static str, kind: ArithKind, a: f64, b: f64, loc: CodeLoc) -> RunResult<Value> {
    let value = match kind {
        ArithKind::Add => a + b,
        ArithKind::Sub => a - b,
        ArithKind::Mul => a * b,
        ArithKind::Div | ArithKind::Mod => {
            if b == 0.0 {
                return Err(RunError::arithmetic(format!("division by zero in {name}"), loc));
            }
            if matches!(kind, ArithKind::Div) { a / b } else { a % b }
        }
        ArithKind::Pow => a.powf(b),
    };
    Ok(Value::Flt(value))
}

/// Int passes through; flt truncates toward zero (saturating at the i64
/// range ends); anything else is a type error.
pub(super) fn coerce_int(value: &Value, op: &str, loc: CodeLoc) -> RunResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Flt(v) => Ok(*v as i64),
        other => Err(RunError::type_error(
            format!("{op} requires numeric arguments, found {}", other.type_name()),
            loc,
        )),
    }
}

/// Flt passes through; int widens; anything else is a type error.
pub(super) fn coerce_flt(value: &Value, op: &str, loc: CodeLoc) -> RunResult<f64> {
    match value {
        Value::Int(v) => Ok(*v as f64),
        Value::Flt(v) => Ok(*v),
        other => Err(RunError::type_error(
            format!("{op} requires numeric arguments, found {}", other.type_name()),
            loc,
        )),
    }
}
