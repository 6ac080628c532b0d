//! Root, logarithm, and gcd/lcm operators.

use num_integer::Integer as _;
use num_traits::ToPrimitive as _;

use crate::{
    args::ArgValues,
    builtins::{
        Builtins,
        arith::{coerce_flt, coerce_int},
    },
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    value::Value,
};

/// `ROOT` (strict), `IROOT` (coercing int), `FROOT` (coercing flt).
pub(super) fn op_root(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (x, n) = args.get_two(name, loc)?;
    match op {
        Builtins::Root => match (&x, &n) {
            (Value::Int(x), Value::Int(n)) => int_root(name, *x, *n, loc),
            (Value::Flt(x), Value::Flt(n)) => flt_root(name, *x, *n, loc),
            _ => Err(RunError::type_error(
                format!(
                    "{name} requires two int or two flt arguments, found {} and {}",
                    x.type_name(),
                    n.type_name()
                ),
                loc,
            )),
        },
        Builtins::Iroot => int_root(name, coerce_int(&x, name, loc)?, coerce_int(&n, name, loc)?, loc),
        Builtins::Froot => flt_root(name, coerce_flt(&x, name, loc)?, coerce_flt(&n, name, loc)?, loc),
        other => unreachable!("{other} is not a root operator"),
    }
}

/// Floor of the integer n-th root, by binary search on the magnitude.
///
/// Sign rules: an even root of a negative base fails; an odd root of a
/// negative base is the negated root of the magnitude. A negative exponent
/// takes the reciprocal of the positive-exponent root, truncated like `DIV`.
fn int_root(name: &'static str, x: i64, n: i64, loc: CodeLoc) -> RunResult<Value> {
    if n == 0 {
        return Err(RunError::arithmetic(format!("zeroth root in {name}"), loc));
    }
    if n < 0 {
        let root = match int_root(name, x, n.unsigned_abs().to_i64().map_or(i64::MAX, |v| v), loc)? {
            Value::Int(v) => v,
            _ => unreachable!("integer root yields int"),
        };
        if root == 0 {
            return Err(RunError::arithmetic(format!("division by zero in {name}"), loc));
        }
        return Ok(Value::Int(1 / root));
    }
    if x < 0 {
        if n % 2 == 0 {
            return Err(RunError::arithmetic(
                format!("even root of negative int in {name}"),
                loc,
            ));
        }
        let magnitude_root = unsigned_root(x.unsigned_abs(), n);
        // the negated magnitude always fits: |i64::MIN| is the largest case
        let negated = -i128::from(magnitude_root);
        return Ok(Value::Int(i64::try_from(negated).expect("odd root magnitude fits i64")));
    }
    Ok(Value::Int(unsigned_root(x.unsigned_abs(), n) as i64))
}

/// Largest `m` with `m^n <= x`, for `x >= 0` and `n >= 1`.
fn unsigned_root(x: u64, n: i64) -> u64 {
    if x <= 1 {
        return x;
    }
    // any root of order >= 64 of a u64 magnitude is 1
    let Ok(n) = u32::try_from(n.min(64)) else {
        return 1;
    };
    if n == 1 {
        return x;
    }
    let (mut lo, mut hi) = (1u64, x);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if pow_at_most(mid, n, x) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Whether `base^exp <= limit`, without overflowing.
fn pow_at_most(base: u64, exp: u32, limit: u64) -> bool {
    let mut acc: u128 = 1;
    for _ in 0..exp {
        acc *= u128::from(base);
        if acc > u128::from(limit) {
            return false;
        }
    }
    true
}

fn flt_root(name: &'static str, x: f64, n: f64, loc: CodeLoc) -> RunResult<Value> {
    if n == 0.0 {
        return Err(RunError::arithmetic(format!("zeroth root in {name}"), loc));
    }
    let result = x.powf(1.0 / n);
    if result.is_nan() {
        return Err(RunError::arithmetic(format!("invalid root in {name}"), loc));
    }
    Ok(Value::Flt(result))
}

/// `LOG` (floor of log2) and `CLOG` (ceiling of log2; for ints, the bit
/// length except on exact powers of two).
pub(super) fn op_log(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    match args.get_one(name, loc)? {
        Value::Int(x) => {
            if x <= 0 {
                return Err(RunError::arithmetic(
                    format!("logarithm of non-positive int in {name}"),
                    loc,
                ));
            }
            let floor_log2 = i64::from(63 - x.leading_zeros());
            let value = if op == Builtins::Log {
                floor_log2
            } else if x & (x - 1) == 0 {
                // exact power of two: ceiling equals the exponent
                floor_log2
            } else {
                floor_log2 + 1
            };
            Ok(Value::Int(value))
        }
        Value::Flt(x) => {
            if x <= 0.0 {
                return Err(RunError::arithmetic(
                    format!("logarithm of non-positive flt in {name}"),
                    loc,
                ));
            }
            let value = if op == Builtins::Log { x.log2() } else { x.log2().ceil() };
            Ok(Value::Flt(value))
        }
        other => Err(RunError::type_error(
            format!("{name} requires a numeric argument, found {}", other.type_name()),
            loc,
        )),
    }
}

/// `GCD`/`LCM`: Euclidean on absolute values; accepts ints and
/// integer-valued floats, always yielding an int.
pub(super) fn op_gcd_lcm(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let (a, b) = args.get_two(name, loc)?;
    let a = integer_valued(&a, name, loc)?;
    let b = integer_valued(&b, name, loc)?;
    let (a_mag, b_mag) = (a.unsigned_abs(), b.unsigned_abs());

    let result = if op == Builtins::Gcd {
        a_mag.gcd(&b_mag)
    } else if a_mag == 0 || b_mag == 0 {
        0
    } else {
        let g = a_mag.gcd(&b_mag);
        (a_mag / g)
            .checked_mul(b_mag)
            .ok_or_else(|| RunError::arithmetic(format!("integer overflow in {name}"), loc))?
    };
    i64::try_from(result)
        .map(Value::Int)
        .map_err(|_| RunError::arithmetic(format!("integer overflow in {name}"), loc))
}

/// Accepts an int or an integer-valued flt.
fn integer_valued(value: &Value, op: &str, loc: CodeLoc) -> RunResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Flt(v) if v.fract() == 0.0 => v.to_i64().ok_or_else(|| {
            RunError::arithmetic(format!("flt argument out of int range in {op}"), loc)
        }),
        other => Err(RunError::type_error(
            format!(
                "{op} requires int or integer-valued flt arguments, found {}",
                other.type_name()
            ),
            loc,
        )),
    }
}
