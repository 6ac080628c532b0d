//! String operators.
//!
//! Strings are UTF-8; the slicing and length operators work on characters so
//! multi-byte text never splits mid-codepoint, and the case operators apply
//! ASCII folding only.

use crate::{
    args::{ArgValues, expect_int, expect_str},
    builtins::Builtins,
    exceptions::RunResult,
    expressions::CodeLoc,
    value::Value,
};

pub(super) fn op_slen(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("SLEN", loc)?;
    let s = expect_str(&value, "SLEN", loc)?;
    Ok(Value::Int(s.chars().count() as i64))
}

pub(super) fn case(op: Builtins, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let name: &'static str = op.into();
    let value = args.get_one(name, loc)?;
    let s = expect_str(&value, name, loc)?;
    let folded = if op == Builtins::Upper {
        s.to_ascii_uppercase()
    } else {
        s.to_ascii_lowercase()
    };
    Ok(Value::Str(folded))
}

/// `SLICE(s, start, end)`: 1-based, inclusive-exclusive. Negative indices
/// count from `length + 1`; after normalization the range is clamped and an
/// empty slice is returned when `start >= end`.
pub(super) fn op_slice(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let (s, start, end) = args.get_three("SLICE", loc)?;
    let s = expect_str(&s, "SLICE", loc)?;
    let start = expect_int(&start, "SLICE", loc)?;
    let end = expect_int(&end, "SLICE", loc)?;

    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as i64;
    let normalize = |index: i64| if index < 0 { len + 1 + index } else { index };
    let start = normalize(start).max(1);
    let end = normalize(end).min(len + 1);
    if start >= end {
        return Ok(Value::Str(String::new()));
    }
    let slice: String = chars[(start - 1) as usize..(end - 1) as usize].iter().collect();
    Ok(Value::Str(slice))
}

/// `REPLACE(hay, needle, repl)`: replaces every occurrence. An empty needle
/// leaves the haystack unchanged.
pub(super) fn op_replace(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let (hay, needle, repl) = args.get_three("REPLACE", loc)?;
    let hay = expect_str(&hay, "REPLACE", loc)?;
    let needle = expect_str(&needle, "REPLACE", loc)?;
    let repl = expect_str(&repl, "REPLACE", loc)?;
    if needle.is_empty() {
        return Ok(Value::Str(hay.to_owned()));
    }
    Ok(Value::Str(hay.replace(needle, repl)))
}

/// `STRIP(s, chars)`: trims any leading and trailing characters present in
/// the set.
pub(super) fn op_strip(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let (s, set) = args.get_two("STRIP", loc)?;
    let s = expect_str(&s, "STRIP", loc)?;
    let set = expect_str(&set, "STRIP", loc)?;
    Ok(Value::Str(s.trim_matches(|c: char| set.contains(c)).to_owned()))
}

/// `JOIN(sep, ...)`: joins string arguments with the separator.
pub(super) fn op_join(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let mut values = args.into_vec().into_iter();
    let sep = values.next().expect("arity checked: at least one argument");
    let sep = expect_str(&sep, "JOIN", loc)?;

    let mut out = String::new();
    for (i, value) in values.enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(expect_str(&value, "JOIN", loc)?);
    }
    Ok(Value::Str(out))
}
