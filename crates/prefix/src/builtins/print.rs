//! The `PRINT` and `INPUT` operators, routed through the host I/O traits.

use crate::{
    args::ArgValues,
    exceptions::RunResult,
    expressions::CodeLoc,
    interp::Interp,
    value::Value,
};

/// `PRINT`: each argument in its displayed form, space-separated, then a
/// newline.
pub(super) fn op_print(interp: &mut Interp, args: ArgValues) -> RunResult<Value> {
    for (i, value) in args.into_vec().into_iter().enumerate() {
        if i > 0 {
            interp.print.push_char(' ');
        }
        interp.print.write_text(&value.to_string());
    }
    interp.print.push_char('\n');
    Ok(Value::Null)
}

/// `INPUT`: optionally prints a prompt (no newline), then reads one line and
/// trims a single trailing newline. End of input yields the empty string.
pub(super) fn op_input(interp: &mut Interp, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    if let Some(prompt) = args.get_zero_one("INPUT", loc)? {
        interp.print.write_text(&prompt.to_string());
    }
    let mut line = interp.input.read_line().unwrap_or_default();
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::Str(line))
}
