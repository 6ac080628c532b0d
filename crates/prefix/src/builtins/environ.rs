//! Environment operators: `MAIN`, `OS`, `EXIT`, `IMPORT`.

use crate::{
    args::{ArgValues, expect_int, expect_str},
    exceptions::{RunError, RunResult},
    expressions::CodeLoc,
    interp::Interp,
    value::Value,
};

/// `MAIN`: 1 when running as the primary module, 0 inside an import.
pub(super) fn op_main(interp: &Interp) -> RunResult<Value> {
    Ok(Value::truth(interp.is_main))
}

/// `OS`: the host platform name.
pub(super) fn op_os() -> Value {
    Value::Str(std::env::consts::OS.to_owned())
}

/// `EXIT(code)`: terminates the whole process immediately.
pub(super) fn op_exit(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("EXIT", loc)?;
    let code = expect_int(&value, "EXIT", loc)?;
    std::process::exit(code as i32)
}

/// `IMPORT(path)`: resolves the path through the host's module loader and
/// executes the loaded program in the global environment with `MAIN`
/// reporting 0.
pub(super) fn op_import(interp: &mut Interp, args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("IMPORT", loc)?;
    let path = expect_str(&value, "IMPORT", loc)?.to_owned();

    let Some(loader) = interp.module_loader.clone() else {
        return Err(RunError::extension("no module loader installed", loc));
    };
    let Some(program) = loader(&path) else {
        return Err(RunError::extension(format!("module '{path}' not found"), loc));
    };
    interp.exec_module(&program, &path)?;
    Ok(Value::Int(1))
}
