//! Variable operators: `DEL`, `EXIST`, `COPY`.
//!
//! `DEL` and `EXIST` are the two operators that do not evaluate their
//! argument: they require a bare identifier AST node and act on the binding
//! itself.

use crate::{
    args::ArgValues,
    builtins::{Builtins, CallSite},
    environment::Environment,
    exceptions::{RunError, RunResult},
    expressions::{CodeLoc, Expr},
    value::Value,
};

pub(super) fn del_exist(op: Builtins, site: &CallSite<'_>) -> RunResult<Value> {
    let name: &'static str = op.into();
    let node = &site.nodes[0];
    let Expr::Ident(ident) = &node.expr else {
        return Err(RunError::type_error(
            format!("{name} requires a bare identifier"),
            node.position,
        ));
    };
    let result = if op == Builtins::Del {
        Environment::delete(site.env, ident)
    } else {
        Environment::exists(site.env, ident)
    };
    Ok(Value::truth(result))
}

/// `COPY`: a structurally independent copy of the argument. Tensors are
/// deep-copied; functions stay shared handles.
pub(super) fn op_copy(args: ArgValues, loc: CodeLoc) -> RunResult<Value> {
    let value = args.get_one("COPY", loc)?;
    Ok(value.copy_for_binding())
}
