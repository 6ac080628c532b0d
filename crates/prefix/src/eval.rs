//! The expression evaluator and call dispatch.
//!
//! Calls on an identifier resolve in precedence order: builtin operator,
//! then extension-registered operator, then user-defined function, then the
//! identifier's value in the environment (which must be a function value).

use std::rc::Rc;

use crate::{
    args::ArgValues,
    builtins::{Builtins, CallSite},
    environment::{EnvError, EnvRef, Environment},
    exceptions::{RunError, RunResult},
    exec::Flow,
    expressions::{CodeLoc, Expr, ExprLoc},
    extension::OpCall,
    function::Function,
    interp::Interp,
    value::Value,
};

impl Interp {
    pub(crate) fn eval_expr(&mut self, expr: &ExprLoc, env: &EnvRef) -> RunResult<Value> {
        match &expr.expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Flt(v) => Ok(Value::Flt(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Ident(name) => self.resolve_ident(name, env, expr.position),
            Expr::Call { callee, args } => self.eval_call(callee, args, env, expr.position),
        }
    }

    /// Identifier resolution: the environment first, then the function
    /// registry.
    fn resolve_ident(&self, name: &str, env: &EnvRef, location: CodeLoc) -> RunResult<Value> {
        match Environment::get(env, name) {
            Ok(value) => Ok(value),
            Err(EnvError::NotFound(_)) => match self.functions.get(name) {
                Some(function) => Ok(Value::Func(Rc::clone(function))),
                None => Err(RunError::name_error(name, location)),
            },
            Err(other) => Err(RunError::from_env(other, location)),
        }
    }

    fn eval_call(
        &mut self,
        callee: &ExprLoc,
        arg_exprs: &[ExprLoc],
        env: &EnvRef,
        location: CodeLoc,
    ) -> RunResult<Value> {
        if let Expr::Ident(name) = &callee.expr {
            if let Some(builtin) = Builtins::lookup(name) {
                return self.call_builtin(builtin, arg_exprs, env, location);
            }
            if let Some(operator) = self.operators.get(name) {
                let callback = Rc::clone(&operator.callback);
                let args = ArgValues::from_vec(self.eval_arg_values(arg_exprs, env)?);
                let call = OpCall {
                    args,
                    arg_nodes: arg_exprs,
                    env: Rc::clone(env),
                    location,
                };
                let result = callback(self, call);
                // the C-style protocol: an operator may have deposited its
                // failure in the error slot and returned null
                if let Some(error) = self.take_error() {
                    return Err(error);
                }
                return result;
            }
            if let Some(function) = self.functions.get(name) {
                let function = Rc::clone(function);
                let args = self.eval_arg_values(arg_exprs, env)?;
                return self.call_function(&function, args, location);
            }
        }

        let callee_value = self.eval_expr(callee, env)?;
        match callee_value {
            Value::Func(function) => {
                let args = self.eval_arg_values(arg_exprs, env)?;
                self.call_function(&function, args, location)
            }
            other => Err(RunError::type_error(
                format!("value of type {} is not callable", other.type_name()),
                callee.position,
            )),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: Builtins,
        arg_exprs: &[ExprLoc],
        env: &EnvRef,
        location: CodeLoc,
    ) -> RunResult<Value> {
        // DEL and EXIST receive their argument's AST node unevaluated
        let args = if builtin.takes_unevaluated_ident() {
            ArgValues::Empty
        } else {
            ArgValues::from_vec(self.eval_arg_values(arg_exprs, env)?)
        };
        builtin.check_arity(arg_exprs.len(), location)?;
        let site = CallSite {
            nodes: arg_exprs,
            env,
            location,
        };
        builtin.call(self, args, &site)
    }

    /// Evaluates argument expressions strictly left-to-right.
    fn eval_arg_values(&mut self, exprs: &[ExprLoc], env: &EnvRef) -> RunResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval_expr(e, env)).collect()
    }

    /// Calls a user-defined function (or any function value).
    ///
    /// The child environment is parented by the function's captured
    /// environment, not the caller's. Arguments and defaults are bound and
    /// tag-checked in order; defaults evaluate inside the child environment
    /// so later defaults may reference earlier parameters.
    pub(crate) fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
        location: CodeLoc,
    ) -> RunResult<Value> {
        let name = function.display_name().to_owned();
        let required = function.required_params();
        if args.len() < required || args.len() > function.params.len() {
            return Err(RunError::arity_error(
                &name,
                required,
                Some(function.params.len()),
                args.len(),
                location,
            ));
        }

        let child = Environment::child_of(&function.env);
        let mut supplied = args.into_iter();
        for param in &function.params {
            let value = match supplied.next() {
                Some(value) => value,
                None => {
                    let default = param.default.as_ref().expect("arity checked: tail params have defaults");
                    self.eval_expr(default, &child)?
                }
            };
            if !value.matches_decl(param.decl) {
                return Err(RunError::type_error(
                    format!(
                        "parameter '{}' of {name} expects {}, found {}",
                        param.name,
                        param.decl,
                        value.type_name()
                    ),
                    location,
                ));
            }
            Environment::bind_local(&child, &param.name, param.decl, value.copy_for_binding());
        }

        self.frames.push(crate::exceptions::StackFrame {
            function: name.clone(),
            source_path: self.source_path.clone(),
            location,
        });
        // break/continue never cross a function boundary
        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        let flow = self.exec_block(&function.body, &child);
        self.loop_depth = saved_loop_depth;

        let result = match flow {
            Err(error) => Err(error),
            Ok(Flow::Return(value)) => {
                if value.matches_decl(function.ret) {
                    Ok(value)
                } else {
                    Err(RunError::type_error(
                        format!(
                            "{name} must return {}, found {}",
                            function.ret,
                            value.type_name()
                        ),
                        location,
                    ))
                }
            }
            Ok(Flow::Normal) => Value::zero_of(function.ret).ok_or_else(|| {
                RunError::type_error(
                    format!("{name} ended without returning a {}", function.ret),
                    location,
                )
            }),
            Ok(Flow::Goto(key, goto_location)) => Err(RunError::control(
                format!("label {key} not found"),
                goto_location,
            )),
            Ok(Flow::Break(_) | Flow::Continue) => {
                unreachable!("break and continue are validated against loop depth at their statement")
            }
        };
        // on error the frame stays behind for the traceback; TRY discards it
        if result.is_ok() {
            self.frames.pop();
        }
        result
    }
}
