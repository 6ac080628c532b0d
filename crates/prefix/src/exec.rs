//! The statement evaluator.
//!
//! Statement execution threads a [`Flow`] value up the call stack; runtime
//! errors travel in the `Err` arm of [`RunResult`] so `?` gives the
//! propagation rules for free. Loops consume `Break`/`Continue`, `TRY`
//! consumes errors, blocks resolve `Goto`, and function calls consume
//! `Return`.

use std::rc::Rc;

use ahash::AHashMap;

use crate::{
    builtins::Builtins,
    environment::{EnvRef, Environment},
    exceptions::{RunError, RunResult},
    expressions::{CodeLoc, DeclType, Expr, ExprLoc, FunctionDef, Node, NodeLoc},
    function::Function,
    interp::Interp,
    value::Value,
};

/// Non-error control-flow outcome of a statement.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
    /// Exit this many enclosing loops; loops decrement as it passes.
    Break(u32),
    Continue,
    /// In flight toward the nearest enclosing block that defines the label.
    /// The location is the `GOTO` call site, for the unresolved-label error.
    Goto(LabelKey, CodeLoc),
}

/// A label value: `GOTO`/`GOTOPOINT` targets are ints or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum LabelKey {
    Int(i64),
    Str(String),
}

impl LabelKey {
    /// Label key of an evaluated `GOTO` target.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(Self::Int(*v)),
            Value::Str(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Label key of a `GOTOPOINT` literal, for the pre-pass.
    fn from_literal(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Int(v) => Some(Self::Int(*v)),
            Expr::Str(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for LabelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", Value::Int(*v)),
            Self::Str(s) => write!(f, "'{s}'"),
        }
    }
}

impl Interp {
    /// Executes a program body, consuming the flows that may legally reach
    /// the top: a `Return` ends the program, an unresolved `Goto` is a
    /// control error.
    pub(crate) fn exec_toplevel(&mut self, program: &[NodeLoc], env: &EnvRef) -> RunResult<()> {
        match self.exec_block(program, env)? {
            Flow::Normal | Flow::Return(_) => Ok(()),
            Flow::Goto(key, location) => Err(RunError::control(format!("label {key} not found"), location)),
            Flow::Break(_) | Flow::Continue => {
                unreachable!("break and continue are validated against loop depth at their statement")
            }
        }
    }

    /// Executes one block.
    ///
    /// A pre-pass registers every `GOTOPOINT` target into a block-local
    /// label map. A `Goto` whose key is in the map jumps to that statement
    /// index; any other `Goto` propagates so an enclosing block can resolve
    /// it.
    pub(crate) fn exec_block(&mut self, stmts: &[NodeLoc], env: &EnvRef) -> RunResult<Flow> {
        let mut labels: Option<AHashMap<LabelKey, usize>> = None;
        for (index, stmt) in stmts.iter().enumerate() {
            if let Node::GotoPoint(target) = &stmt.node {
                let Some(key) = LabelKey::from_literal(&target.expr) else {
                    return Err(RunError::control(
                        "GOTOPOINT target must be an int or str literal",
                        target.position,
                    ));
                };
                labels.get_or_insert_with(AHashMap::new).insert(key, index);
            }
        }

        let mut index = 0;
        while index < stmts.len() {
            match self.exec_node(&stmts[index], env)? {
                Flow::Normal => index += 1,
                Flow::Goto(key, location) => match labels.as_ref().and_then(|map| map.get(&key)) {
                    Some(&target) => index = target,
                    None => return Ok(Flow::Goto(key, location)),
                },
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_node(&mut self, stmt: &NodeLoc, env: &EnvRef) -> RunResult<Flow> {
        self.set_location(stmt.position);
        self.tick();
        match &stmt.node {
            Node::Block(stmts) => self.exec_block(stmts, env),
            Node::Expr(expr) => {
                self.eval_expr(expr, env)?;
                Ok(Flow::Normal)
            }
            Node::Declare { name, decl } => {
                check_declarable(*decl, name, stmt.position)?;
                Environment::define(env, name, *decl);
                Ok(Flow::Normal)
            }
            Node::Assign { name, decl, value } => {
                let evaluated = self.eval_expr(value, env)?;
                match decl {
                    Some(decl) => {
                        check_declarable(*decl, name, stmt.position)?;
                        Environment::assign(env, name, &evaluated, *decl, true)
                    }
                    None => Environment::assign(env, name, &evaluated, DeclType::Unknown, false),
                }
                .map_err(|err| RunError::from_env(err, stmt.position))?;
                Ok(Flow::Normal)
            }
            Node::If {
                test,
                body,
                elifs,
                or_else,
            } => {
                if self.eval_expr(test, env)?.is_truthy() {
                    return self.exec_block(body, env);
                }
                for arm in elifs {
                    if self.eval_expr(&arm.test, env)?.is_truthy() {
                        return self.exec_block(&arm.body, env);
                    }
                }
                match or_else {
                    Some(body) => self.exec_block(body, env),
                    None => Ok(Flow::Normal),
                }
            }
            Node::While { test, body } => self.exec_while(test, body, env),
            Node::For { counter, limit, body } => self.exec_for(counter, limit, body, env),
            Node::FunctionDef(def) => self.exec_function_def(def, env, stmt.position),
            Node::Return(expr) => Ok(Flow::Return(self.eval_expr(expr, env)?)),
            Node::Break(count) => {
                let evaluated = self.eval_expr(count, env)?;
                let Value::Int(n) = evaluated else {
                    return Err(RunError::type_error(
                        format!("BREAK requires an int count, found {}", evaluated.type_name()),
                        count.position,
                    ));
                };
                if n < 1 {
                    return Err(RunError::control("break count must be positive", stmt.position));
                }
                if n as u64 > u64::from(self.loop_depth) {
                    return Err(RunError::control(
                        format!("break depth {n} exceeds loop nesting {}", self.loop_depth),
                        stmt.position,
                    ));
                }
                Ok(Flow::Break(n as u32))
            }
            Node::Continue => {
                if self.loop_depth == 0 {
                    return Err(RunError::control("continue outside of a loop", stmt.position));
                }
                Ok(Flow::Continue)
            }
            Node::Try {
                body,
                catch_name,
                handler,
            } => self.exec_try(body, catch_name.as_deref(), handler, env),
            Node::Goto(target) => {
                let evaluated = self.eval_expr(target, env)?;
                let Some(key) = LabelKey::from_value(&evaluated) else {
                    return Err(RunError::control(
                        format!("GOTO target must be an int or str, found {}", evaluated.type_name()),
                        target.position,
                    ));
                };
                Ok(Flow::Goto(key, stmt.position))
            }
            // targets are registered by the block pre-pass; reaching one is a no-op
            Node::GotoPoint(_) => Ok(Flow::Normal),
        }
    }

    fn exec_while(&mut self, test: &ExprLoc, body: &[NodeLoc], env: &EnvRef) -> RunResult<Flow> {
        loop {
            if !self.eval_expr(test, env)?.is_truthy() {
                return Ok(Flow::Normal);
            }
            self.loop_depth += 1;
            let flow = self.exec_block(body, env);
            self.loop_depth -= 1;
            match flow? {
                Flow::Normal | Flow::Continue => {}
                Flow::Break(1) => return Ok(Flow::Normal),
                Flow::Break(n) => return Ok(Flow::Break(n - 1)),
                other => return Ok(other),
            }
        }
    }

    /// `FOR`: the limit is evaluated once, the counter binds 0..limit-1 in
    /// the current scope, and whatever the counter name was bound to before
    /// is restored on every exit path.
    fn exec_for(&mut self, counter: &str, limit: &ExprLoc, body: &[NodeLoc], env: &EnvRef) -> RunResult<Flow> {
        let evaluated = self.eval_expr(limit, env)?;
        let Value::Int(limit_n) = evaluated else {
            return Err(RunError::type_error(
                format!("FOR limit must be an int, found {}", evaluated.type_name()),
                limit.position,
            ));
        };

        let saved = Environment::take_binding(env, counter);
        let mut result = Ok(Flow::Normal);
        for i in 0..limit_n.max(0) {
            Environment::bind_local(env, counter, DeclType::Int, Value::Int(i));
            self.loop_depth += 1;
            let flow = self.exec_block(body, env);
            self.loop_depth -= 1;
            match flow {
                Err(error) => {
                    result = Err(error);
                    break;
                }
                Ok(Flow::Normal | Flow::Continue) => {}
                Ok(Flow::Break(1)) => break,
                Ok(Flow::Break(n)) => {
                    result = Ok(Flow::Break(n - 1));
                    break;
                }
                Ok(other) => {
                    result = Ok(other);
                    break;
                }
            }
        }
        Environment::restore_binding(env, counter, saved);
        result
    }

    /// Installs a function definition: a record in the registry plus a
    /// `func`-typed binding of the same name in the current scope. The
    /// function captures the environment in effect right here.
    fn exec_function_def(&mut self, def: &FunctionDef, env: &EnvRef, position: CodeLoc) -> RunResult<Flow> {
        if Builtins::lookup(&def.name).is_some() {
            return Err(RunError::new(
                crate::exceptions::ErrorKind::Name,
                format!("cannot define function over builtin operator '{}'", def.name),
                position,
            ));
        }
        check_declarable(def.ret, &def.name, position)?;
        for param in &def.params {
            check_declarable(param.decl, &param.name, position)?;
        }

        let function = Rc::new(Function::new(
            Some(def.name.clone()),
            def.ret,
            def.params.clone(),
            def.body.clone(),
            Rc::clone(env),
        ));
        self.functions.insert(def.name.clone(), Rc::clone(&function));
        Environment::assign(env, &def.name, &Value::Func(function), DeclType::Func, true)
            .map_err(|err| RunError::from_env(err, position))?;
        Ok(Flow::Normal)
    }

    /// `TRY`/`CATCH`: the only recovery site. The handler runs with the
    /// error message bound (when a name is given) as a `str` in the current
    /// scope, and trace frames from the abandoned call chain are discarded.
    fn exec_try(
        &mut self,
        body: &[NodeLoc],
        catch_name: Option<&str>,
        handler: &[NodeLoc],
        env: &EnvRef,
    ) -> RunResult<Flow> {
        let frame_depth = self.frames.len();
        self.try_depth += 1;
        let result = self.exec_block(body, env);
        self.try_depth -= 1;
        match result {
            Ok(flow) => Ok(flow),
            Err(error) => {
                self.frames.truncate(frame_depth);
                if let Some(name) = catch_name {
                    Environment::bind_local(env, name, DeclType::Str, Value::Str(error.message));
                }
                self.exec_block(handler, env)
            }
        }
    }
}

/// Declarations must carry a concrete type tag.
fn check_declarable(decl: DeclType, name: &str, position: CodeLoc) -> RunResult<()> {
    if decl == DeclType::Unknown {
        return Err(RunError::type_error(
            format!("'{name}' cannot be declared with an unknown type"),
            position,
        ));
    }
    Ok(())
}
