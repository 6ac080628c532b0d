//! Lexically scoped environments: name -> typed binding, chained to a
//! parent scope.
//!
//! Scopes are shared via `Rc<RefCell<..>>` so that function values can hold
//! their defining environment alive after the defining call returns. Lookup
//! walks the parent chain; writes follow the scope's [`WritePolicy`].

use std::{cell::RefCell, rc::Rc};

use ahash::AHashMap;

use crate::{expressions::DeclType, value::Value};

/// Shared handle to a scope.
pub type EnvRef = Rc<RefCell<Environment>>;

/// Where declarations and typed first-assignments land.
///
/// `ScopeLocal` is the behavior of ordinary statements: a declaration
/// creates the binding in the current scope. `RedirectToRoot` sends
/// declarations to the outermost ancestor instead; hosts that fan work out
/// to short-lived child scopes use `ScopeLocal` on the children to keep
/// writes isolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    #[default]
    ScopeLocal,
    RedirectToRoot,
}

/// A declared variable: its static type tag and its cell.
///
/// The cell is `None` until the first assignment; reading an uninitialized
/// binding is an error. Once initialized, the held value's runtime tag
/// always equals `decl`.
#[derive(Debug, Clone)]
pub struct Binding {
    pub decl: DeclType,
    pub cell: Option<Value>,
}

/// Errors surfaced by environment operations.
///
/// These carry no source location; the evaluator attaches the location of
/// the statement or expression that triggered the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// The name is not bound in this scope or any ancestor.
    NotFound(String),
    /// The binding exists but has never been assigned.
    Uninitialized(String),
    /// The value's runtime tag does not match the declared type.
    TypeMismatch {
        name: String,
        expected: DeclType,
        found: &'static str,
    },
}

/// One lexical scope.
#[derive(Debug)]
pub struct Environment {
    bindings: AHashMap<String, Binding>,
    parent: Option<EnvRef>,
    policy: WritePolicy,
}

impl Environment {
    /// Creates a root scope with the given write policy.
    #[must_use]
    pub fn new_root(policy: WritePolicy) -> EnvRef {
        Rc::new(RefCell::new(Self {
            bindings: AHashMap::new(),
            parent: None,
            policy,
        }))
    }

    /// Creates a child scope. The child inherits the parent's write policy.
    #[must_use]
    pub fn child_of(parent: &EnvRef) -> EnvRef {
        let policy = parent.borrow().policy;
        Rc::new(RefCell::new(Self {
            bindings: AHashMap::new(),
            parent: Some(Rc::clone(parent)),
            policy,
        }))
    }

    /// The scope that declarations made through `env` should land in,
    /// honoring the write policy.
    fn write_target(env: &EnvRef) -> EnvRef {
        match env.borrow().policy {
            WritePolicy::ScopeLocal => Rc::clone(env),
            WritePolicy::RedirectToRoot => Self::root_of(env),
        }
    }

    /// The outermost ancestor of `env` (the global scope).
    #[must_use]
    pub fn root_of(env: &EnvRef) -> EnvRef {
        let mut current = Rc::clone(env);
        loop {
            let parent = current.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return current,
            }
        }
    }

    /// Declares `name` without initializing it. Redeclaration in the same
    /// scope resets the binding.
    pub fn define(env: &EnvRef, name: &str, decl: DeclType) {
        let target = Self::write_target(env);
        let mut scope = target.borrow_mut();
        scope.bindings.insert(name.to_owned(), Binding { decl, cell: None });
    }

    /// Assigns `value` to `name`.
    ///
    /// With `is_declaration`, a fresh binding of type `hint` is created in
    /// the write-target scope after checking the value's tag. Otherwise the
    /// nearest enclosing binding is updated, checking the value's tag
    /// against its declared type.
    ///
    /// Strings and tensors are deep-copied into the binding.
    pub fn assign(
        env: &EnvRef,
        name: &str,
        value: &Value,
        hint: DeclType,
        is_declaration: bool,
    ) -> Result<(), EnvError> {
        if is_declaration {
            if !value.matches_decl(hint) {
                return Err(EnvError::TypeMismatch {
                    name: name.to_owned(),
                    expected: hint,
                    found: value.type_name(),
                });
            }
            let target = Self::write_target(env);
            let mut scope = target.borrow_mut();
            scope.bindings.insert(
                name.to_owned(),
                Binding {
                    decl: hint,
                    cell: Some(value.copy_for_binding()),
                },
            );
            return Ok(());
        }

        let Some(holder) = Self::scope_of(env, name) else {
            return Err(EnvError::NotFound(name.to_owned()));
        };
        let mut scope = holder.borrow_mut();
        let binding = scope.bindings.get_mut(name).expect("scope_of returned holder");
        if !value.matches_decl(binding.decl) {
            return Err(EnvError::TypeMismatch {
                name: name.to_owned(),
                expected: binding.decl,
                found: value.type_name(),
            });
        }
        binding.cell = Some(value.copy_for_binding());
        Ok(())
    }

    /// Reads the nearest enclosing binding of `name`.
    pub fn get(env: &EnvRef, name: &str) -> Result<Value, EnvError> {
        let Some(holder) = Self::scope_of(env, name) else {
            return Err(EnvError::NotFound(name.to_owned()));
        };
        let scope = holder.borrow();
        let binding = &scope.bindings[name];
        binding
            .cell
            .clone()
            .ok_or_else(|| EnvError::Uninitialized(name.to_owned()))
    }

    /// Removes the nearest enclosing binding of `name`. Returns whether a
    /// binding was removed.
    pub fn delete(env: &EnvRef, name: &str) -> bool {
        match Self::scope_of(env, name) {
            Some(holder) => holder.borrow_mut().bindings.remove(name).is_some(),
            None => false,
        }
    }

    /// Whether `name` is bound in this scope or any ancestor.
    #[must_use]
    pub fn exists(env: &EnvRef, name: &str) -> bool {
        Self::scope_of(env, name).is_some()
    }

    /// Takes the current scope's own binding of `name`, if any. Used with
    /// [`Environment::restore_binding`] to save and restore a `FOR` counter.
    pub(crate) fn take_binding(env: &EnvRef, name: &str) -> Option<Binding> {
        env.borrow_mut().bindings.remove(name)
    }

    /// Restores (or clears) a binding previously taken from this scope.
    pub(crate) fn restore_binding(env: &EnvRef, name: &str, saved: Option<Binding>) {
        let mut scope = env.borrow_mut();
        match saved {
            Some(binding) => {
                scope.bindings.insert(name.to_owned(), binding);
            }
            None => {
                scope.bindings.remove(name);
            }
        }
    }

    /// Writes a binding directly into the current scope, bypassing the write
    /// policy. The evaluator uses this for parameter and counter bindings,
    /// which always belong to the scope that owns them.
    pub(crate) fn bind_local(env: &EnvRef, name: &str, decl: DeclType, value: Value) {
        env.borrow_mut().bindings.insert(
            name.to_owned(),
            Binding {
                decl,
                cell: Some(value),
            },
        );
    }

    /// The scope (self or ancestor) holding the nearest binding of `name`.
    fn scope_of(env: &EnvRef, name: &str) -> Option<EnvRef> {
        let mut current = Rc::clone(env);
        loop {
            if current.borrow().bindings.contains_key(name) {
                return Some(current);
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn define_then_read_is_uninitialized() {
        let env = Environment::new_root(WritePolicy::default());
        Environment::define(&env, "x", DeclType::Int);
        assert_eq!(
            Environment::get(&env, "x").unwrap_err(),
            EnvError::Uninitialized("x".to_owned())
        );
    }

    #[test]
    fn assignment_checks_declared_type() {
        let env = Environment::new_root(WritePolicy::default());
        Environment::assign(&env, "x", &Value::Int(1), DeclType::Int, true).unwrap();
        let err = Environment::assign(&env, "x", &Value::Str("no".into()), DeclType::Unknown, false);
        assert_eq!(
            err,
            Err(EnvError::TypeMismatch {
                name: "x".to_owned(),
                expected: DeclType::Int,
                found: "str",
            })
        );
    }

    #[test]
    fn null_is_not_assignable() {
        let env = Environment::new_root(WritePolicy::default());
        assert!(Environment::assign(&env, "x", &Value::Null, DeclType::Int, true).is_err());
    }

    #[test]
    fn assignment_walks_to_enclosing_binding() {
        let root = Environment::new_root(WritePolicy::default());
        Environment::assign(&root, "x", &Value::Int(1), DeclType::Int, true).unwrap();
        let child = Environment::child_of(&root);
        Environment::assign(&child, "x", &Value::Int(2), DeclType::Unknown, false).unwrap();
        assert!(Environment::get(&root, "x").unwrap().eq_value(&Value::Int(2)));
    }

    #[test]
    fn redirect_policy_declares_in_root() {
        let root = Environment::new_root(WritePolicy::RedirectToRoot);
        let child = Environment::child_of(&root);
        Environment::assign(&child, "x", &Value::Int(5), DeclType::Int, true).unwrap();
        assert!(Environment::get(&root, "x").unwrap().eq_value(&Value::Int(5)));
    }

    #[test]
    fn delete_removes_nearest() {
        let root = Environment::new_root(WritePolicy::default());
        Environment::assign(&root, "x", &Value::Int(1), DeclType::Int, true).unwrap();
        let child = Environment::child_of(&root);
        Environment::assign(&child, "x", &Value::Int(2), DeclType::Int, true).unwrap();
        assert!(Environment::delete(&child, "x"));
        assert!(Environment::get(&child, "x").unwrap().eq_value(&Value::Int(1)));
    }
}
