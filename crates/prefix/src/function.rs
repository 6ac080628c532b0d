//! User-defined function records.

use crate::{
    environment::EnvRef,
    expressions::{DeclType, NodeLoc, Param},
};

/// A user-defined function: signature, body, and the environment captured at
/// definition time.
///
/// The captured environment is shared with the defining scope (it is the
/// scope, not a copy), which is what makes closures work: mutations made
/// through one closure are visible to every other closure over the same
/// scope. The `Rc` chain from function to environment keeps the scope alive
/// for as long as any function value references it; environments never own
/// functions directly, so the reference graph stays acyclic.
#[derive(Debug)]
pub struct Function {
    /// Definition name; `None` for function values a host constructed
    /// without installing them anywhere.
    pub name: Option<String>,
    /// Declared return type, checked against the returned value's tag.
    pub ret: DeclType,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// The body block.
    pub body: Vec<NodeLoc>,
    /// The environment in effect when the definition executed.
    pub env: EnvRef,
}

impl Function {
    #[must_use]
    pub fn new(name: Option<String>, ret: DeclType, params: Vec<Param>, body: Vec<NodeLoc>, env: EnvRef) -> Self {
        Self {
            name,
            ret,
            params,
            body,
            env,
        }
    }

    /// Name used in displays and trace frames.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Number of leading arguments the caller must supply: everything up to
    /// and including the last parameter without a default.
    #[must_use]
    pub fn required_params(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| p.default.is_none())
            .map_or(0, |i| i + 1)
    }
}
