//! The extension host: native modules register operators, periodic hooks,
//! and event handlers through a versioned registration context.
//!
//! Extension-registered operators are looked up after builtins and before
//! user-defined functions. They receive the same calling convention as
//! builtins (evaluated arguments, the raw argument AST nodes, the caller's
//! environment, and the call-site location) and may fail either by
//! returning an error or by writing the interpreter's error slot and
//! returning null.

use std::{fmt, rc::Rc};

use crate::{
    args::ArgValues,
    environment::EnvRef,
    exceptions::RunResult,
    expressions::{CodeLoc, ExprLoc},
    interp::Interp,
    value::Value,
};

/// The registration ABI version this interpreter speaks. The loader refuses
/// extensions built against any other version.
pub const API_VERSION: u32 = 1;

/// The calling convention for extension operators.
pub struct OpCall<'a> {
    /// Arguments, evaluated left-to-right.
    pub args: ArgValues,
    /// The unevaluated argument AST nodes, in the same order.
    pub arg_nodes: &'a [ExprLoc],
    /// The environment in effect at the call site.
    pub env: EnvRef,
    /// Source location of the call.
    pub location: CodeLoc,
}

/// An operator callback. Borrowed views inside [`OpCall`] must not be
/// retained beyond the call.
pub type OperatorFn = Rc<dyn Fn(&mut Interp, OpCall<'_>) -> RunResult<Value>>;

/// A periodic or event hook callback.
pub type HookFn = Rc<dyn Fn(&mut Interp, &HookEvent)>;

/// An alternate REPL driver installed by an extension.
pub type ReplFn = Rc<dyn Fn(&mut Interp)>;

/// The event handed to periodic and event hooks.
#[derive(Debug, Clone, Copy)]
pub struct HookEvent<'a> {
    /// Event name: `"tick"` for periodic hooks, otherwise the fired event's
    /// name (e.g. `"program_start"`).
    pub name: &'a str,
    /// Statements executed so far.
    pub instructions: u64,
}

/// A native module that plugs into the interpreter.
pub trait Extension {
    /// The extension's name, used to qualify module-local operators.
    fn name(&self) -> &str;

    /// The ABI version the extension was built against.
    fn api_version(&self) -> u32 {
        API_VERSION
    }

    /// Called once at load time to register the extension's operators and
    /// hooks.
    fn register(&self, ctx: &mut RegistrationContext<'_>);
}

/// Raised when an extension cannot be loaded (currently: ABI version
/// mismatch).
#[derive(Debug, Clone)]
pub struct ExtensionError {
    pub message: String,
}

impl fmt::Display for ExtensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "extension error: {}", self.message)
    }
}

impl std::error::Error for ExtensionError {}

/// An operator installed by an extension.
pub(crate) struct RegisteredOperator {
    /// Which extension registered it (for diagnostics).
    pub extension: String,
    pub callback: OperatorFn,
}

impl fmt::Debug for RegisteredOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredOperator")
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

/// A periodic hook: fires every `every` executed statements.
pub(crate) struct PeriodicHook {
    pub extension: String,
    pub every: u64,
    pub callback: HookFn,
}

impl fmt::Debug for PeriodicHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicHook")
            .field("extension", &self.extension)
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

/// The registration context passed to an extension's entry point.
///
/// The context pledges ABI stability within one [`API_VERSION`].
pub struct RegistrationContext<'a> {
    pub(crate) interp: &'a mut Interp,
    pub(crate) extension: String,
}

impl RegistrationContext<'_> {
    /// The host's registration ABI version.
    #[must_use]
    pub fn api_version(&self) -> u32 {
        API_VERSION
    }

    /// The name the extension was loaded under.
    #[must_use]
    pub fn extension_name(&self) -> &str {
        &self.extension
    }

    /// Binds `name` to `callback` in the operator table.
    ///
    /// With `as_module`, the operator is module-local: it is installed as
    /// `"<extension>.<name>"`. Re-registering a name replaces the previous
    /// operator.
    pub fn register_operator(&mut self, name: &str, callback: OperatorFn, as_module: bool) {
        let key = if as_module {
            format!("{}.{name}", self.extension)
        } else {
            name.to_owned()
        };
        self.interp.operators.insert(
            key,
            RegisteredOperator {
                extension: self.extension.clone(),
                callback,
            },
        );
    }

    /// Requests that `callback` run every `every` executed statements.
    /// A zero interval is ignored.
    pub fn register_periodic_hook(&mut self, every: u64, callback: HookFn) {
        if every == 0 {
            return;
        }
        self.interp.periodic_hooks.push(PeriodicHook {
            extension: self.extension.clone(),
            every,
            callback,
        });
    }

    /// Invokes `callback` whenever the named runtime event fires
    /// (e.g. `"program_start"`).
    pub fn register_event_handler(&mut self, event: &str, callback: HookFn) {
        self.interp
            .event_handlers
            .entry(event.to_owned())
            .or_default()
            .push(callback);
    }

    /// Installs an alternate REPL driver. The last registration wins.
    pub fn register_repl_handler(&mut self, callback: ReplFn) {
        self.interp.repl_handler = Some(callback);
    }
}
