//! Interpreter state and the host-facing entry points.

use std::rc::Rc;

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::{
    environment::{EnvRef, Environment, WritePolicy},
    exceptions::{Exception, RunError, RunResult, StackFrame},
    expressions::{CodeLoc, NodeLoc},
    extension::{Extension, ExtensionError, HookEvent, HookFn, PeriodicHook, RegisteredOperator, RegistrationContext, ReplFn, API_VERSION},
    function::Function,
    io::{InputReader, PrintWriter, StdInput, StdPrint},
};

/// Host hook that resolves an `IMPORT` path to a parsed program.
///
/// The parser is an external collaborator, so module loading is delegated to
/// whoever owns one. Returning `None` reports the module as not found.
pub type ModuleLoaderFn = Rc<dyn Fn(&str) -> Option<Vec<NodeLoc>>>;

/// Configuration handed to [`Interp::new`] by the front end.
#[derive(Debug, Clone)]
pub struct InterpOptions {
    /// Source path used in trace frames.
    pub source_path: String,
    /// Verbose/private-mode flag from the CLI; gates load-time diagnostics.
    pub verbose: bool,
    /// Whether this interpreter runs the primary module (`MAIN` reports it).
    pub is_main: bool,
    /// Where declarations land; see [`WritePolicy`].
    pub write_policy: WritePolicy,
}

impl Default for InterpOptions {
    fn default() -> Self {
        Self {
            source_path: "<input>".to_owned(),
            verbose: false,
            is_main: true,
            write_policy: WritePolicy::ScopeLocal,
        }
    }
}

/// The interpreter: global environment, function registry, extension
/// tables, and the diagnostic state threaded through execution.
pub struct Interp {
    pub(crate) globals: EnvRef,
    /// User-defined functions by name. Identifier resolution consults this
    /// after the environment.
    pub(crate) functions: AHashMap<String, Rc<Function>>,
    /// Extension-registered operators, in registration order.
    pub(crate) operators: IndexMap<String, RegisteredOperator>,
    pub(crate) periodic_hooks: Vec<PeriodicHook>,
    pub(crate) event_handlers: AHashMap<String, Vec<HookFn>>,
    pub(crate) repl_handler: Option<ReplFn>,
    pub(crate) module_loader: Option<ModuleLoaderFn>,
    /// The error slot of the C-style operator protocol: an operator may
    /// deposit an error here and return null instead of returning `Err`.
    pub(crate) error_slot: Option<RunError>,
    /// Number of loops enclosing the current evaluator point. Reset to zero
    /// across function boundaries.
    pub(crate) loop_depth: u32,
    /// Number of enclosing `TRY` blocks.
    pub(crate) try_depth: u32,
    /// The diagnostic stack: one frame per active call, updated with the
    /// last executed location.
    pub(crate) frames: Vec<StackFrame>,
    pub(crate) source_path: String,
    pub(crate) verbose: bool,
    pub(crate) is_main: bool,
    /// Statements executed so far; drives periodic hooks.
    pub(crate) instructions: u64,
    pub(crate) print: Box<dyn PrintWriter>,
    pub(crate) input: Box<dyn InputReader>,
}

impl std::fmt::Debug for Interp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interp")
            .field("source_path", &self.source_path)
            .field("functions", &self.functions.len())
            .field("operators", &self.operators.len())
            .field("instructions", &self.instructions)
            .finish_non_exhaustive()
    }
}

impl Interp {
    /// Creates an interpreter wired to stdout/stdin.
    #[must_use]
    pub fn new(options: InterpOptions) -> Self {
        Self::with_io(options, Box::new(StdPrint), Box::new(StdInput))
    }

    /// Creates an interpreter with custom `PRINT`/`INPUT` endpoints.
    #[must_use]
    pub fn with_io(options: InterpOptions, print: Box<dyn PrintWriter>, input: Box<dyn InputReader>) -> Self {
        Self {
            globals: Environment::new_root(options.write_policy),
            functions: AHashMap::new(),
            operators: IndexMap::new(),
            periodic_hooks: Vec::new(),
            event_handlers: AHashMap::new(),
            repl_handler: None,
            module_loader: None,
            error_slot: None,
            loop_depth: 0,
            try_depth: 0,
            frames: Vec::new(),
            source_path: options.source_path,
            verbose: options.verbose,
            is_main: options.is_main,
            instructions: 0,
            print,
            input,
        }
    }

    /// The global environment.
    #[must_use]
    pub fn globals(&self) -> EnvRef {
        Rc::clone(&self.globals)
    }

    /// The REPL driver installed by an extension, if any.
    #[must_use]
    pub fn repl_handler(&self) -> Option<ReplFn> {
        self.repl_handler.clone()
    }

    /// Number of `TRY` blocks enclosing the current evaluator point.
    ///
    /// Extension operators can consult this to know whether a raised error
    /// has any chance of being caught by the running program.
    #[must_use]
    pub fn try_depth(&self) -> u32 {
        self.try_depth
    }

    /// Installs the host's module loader used by `IMPORT`.
    pub fn set_module_loader(&mut self, loader: ModuleLoaderFn) {
        self.module_loader = Some(loader);
    }

    /// Loads an extension, refusing it on an ABI version mismatch.
    pub fn load_extension(&mut self, extension: &dyn Extension) -> Result<(), ExtensionError> {
        let version = extension.api_version();
        if version != API_VERSION {
            return Err(ExtensionError {
                message: format!(
                    "extension '{}' targets api version {version}, host speaks {API_VERSION}",
                    extension.name()
                ),
            });
        }
        let mut ctx = RegistrationContext {
            extension: extension.name().to_owned(),
            interp: self,
        };
        extension.register(&mut ctx);
        if self.verbose {
            let line = format!("loaded extension '{}' (api {version})\n", extension.name());
            self.print.write_text(&line);
        }
        Ok(())
    }

    /// Deposits an error into the error slot: the C-style failure protocol
    /// for operator callbacks. The evaluator drains the slot after every
    /// extension operator returns.
    pub fn set_error(&mut self, message: impl Into<String>, location: CodeLoc) {
        self.error_slot = Some(RunError::extension(message, location));
    }

    /// Takes the pending error out of the slot, if any.
    pub fn take_error(&mut self) -> Option<RunError> {
        self.error_slot.take()
    }

    /// Executes a top-level program in the global environment.
    ///
    /// On an uncaught error, the trace-frame stack is formatted into the
    /// returned [`Exception`]. The interpreter stays usable afterwards: the
    /// global environment, functions, and extensions survive across runs.
    pub fn exec_program(&mut self, program: &[NodeLoc]) -> Result<(), Exception> {
        self.frames.push(StackFrame {
            function: "<program>".to_owned(),
            source_path: self.source_path.clone(),
            location: program.first().map_or(CodeLoc::START, |s| s.position),
        });
        self.fire_event("program_start");

        let globals = self.globals();
        let result = self.exec_toplevel(program, &globals);

        self.fire_event("program_end");
        match result {
            Ok(()) => {
                self.frames.pop();
                Ok(())
            }
            Err(error) => {
                let frames = std::mem::take(&mut self.frames);
                self.loop_depth = 0;
                self.try_depth = 0;
                self.error_slot = None;
                Err(Exception::from_error(error, frames))
            }
        }
    }

    /// Fires a named runtime event to every registered handler.
    pub(crate) fn fire_event(&mut self, name: &str) {
        let Some(handlers) = self.event_handlers.get(name) else {
            return;
        };
        let handlers: Vec<HookFn> = handlers.iter().map(Rc::clone).collect();
        let event = HookEvent {
            name,
            instructions: self.instructions,
        };
        for handler in handlers {
            handler(self, &event);
        }
    }

    /// Counts one executed statement and fires any periodic hooks that are
    /// due.
    pub(crate) fn tick(&mut self) {
        self.instructions += 1;
        if self.periodic_hooks.is_empty() {
            return;
        }
        let due: Vec<HookFn> = self
            .periodic_hooks
            .iter()
            .filter(|hook| self.instructions % hook.every == 0)
            .map(|hook| Rc::clone(&hook.callback))
            .collect();
        if due.is_empty() {
            return;
        }
        let event = HookEvent {
            name: "tick",
            instructions: self.instructions,
        };
        for hook in due {
            hook(self, &event);
        }
    }

    /// Updates the current frame's last-executed location.
    pub(crate) fn set_location(&mut self, location: CodeLoc) {
        if let Some(frame) = self.frames.last_mut() {
            frame.location = location;
        }
    }

    /// Runs an imported module's program in the global environment with
    /// `MAIN` reporting 0 for its duration.
    ///
    /// On error the module's frame stays on the diagnostic stack so the
    /// traceback shows where inside the module execution stopped.
    pub(crate) fn exec_module(&mut self, program: &[NodeLoc], path: &str) -> RunResult<()> {
        self.frames.push(StackFrame {
            function: format!("<module '{path}'>"),
            source_path: path.to_owned(),
            location: program.first().map_or(CodeLoc::START, |s| s.position),
        });
        let was_main = self.is_main;
        self.is_main = false;
        let globals = self.globals();
        let result = self.exec_toplevel(program, &globals);
        self.is_main = was_main;
        if result.is_ok() {
            self.frames.pop();
        }
        result
    }
}
