#![doc = include_str!("../../../README.md")]
#![allow(clippy::cast_possible_truncation, reason = "numeric narrowing is range-checked at the call sites")]
#![allow(clippy::cast_sign_loss, reason = "sign-changing casts follow the language's numeric rules")]
#![allow(clippy::cast_possible_wrap, reason = "wrapping casts implement the documented parse convention")]

mod args;
mod builtins;
mod environment;
mod eval;
mod exceptions;
mod exec;
mod expressions;
mod extension;
mod function;
mod interp;
mod io;
mod tensor;
mod value;

pub use crate::{
    args::ArgValues,
    builtins::Builtins,
    environment::{Binding, EnvError, EnvRef, Environment, WritePolicy},
    exceptions::{ErrorKind, Exception, RunError, RunResult, StackFrame},
    expressions::{CodeLoc, DeclType, ElseIf, Expr, ExprLoc, FunctionDef, Node, NodeLoc, Param},
    extension::{
        API_VERSION, Extension, ExtensionError, HookEvent, HookFn, OpCall, OperatorFn, RegistrationContext, ReplFn,
    },
    function::Function,
    interp::{Interp, InterpOptions, ModuleLoaderFn},
    io::{CollectStringPrint, InputReader, NoPrint, PrintWriter, QueueInput, StdInput, StdPrint},
    tensor::Tensor,
    value::Value,
};
