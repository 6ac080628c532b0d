//! The fixed builtin operator table.
//!
//! Each operator category lives in its own submodule. Builtins take
//! precedence over extension-registered operators and user-defined
//! functions; the [`Builtins`] enum's `FromStr` impl is the name lookup the
//! evaluator performs first on every identifier call.

mod arith;
mod bitwise;
mod compare;
mod control;
mod convert;
mod environ;
mod logic;
mod print;
mod reduce;
mod roots;
mod strings;
mod variables;

use std::str::FromStr as _;

use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    args::ArgValues,
    environment::EnvRef,
    exceptions::{RunError, RunResult},
    expressions::{CodeLoc, ExprLoc},
    interp::Interp,
    value::Value,
};

/// The call-site context handed to every operator: the raw argument AST
/// nodes, the caller's environment, and the source location of the call.
pub(crate) struct CallSite<'a> {
    pub nodes: &'a [ExprLoc],
    pub env: &'a EnvRef,
    pub location: CodeLoc,
}

/// Enumerates every builtin operator.
///
/// Uses strum derives for `Display`, `FromStr`, and `Into<&'static str>`;
/// all variants serialize to their language-level uppercase spelling
/// (e.g. `Iadd` -> "IADD").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Builtins {
    // strict arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Neg,
    // coercing integer arithmetic
    Iadd,
    Isub,
    Imul,
    Idiv,
    Ipow,
    Isum,
    Iprod,
    // coercing float arithmetic
    Fadd,
    Fsub,
    Fmul,
    Fdiv,
    Fpow,
    Fsum,
    Fprod,
    Inv,
    // rounding division
    Cdiv,
    // roots and logarithms
    Root,
    Iroot,
    Froot,
    Log,
    Clog,
    Gcd,
    Lcm,
    // comparison
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    // logical
    And,
    Or,
    Xor,
    Not,
    Bool,
    // bitwise
    Band,
    Bor,
    Bxor,
    Bnot,
    Shl,
    Shr,
    // conversion and type probes
    Int,
    Flt,
    Str,
    Isint,
    Isflt,
    Isstr,
    Type,
    // strings
    Slen,
    Upper,
    Lower,
    Slice,
    Replace,
    Strip,
    Join,
    // variadic reductions
    Sum,
    Prod,
    Max,
    Min,
    Any,
    All,
    // I/O
    Print,
    Input,
    // control helpers
    Assert,
    Throw,
    // variable operators
    Del,
    Exist,
    Copy,
    // environment
    Main,
    Os,
    Exit,
    Import,
}

impl Builtins {
    /// Looks up an operator by its language-level name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    /// Minimum and maximum argument counts; `None` means unbounded.
    #[must_use]
    pub fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Main | Self::Os => (0, Some(0)),
            Self::Print => (0, None),
            Self::Input => (0, Some(1)),
            Self::Neg
            | Self::Inv
            | Self::Log
            | Self::Clog
            | Self::Not
            | Self::Bool
            | Self::Bnot
            | Self::Int
            | Self::Flt
            | Self::Str
            | Self::Isint
            | Self::Isflt
            | Self::Isstr
            | Self::Type
            | Self::Slen
            | Self::Upper
            | Self::Lower
            | Self::Throw
            | Self::Del
            | Self::Exist
            | Self::Copy
            | Self::Exit
            | Self::Import => (1, Some(1)),
            Self::Assert => (1, Some(2)),
            Self::Slice | Self::Replace => (3, Some(3)),
            Self::Isum | Self::Iprod | Self::Fsum | Self::Fprod | Self::Sum | Self::Prod | Self::Max | Self::Min
            | Self::Any | Self::All | Self::Join => (1, None),
            _ => (2, Some(2)),
        }
    }

    /// Whether this operator receives its first argument's AST node
    /// unevaluated (it must be a bare identifier).
    #[must_use]
    pub fn takes_unevaluated_ident(self) -> bool {
        matches!(self, Self::Del | Self::Exist)
    }

    /// Validates a call's argument count against this operator's arity.
    pub(crate) fn check_arity(self, got: usize, location: CodeLoc) -> RunResult<()> {
        let (min, max) = self.arity();
        if got < min || max.is_some_and(|max| got > max) {
            let name: &'static str = self.into();
            return Err(RunError::arity_error(name, min, max, got, location));
        }
        Ok(())
    }

    /// Invokes the operator.
    ///
    /// Arguments arrive already evaluated (left-to-right) and arity-checked,
    /// except for `DEL`/`EXIST`, which receive `ArgValues::Empty` and read
    /// the identifier from `site.nodes`.
    pub(crate) fn call(self, interp: &mut Interp, args: ArgValues, site: &CallSite<'_>) -> RunResult<Value> {
        let loc = site.location;
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod | Self::Pow => {
                arith::strict_binary(self, args, loc)
            }
            Self::Neg => arith::op_neg(args, loc),
            Self::Cdiv => arith::op_cdiv(args, loc),
            Self::Iadd | Self::Isub | Self::Imul | Self::Idiv | Self::Ipow => arith::int_binary(self, args, loc),
            Self::Fadd | Self::Fsub | Self::Fmul | Self::Fdiv | Self::Fpow => arith::flt_binary(self, args, loc),
            Self::Isum | Self::Iprod => arith::int_fold(self, args, loc),
            Self::Fsum | Self::Fprod => arith::flt_fold(self, args, loc),
            Self::Inv => arith::op_inv(args, loc),
            Self::Root | Self::Iroot | Self::Froot => roots::op_root(self, args, loc),
            Self::Log | Self::Clog => roots::op_log(self, args, loc),
            Self::Gcd | Self::Lcm => roots::op_gcd_lcm(self, args, loc),
            Self::Eq => compare::op_eq(args, loc),
            Self::Lt | Self::Lte | Self::Gt | Self::Gte => compare::ordered(self, args, loc),
            Self::And | Self::Or | Self::Xor => logic::binary(self, args, loc),
            Self::Not | Self::Bool => logic::unary(self, args, loc),
            Self::Band | Self::Bor | Self::Bxor => bitwise::binary(self, args, loc),
            Self::Bnot => bitwise::op_bnot(args, loc),
            Self::Shl | Self::Shr => bitwise::shift(self, args, loc),
            Self::Int => convert::op_int(args, loc),
            Self::Flt => convert::op_flt(args, loc),
            Self::Str => convert::op_str(args, loc),
            Self::Isint | Self::Isflt | Self::Isstr => convert::probe(self, args, loc),
            Self::Type => convert::op_type(args, loc),
            Self::Slen => strings::op_slen(args, loc),
            Self::Upper | Self::Lower => strings::case(self, args, loc),
            Self::Slice => strings::op_slice(args, loc),
            Self::Replace => strings::op_replace(args, loc),
            Self::Strip => strings::op_strip(args, loc),
            Self::Join => strings::op_join(args, loc),
            Self::Sum | Self::Prod => reduce::numeric(self, args, loc),
            Self::Max | Self::Min => reduce::extremum(self, args, loc),
            Self::Any | Self::All => reduce::predicate(self, args, loc),
            Self::Print => print::op_print(interp, args),
            Self::Input => print::op_input(interp, args, loc),
            Self::Assert => control::op_assert(args, loc),
            Self::Throw => control::op_throw(args, loc),
            Self::Del | Self::Exist => variables::del_exist(self, site),
            Self::Copy => variables::op_copy(args, loc),
            Self::Main => environ::op_main(interp),
            Self::Os => Ok(environ::op_os()),
            Self::Exit => environ::op_exit(args, loc),
            Self::Import => environ::op_import(interp, args, loc),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_round_trip() {
        for (name, op) in [
            ("ADD", Builtins::Add),
            ("IADD", Builtins::Iadd),
            ("CDIV", Builtins::Cdiv),
            ("ISINT", Builtins::Isint),
            ("SLEN", Builtins::Slen),
        ] {
            assert_eq!(Builtins::lookup(name), Some(op));
            let spelled: &'static str = op.into();
            assert_eq!(spelled, name);
        }
        // operator names are case-sensitive, and control keywords are not operators
        assert_eq!(Builtins::lookup("add"), None);
        assert_eq!(Builtins::lookup("GOTO"), None);
    }

    #[test]
    fn arity_table_shape() {
        assert_eq!(Builtins::Add.arity(), (2, Some(2)));
        assert_eq!(Builtins::Print.arity(), (0, None));
        assert_eq!(Builtins::Slice.arity(), (3, Some(3)));
        assert_eq!(Builtins::Sum.arity(), (1, None));
        assert_eq!(Builtins::Main.arity(), (0, Some(0)));
    }
}
