//! AST node types consumed from the parser.
//!
//! The lexer and parser are external collaborators: they are expected to emit
//! the well-formed tree described here, with every node annotated with its
//! source line and column. The constructors on [`ExprLoc`] and [`NodeLoc`]
//! are the contract surface for front ends (and for tests, which build
//! programs directly).

use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

/// A source position (1-based line and column).
///
/// Positions flow unchanged from the parser into error messages and
/// tracebacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeLoc {
    pub line: u32,
    pub column: u32,
}

impl CodeLoc {
    /// Position of the first character of a source file.
    pub const START: Self = Self { line: 1, column: 1 };

    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for CodeLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Static type tag attached to declarations, parameters, and return types.
///
/// `Unknown` appears only in ASTs produced by a front end that defers type
/// resolution; it never reaches a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum DeclType {
    Int,
    Flt,
    Str,
    Func,
    Tns,
    Unknown,
}

/// An expression in the AST.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Signed 64-bit integer literal.
    Int(i64),
    /// Double-precision float literal.
    Flt(f64),
    /// UTF-8 string literal.
    Str(String),
    /// An identifier: a variable or function name.
    Ident(String),
    /// Call expression: operator-first, arguments in source order.
    ///
    /// The callee is usually an identifier, resolved at call time against the
    /// builtin table, the extension operator table, the function registry,
    /// and finally the environment. Any other callee expression must
    /// evaluate to a function value.
    Call {
        callee: Box<ExprLoc>,
        args: Vec<ExprLoc>,
    },
}

/// An expression with its source location.
#[derive(Debug, Clone)]
pub struct ExprLoc {
    pub position: CodeLoc,
    pub expr: Expr,
}

impl ExprLoc {
    #[must_use]
    pub fn new(position: CodeLoc, expr: Expr) -> Self {
        Self { position, expr }
    }

    #[must_use]
    pub fn int(value: i64, position: CodeLoc) -> Self {
        Self::new(position, Expr::Int(value))
    }

    #[must_use]
    pub fn flt(value: f64, position: CodeLoc) -> Self {
        Self::new(position, Expr::Flt(value))
    }

    #[must_use]
    pub fn str(value: impl Into<String>, position: CodeLoc) -> Self {
        Self::new(position, Expr::Str(value.into()))
    }

    #[must_use]
    pub fn ident(name: impl Into<String>, position: CodeLoc) -> Self {
        Self::new(position, Expr::Ident(name.into()))
    }

    #[must_use]
    pub fn call(callee: Self, args: Vec<Self>, position: CodeLoc) -> Self {
        Self::new(
            position,
            Expr::Call {
                callee: Box::new(callee),
                args,
            },
        )
    }
}

/// One `ELSEIF` arm of an `IF` statement.
#[derive(Debug, Clone)]
pub struct ElseIf {
    pub test: ExprLoc,
    pub body: Vec<NodeLoc>,
}

/// A function parameter: name, declared type, optional default expression.
///
/// Default expressions are evaluated in the callee's fresh environment, so a
/// later default may reference an earlier parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub decl: DeclType,
    pub default: Option<ExprLoc>,
}

impl Param {
    #[must_use]
    pub fn new(name: impl Into<String>, decl: DeclType) -> Self {
        Self {
            name: name.into(),
            decl,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(name: impl Into<String>, decl: DeclType, default: ExprLoc) -> Self {
        Self {
            name: name.into(),
            decl,
            default: Some(default),
        }
    }
}

/// A function definition statement body.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    /// Declared return type; the returned value's runtime tag must match.
    pub ret: DeclType,
    pub params: Vec<Param>,
    pub body: Vec<NodeLoc>,
}

/// A statement in the AST.
#[derive(Debug, Clone)]
pub enum Node {
    /// A bare nested block. Blocks are the resolution scope for labels but do
    /// not introduce a new variable scope.
    Block(Vec<NodeLoc>),
    /// An expression evaluated for its side effects; the value is discarded.
    Expr(ExprLoc),
    /// Declaration without initializer: the binding starts uninitialized.
    Declare { name: String, decl: DeclType },
    /// Assignment. With `decl` present this is a typed declaration with
    /// initializer (a new binding in the current scope); without it, the
    /// nearest enclosing binding is updated.
    Assign {
        name: String,
        decl: Option<DeclType>,
        value: ExprLoc,
    },
    If {
        test: ExprLoc,
        body: Vec<NodeLoc>,
        elifs: Vec<ElseIf>,
        or_else: Option<Vec<NodeLoc>>,
    },
    While { test: ExprLoc, body: Vec<NodeLoc> },
    /// Counting loop: binds `counter` to 0..limit-1 in order. The limit
    /// expression is evaluated once, and any pre-existing binding of the
    /// counter name is restored at loop exit.
    For {
        counter: String,
        limit: ExprLoc,
        body: Vec<NodeLoc>,
    },
    FunctionDef(FunctionDef),
    Return(ExprLoc),
    /// Break out of `count` enclosing loops; `count` must evaluate to a
    /// positive integer no greater than the current loop-nesting depth.
    Break(ExprLoc),
    Continue,
    /// Try/catch. When `catch_name` is given, the handler runs with the
    /// error message bound to it as a `str`.
    Try {
        body: Vec<NodeLoc>,
        catch_name: Option<String>,
        handler: Vec<NodeLoc>,
    },
    /// Jump to the `GOTOPOINT` with a matching label in the nearest
    /// enclosing block that defines it.
    Goto(ExprLoc),
    /// Label declaration. The target expression must be an `int` or `str`
    /// literal so that labels can be registered in a pre-pass.
    GotoPoint(ExprLoc),
}

/// A statement with its source location.
#[derive(Debug, Clone)]
pub struct NodeLoc {
    pub position: CodeLoc,
    pub node: Node,
}

impl NodeLoc {
    #[must_use]
    pub fn new(position: CodeLoc, node: Node) -> Self {
        Self { position, node }
    }

    /// Expression statement, positioned at the expression itself.
    #[must_use]
    pub fn expr(expr: ExprLoc) -> Self {
        Self::new(expr.position, Node::Expr(expr))
    }
}
