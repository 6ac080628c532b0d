//! Shared program-building helpers for the integration tests.
//!
//! The parser is an external collaborator, so tests assemble ASTs directly
//! through the public constructors; these helpers keep that terse.

#![allow(dead_code)]

use prefix::{
    CodeLoc, CollectStringPrint, DeclType, ElseIf, ExprLoc, Exception, FunctionDef, Interp, InterpOptions, Node,
    NodeLoc, Param, QueueInput,
};

pub fn loc(line: u32, column: u32) -> CodeLoc {
    CodeLoc::new(line, column)
}

pub fn int(value: i64) -> ExprLoc {
    ExprLoc::int(value, CodeLoc::START)
}

pub fn flt(value: f64) -> ExprLoc {
    ExprLoc::flt(value, CodeLoc::START)
}

pub fn str_(value: &str) -> ExprLoc {
    ExprLoc::str(value, CodeLoc::START)
}

pub fn ident(name: &str) -> ExprLoc {
    ExprLoc::ident(name, CodeLoc::START)
}

pub fn call(name: &str, args: Vec<ExprLoc>) -> ExprLoc {
    call_at(name, args, CodeLoc::START)
}

pub fn call_at(name: &str, args: Vec<ExprLoc>, position: CodeLoc) -> ExprLoc {
    ExprLoc::call(ExprLoc::ident(name, position), args, position)
}

pub fn stmt(node: Node) -> NodeLoc {
    NodeLoc::new(CodeLoc::START, node)
}

pub fn stmt_at(node: Node, position: CodeLoc) -> NodeLoc {
    NodeLoc::new(position, node)
}

pub fn expr_stmt(expr: ExprLoc) -> NodeLoc {
    NodeLoc::expr(expr)
}

/// `PRINT(expr)` as a statement.
pub fn print1(expr: ExprLoc) -> NodeLoc {
    expr_stmt(call("PRINT", vec![expr]))
}

pub fn declare(name: &str, decl: DeclType) -> NodeLoc {
    stmt(Node::Declare {
        name: name.to_owned(),
        decl,
    })
}

pub fn assign(name: &str, decl: Option<DeclType>, value: ExprLoc) -> NodeLoc {
    stmt(Node::Assign {
        name: name.to_owned(),
        decl,
        value,
    })
}

pub fn if_else(test: ExprLoc, body: Vec<NodeLoc>, or_else: Option<Vec<NodeLoc>>) -> NodeLoc {
    stmt(Node::If {
        test,
        body,
        elifs: vec![],
        or_else,
    })
}

pub fn if_elif(test: ExprLoc, body: Vec<NodeLoc>, elifs: Vec<ElseIf>, or_else: Option<Vec<NodeLoc>>) -> NodeLoc {
    stmt(Node::If {
        test,
        body,
        elifs,
        or_else,
    })
}

pub fn while_loop(test: ExprLoc, body: Vec<NodeLoc>) -> NodeLoc {
    stmt(Node::While { test, body })
}

pub fn for_loop(counter: &str, limit: ExprLoc, body: Vec<NodeLoc>) -> NodeLoc {
    stmt(Node::For {
        counter: counter.to_owned(),
        limit,
        body,
    })
}

pub fn func_def(name: &str, ret: DeclType, params: Vec<Param>, body: Vec<NodeLoc>) -> NodeLoc {
    stmt(Node::FunctionDef(FunctionDef {
        name: name.to_owned(),
        ret,
        params,
        body,
    }))
}

pub fn ret(expr: ExprLoc) -> NodeLoc {
    stmt(Node::Return(expr))
}

pub fn brk(count: i64) -> NodeLoc {
    stmt(Node::Break(int(count)))
}

pub fn try_catch(body: Vec<NodeLoc>, catch_name: Option<&str>, handler: Vec<NodeLoc>) -> NodeLoc {
    stmt(Node::Try {
        body,
        catch_name: catch_name.map(str::to_owned),
        handler,
    })
}

pub fn goto(target: ExprLoc) -> NodeLoc {
    stmt(Node::Goto(target))
}

pub fn goto_point(target: ExprLoc) -> NodeLoc {
    stmt(Node::GotoPoint(target))
}

/// An interpreter wired to collecting/queued I/O, plus the test's handles.
pub struct Harness {
    pub interp: Interp,
    pub out: CollectStringPrint,
    pub input: QueueInput,
}

pub fn harness() -> Harness {
    harness_with(InterpOptions::default())
}

pub fn harness_with(options: InterpOptions) -> Harness {
    let out = CollectStringPrint::new();
    let input = QueueInput::new();
    let interp = Interp::with_io(options, Box::new(out.clone()), Box::new(input.clone()));
    Harness { interp, out, input }
}

/// Runs a program expecting success and returns everything it printed.
pub fn run_ok(program: &[NodeLoc]) -> String {
    let mut h = harness();
    if let Err(exc) = h.interp.exec_program(program) {
        panic!("program failed:\n{exc}");
    }
    h.out.output()
}

/// Runs a program expecting an uncaught error.
pub fn run_err(program: &[NodeLoc]) -> Exception {
    let mut h = harness();
    match h.interp.exec_program(program) {
        Ok(()) => panic!("program unexpectedly succeeded; output: {:?}", h.out.output()),
        Err(exc) => exc,
    }
}

/// Evaluates one operator call on literal arguments and returns the printed
/// display form of its result.
pub fn print_of(op: &str, args: Vec<ExprLoc>) -> String {
    let mut output = run_ok(&[print1(call(op, args))]);
    assert!(output.ends_with('\n'), "PRINT output must end with a newline");
    output.pop();
    output
}

/// Runs one operator call and returns the uncaught error it produces.
pub fn error_of(op: &str, args: Vec<ExprLoc>) -> Exception {
    run_err(&[expr_stmt(call(op, args))])
}

/// Shorthand: `Expr` wrapper for an already-built call used as a statement.
pub fn block(stmts: Vec<NodeLoc>) -> NodeLoc {
    stmt(Node::Block(stmts))
}
