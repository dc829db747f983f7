use crate::error::Span;
use crate::value::Value;
use std::fmt;

/// The AST is a pure tree: every node is exclusively owned by its parent,
/// and every node carries the source span it was parsed from.

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `name = expr` — evaluate and bind in the current scope.
    Assign { name: String, expr: Expr, span: Span },
    /// A bare expression evaluated for its side effects. Its value is
    /// discarded unless it is the last statement of a function body.
    Expression { expr: Expr, span: Span },
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::Assign { span, .. } => span,
            Stmt::Expression { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// A parsed literal: a number, or a `function (...) (...)` value.
    Literal { value: Value, span: Span },
    Variable { name: String, span: Span },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Grouping { expr: Box<Expr>, span: Span },
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    Print { expr: Box<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Literal { span, .. } => span,
            Expr::Variable { span, .. } => span,
            Expr::Binary { span, .. } => span,
            Expr::Grouping { span, .. } => span,
            Expr::Call { span, .. } => span,
            Expr::Print { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
        }
    }
}

// Indented tree dump, used by the CLI's --ast flag. The exact formatting is
// a diagnostic aid, not a compatibility surface.

fn indent(f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "  ")?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            statement.fmt_indented(f, 0)?;
        }
        Ok(())
    }
}

impl Stmt {
    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        match self {
            Stmt::Assign { name, expr, .. } => {
                indent(f, depth)?;
                writeln!(f, "assign: {}", name)?;
                expr.fmt_indented(f, depth + 1)
            }
            Stmt::Expression { expr, .. } => {
                indent(f, depth)?;
                writeln!(f, "expr:")?;
                expr.fmt_indented(f, depth + 1)
            }
        }
    }
}

impl Expr {
    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        match self {
            Expr::Literal { value: Value::Number(n), .. } => {
                indent(f, depth)?;
                writeln!(f, "number: {}", n)
            }
            Expr::Literal {
                value: Value::Function { params, body },
                ..
            } => {
                indent(f, depth)?;
                writeln!(f, "function ({}) =>", params.join(", "))?;
                for statement in body {
                    statement.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
            Expr::Variable { name, .. } => {
                indent(f, depth)?;
                writeln!(f, "lookup: {}", name)
            }
            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => {
                indent(f, depth)?;
                writeln!(f, "binary: {}", operator.symbol())?;
                left.fmt_indented(f, depth + 1)?;
                right.fmt_indented(f, depth + 1)
            }
            Expr::Grouping { expr, .. } => {
                indent(f, depth)?;
                writeln!(f, "group:")?;
                expr.fmt_indented(f, depth + 1)
            }
            Expr::Call { name, args, .. } => {
                indent(f, depth)?;
                writeln!(f, "call: {}", name)?;
                for arg in args {
                    arg.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
            Expr::Print { expr, .. } => {
                indent(f, depth)?;
                writeln!(f, "print:")?;
                expr.fmt_indented(f, depth + 1)
            }
        }
    }
}
