use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::error::{RillError, Span};
use crate::value::Value;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::{self, Write};

/// Name bindings: a global scope plus a stack of call frames. Lookups resolve
/// against the innermost active frame and fall through directly to the global
/// scope; a function body never sees its caller's locals.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    globals: HashMap<String, Value>,
    frames: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(frame) = self.frames.last() {
            if let Some(value) = frame.get(name) {
                return Some(value.clone());
            }
        }
        self.globals.get(name).cloned()
    }

    /// Binds (or rebinds) `name` in the innermost active scope.
    pub fn define(&mut self, name: &str, value: Value) {
        let scope = self.frames.last_mut().unwrap_or(&mut self.globals);
        scope.insert(name.to_string(), value);
    }

    pub fn push_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.frames.pop();
    }
}

/// Tree-walking evaluator. The environment is an explicit parameter rather
/// than ambient state, and print output goes to any `io::Write` sink so that
/// independent programs evaluate deterministically and tests can capture
/// output in memory.
pub struct Evaluator<W: Write> {
    out: W,
}

impl Evaluator<io::Stdout> {
    pub fn to_stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Evaluator<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes each statement in source order. Any failure aborts the run
    /// immediately; the language has no recovery construct.
    pub fn run(&mut self, program: &Program, env: &mut Environment) -> Result<(), RillError> {
        for statement in &program.statements {
            self.execute_statement(statement, env)?;
        }
        Ok(())
    }

    /// Statements yield a value so that the last statement of a function body
    /// can become the call's result: an assignment yields the assigned value,
    /// a bare expression yields its own value.
    fn execute_statement(&mut self, stmt: &Stmt, env: &mut Environment) -> Result<Value, RillError> {
        match stmt {
            Stmt::Assign { name, expr, .. } => {
                let value = self.evaluate_expression(expr, env)?;
                env.define(name, value.clone());
                Ok(value)
            }
            Stmt::Expression { expr, .. } => self.evaluate_expression(expr, env),
        }
    }

    pub fn evaluate_expression(
        &mut self,
        expr: &Expr,
        env: &mut Environment,
    ) -> Result<Value, RillError> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Variable { name, span } => env
                .lookup(name)
                .ok_or_else(|| RillError::unbound_name(span.clone(), name)),
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_val = self.evaluate_expression(left, env)?;
                let right_val = self.evaluate_expression(right, env)?;
                self.evaluate_binary_op(operator, left_val, right_val, span)
            }
            Expr::Grouping { expr, .. } => self.evaluate_expression(expr, env),
            Expr::Print { expr, span } => {
                let value = self.evaluate_expression(expr, env)?;
                writeln!(self.out, "{}", value).map_err(|e| {
                    RillError::output_error(span.clone(), format!("Failed to write output: {}", e))
                })?;
                // Print is transparent: it yields the printed value, so it
                // composes inside larger expressions
                Ok(value)
            }
            Expr::Call { name, args, span } => self.call_function(name, args, span, env),
        }
    }

    fn call_function(
        &mut self,
        name: &str,
        args: &[Expr],
        span: &Span,
        env: &mut Environment,
    ) -> Result<Value, RillError> {
        let callee = env
            .lookup(name)
            .ok_or_else(|| RillError::unbound_name(span.clone(), name))?;

        let (params, body) = match callee {
            Value::Function { params, body } => (params, body),
            other => {
                return Err(RillError::type_error(
                    span.clone(),
                    format!("'{}' is not a function, it is a {}", name, other.type_name()),
                ));
            }
        };

        if args.len() != params.len() {
            return Err(RillError::arity_error(
                span.clone(),
                format!(
                    "'{}' takes {} argument{}, got {}",
                    name,
                    params.len(),
                    if params.len() == 1 { "" } else { "s" },
                    args.len()
                ),
                format!(
                    "Call '{}' with exactly its declared parameters: {}({})",
                    name,
                    name,
                    params.join(", ")
                ),
            ));
        }

        // Arguments evaluate left to right in the caller's scope, before the
        // call frame exists
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expression(arg, env)?);
        }

        env.push_scope();
        for (param, value) in params.iter().zip(arg_values) {
            env.define(param, value);
        }

        // An empty body yields the number 0
        let mut result = Ok(Value::Number(Decimal::ZERO));
        for statement in &body {
            result = self.execute_statement(statement, env);
            if result.is_err() {
                break;
            }
        }

        // The frame is discarded even when the body failed, so a failed call
        // cannot leak bindings into the caller
        env.pop_scope();
        result
    }

    fn evaluate_binary_op(
        &self,
        operator: &BinaryOp,
        left: Value,
        right: Value,
        span: &Span,
    ) -> Result<Value, RillError> {
        let (l, r) = match (left, right) {
            (Value::Number(l), Value::Number(r)) => (l, r),
            (l, r) => {
                return Err(RillError::type_error(
                    span.clone(),
                    format!(
                        "Cannot {} {} and {}",
                        operator.verb(),
                        l.type_name(),
                        r.type_name()
                    ),
                ));
            }
        };

        let result = match operator {
            BinaryOp::Add => l.checked_add(r),
            BinaryOp::Subtract => l.checked_sub(r),
            BinaryOp::Multiply => l.checked_mul(r),
            BinaryOp::Divide => {
                if r.is_zero() {
                    return Err(RillError::arithmetic_error(
                        span.clone(),
                        "Division by zero".to_string(),
                    ));
                }
                l.checked_div(r)
            }
        };

        result.map(Value::Number).ok_or_else(|| {
            RillError::arithmetic_error(span.clone(), "Numeric overflow".to_string())
        })
    }
}
