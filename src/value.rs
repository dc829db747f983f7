use crate::ast::Stmt;
use rust_decimal::Decimal;
use std::fmt;

/// The runtime values of the language. Numbers carry base-10 fixed-point
/// semantics (28-29 significant digits), so literals like `0.1` are exact.
/// Functions capture nothing; parameters and globals are the only names
/// visible inside a body.
#[derive(Debug, Clone)]
pub enum Value {
    Number(Decimal),
    Function { params: Vec<String>, body: Vec<Stmt> },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Function { .. } => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l == r,
            // Function values have no useful identity
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // Normalize so computed values print without trailing zeros
            Value::Number(n) => write!(f, "{}", n.normalize()),
            Value::Function { params, .. } => write!(f, "function({})", params.join(", ")),
        }
    }
}
