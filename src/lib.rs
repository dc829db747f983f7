// rill language interpreter library
//
// A small scripting language with base-10 decimal arithmetic, variables,
// a print construct, and user-defined functions with positional arguments.
// Source text is tokenized, parsed into an AST, and executed by a
// tree-walking evaluator against an explicit variable environment.

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, Program, Stmt};
pub use error::{ErrorKind, RillError, Span};
pub use evaluator::{Environment, Evaluator};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::Parser;
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
