use crate::evaluator::{Environment, Evaluator};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Runs a whole source file against a fresh global environment, reporting
/// any error as a terminal diagnostic. With `show_ast` the parse tree is
/// dumped before execution.
pub fn run(source: &str, filename: Option<&str>, show_ast: bool) {
    // Lexical analysis
    let mut lexer = Lexer::new(source.to_string());
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    // Parsing
    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            error.report(source, filename);
            return;
        }
    };

    if show_ast {
        print!("{}", program);
        println!("============");
    }

    // Evaluation
    let mut env = Environment::new();
    let mut evaluator = Evaluator::to_stdout();
    if let Err(error) = evaluator.run(&program, &mut env) {
        error.report(source, filename);
    }
}
