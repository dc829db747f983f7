use crate::ast::{Expr, Stmt};
use crate::evaluator::{Environment, Evaluator};
use crate::lexer::Lexer;
use crate::parser::Parser;
use std::io::{self, Write};

/// Interactive loop. Bindings persist between lines, and a single bare
/// non-print expression echoes its value.
pub fn start() {
    println!("rill interpreter v0.1.0");
    println!("Type 'exit' or press Ctrl+C to quit");
    println!();

    // Persistent state between commands
    let mut env = Environment::new();
    let mut evaluator = Evaluator::to_stdout();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_repl_command(line, &mut evaluator, &mut env);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_command(source: &str, evaluator: &mut Evaluator<io::Stdout>, env: &mut Environment) {
    // Lexical analysis
    let mut lexer = Lexer::new(source.to_string());
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };

    // Parsing
    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };

    // A single bare expression echoes its value, unless it already prints
    if program.statements.len() == 1 {
        if let Stmt::Expression { expr, .. } = &program.statements[0] {
            if !matches!(expr, Expr::Print { .. }) {
                match evaluator.evaluate_expression(expr, env) {
                    Ok(value) => println!("{}", value),
                    Err(error) => error.report(source, None),
                }
                return;
            }
        }
    }

    // Otherwise run the statements normally (assignments, prints, ...)
    if let Err(error) = evaluator.run(&program, env) {
        error.report(source, None);
    }
}
