// Integration tests for the rill interpreter.
//
// The first half is a table-driven parser robustness harness; the second half
// runs whole programs through an in-memory output sink and checks printed
// output, final environment state, and error kinds.

use rill::error::{ErrorKind, RillError};
use rill::evaluator::{Environment, Evaluator};
use rill::lexer::Lexer;
use rill::parser::Parser;
use rill::value::Value;

/// Test result for a single parser test case
#[derive(Debug)]
pub enum TestResult {
    Pass,
    Fail(String),
    Crash(String),
}

/// Individual parser test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub should_succeed: bool,
    pub expected_error_contains: Option<String>,
}

impl TestCase {
    pub fn should_succeed(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: true,
            expected_error_contains: None,
        }
    }

    pub fn should_fail(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: None,
        }
    }

    pub fn should_fail_with_message(name: &str, input: &str, expected_msg: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: Some(expected_msg.to_string()),
        }
    }
}

/// Test suite containing multiple test cases
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Run all tests in this suite, returning the number of failures
    pub fn run(&self) -> usize {
        println!("Running test suite: {}", self.name);

        let mut failures = 0;
        for test in &self.tests {
            match run_single_test(test) {
                TestResult::Pass => println!("  ok   {}", test.name),
                TestResult::Fail(msg) => {
                    failures += 1;
                    println!("  FAIL {}: {}", test.name, msg);
                }
                TestResult::Crash(msg) => {
                    failures += 1;
                    println!("  CRASH {}: {}", test.name, msg);
                }
            }
        }
        failures
    }
}

fn run_single_test(test: &TestCase) -> TestResult {
    // Catch any panics to detect crashes
    let result = std::panic::catch_unwind(|| parse_source(&test.input));

    match result {
        Ok(parse_result) => match (parse_result, test.should_succeed) {
            (Ok(_), true) => TestResult::Pass,
            (Ok(_), false) => {
                TestResult::Fail("Expected parsing to fail, but it succeeded".to_string())
            }
            (Err(error), false) => {
                if let Some(expected) = &test.expected_error_contains {
                    if error.message.contains(expected) {
                        TestResult::Pass
                    } else {
                        TestResult::Fail(format!(
                            "Error message '{}' doesn't contain expected text '{}'",
                            error.message, expected
                        ))
                    }
                } else {
                    TestResult::Pass // Any error is acceptable
                }
            }
            (Err(error), true) => TestResult::Fail(format!(
                "Expected parsing to succeed, but got error: {}",
                error.message
            )),
        },
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            TestResult::Crash(panic_msg)
        }
    }
}

fn parse_source(input: &str) -> Result<rill::ast::Program, RillError> {
    let mut lexer = Lexer::new(input.to_string());
    let tokens = lexer.scan_tokens()?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}

/// Run a whole program with an in-memory sink, returning its printed output
/// and final environment.
fn run_source(input: &str) -> Result<(String, Environment), RillError> {
    let program = parse_source(input)?;
    let mut env = Environment::new();
    let mut evaluator = Evaluator::new(Vec::new());
    evaluator.run(&program, &mut env)?;
    let output = String::from_utf8(evaluator.into_output()).expect("output is valid utf-8");
    Ok((output, env))
}

fn run_output(input: &str) -> String {
    let (output, _) = run_source(input).expect("program should run");
    output
}

fn run_error(input: &str) -> RillError {
    run_source(input).expect_err("program should fail")
}

fn number(digits: &str) -> Value {
    Value::Number(digits.parse().expect("valid decimal"))
}

// ============================================================================
// Parser robustness suites
// ============================================================================

fn create_malformed_expression_tests() -> TestSuite {
    let mut suite = TestSuite::new("Malformed Expressions");

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren",
        "(1 + 2",
        "Expected ')' after expression",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren_nested",
        "((1 + 2)",
        "Expected ')' after expression",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_closing_paren",
        "1 + 2)",
        "Expected expression, found ')'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "empty_parentheses",
        "()",
        "Empty parentheses are not allowed",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "empty_parentheses_in_expression",
        "1 + ()",
        "Expected expression after '+'",
    ));
    suite.add_test(TestCase::should_fail("missing_left_operand", "+ 1"));
    suite.add_test(TestCase::should_fail("missing_right_operand", "1 +"));
    suite.add_test(TestCase::should_fail("double_plus", "1 ++ 2"));
    suite.add_test(TestCase::should_fail("bare_star", "* 2"));

    suite
}

fn create_edge_case_tests() -> TestSuite {
    let mut suite = TestSuite::new("Edge Cases");

    suite.add_test(TestCase::should_succeed("empty_input", ""));
    suite.add_test(TestCase::should_succeed("only_whitespace", "   \n\t  "));
    suite.add_test(TestCase::should_succeed("only_comment", "// nothing here"));
    suite.add_test(TestCase::should_fail("unexpected_eof_in_group", "1 + ("));

    // Very deeply nested expressions
    let deep_parens = "(".repeat(100) + "1" + &")".repeat(100);
    suite.add_test(TestCase::should_succeed("deeply_nested_parens", &deep_parens));

    suite
}

fn create_literal_tests() -> TestSuite {
    let mut suite = TestSuite::new("Literal Tests");

    suite.add_test(TestCase::should_succeed("integer_literal", "42"));
    suite.add_test(TestCase::should_succeed("decimal_literal", "3.14"));
    suite.add_test(TestCase::should_succeed("zero_point", "0.5"));

    // Invalid number formats: the second '.' is not part of any token
    suite.add_test(TestCase::should_fail_with_message(
        "multiple_dots",
        "3.14.159",
        "Unexpected character",
    ));
    suite.add_test(TestCase::should_fail("trailing_dot", "42."));
    suite.add_test(TestCase::should_fail("leading_dot", ".42"));
    suite.add_test(TestCase::should_fail_with_message(
        "unknown_character",
        "1 $ 2",
        "Unexpected character",
    ));

    suite
}

fn create_assignment_tests() -> TestSuite {
    let mut suite = TestSuite::new("Assignment Tests");

    suite.add_test(TestCase::should_succeed("simple_assignment", "x = 1"));
    suite.add_test(TestCase::should_succeed("assignment_with_expression", "x = 1 + 2"));
    suite.add_test(TestCase::should_succeed("assignment_with_semicolon", "x = 1;"));
    suite.add_test(TestCase::should_fail("missing_value", "x ="));
    suite.add_test(TestCase::should_fail("invalid_target", "1 = x"));
    suite.add_test(TestCase::should_fail("double_equals", "x = = 1"));

    suite
}

fn create_call_tests() -> TestSuite {
    let mut suite = TestSuite::new("Function Call Tests");

    suite.add_test(TestCase::should_succeed("zero_arg_call", "f()"));
    suite.add_test(TestCase::should_succeed("call_with_args", "f(1, 2, 3)"));
    suite.add_test(TestCase::should_succeed("nested_call", "f(g(1), 2)"));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_closing_paren",
        "f(1, 2",
        "Expected ')' after arguments",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_comma",
        "f(1 2)",
        "Expected ')' after arguments",
    ));
    suite.add_test(TestCase::should_fail("trailing_comma", "f(1, 2,)"));

    suite
}

fn create_function_literal_tests() -> TestSuite {
    let mut suite = TestSuite::new("Function Literal Tests");

    suite.add_test(TestCase::should_succeed(
        "one_param",
        "f = function (a) ( a + 1 )",
    ));
    suite.add_test(TestCase::should_succeed(
        "two_params_two_statements",
        "f = function (a, b) ( c = a + b c * 2 )",
    ));
    suite.add_test(TestCase::should_succeed("empty_function", "f = function () ()"));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_param_list",
        "function",
        "Expected '(' after 'function'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_param_list",
        "function (a ( a )",
        "Expected ')' after parameters",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "number_as_param",
        "function (1) ( 1 )",
        "Expected parameter name",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_body",
        "function (a)",
        "Expected '(' before function body",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unclosed_body",
        "function (a) ( a",
        "Expected ')' after function body",
    ));

    suite
}

fn create_positive_tests() -> TestSuite {
    let mut suite = TestSuite::new("Positive Tests");

    suite.add_test(TestCase::should_succeed("simple_arithmetic", "1 + 2 * 3"));
    suite.add_test(TestCase::should_succeed("parentheses", "(1 + 2) * 3"));
    suite.add_test(TestCase::should_succeed("print_expression", "print 1 + 2"));
    suite.add_test(TestCase::should_succeed("nested_print", "print print 1"));
    suite.add_test(TestCase::should_succeed(
        "statement_sequence",
        "a = 1; b = 2; a + b",
    ));
    suite.add_test(TestCase::should_succeed(
        "mixed_constructs",
        "x = (1 + 2) * 3 + f(4, 5)",
    ));
    suite.add_test(TestCase::should_fail("print_without_operand", "print"));

    suite
}

#[test]
fn parser_robustness() {
    let suites = vec![
        create_malformed_expression_tests(),
        create_edge_case_tests(),
        create_literal_tests(),
        create_assignment_tests(),
        create_call_tests(),
        create_function_literal_tests(),
        create_positive_tests(),
    ];

    let mut failures = 0;
    for suite in suites {
        failures += suite.run();
    }

    assert_eq!(failures, 0, "{} parser test cases failed", failures);
}

// ============================================================================
// Evaluation semantics
// ============================================================================

#[test]
fn arithmetic_precedence() {
    assert_eq!(run_output("print 1 + 2 * 3"), "7\n");
    assert_eq!(run_output("print (1 + 2) * 3"), "9\n");
    assert_eq!(run_output("print 10 - 4 - 3"), "3\n"); // left-associative
    assert_eq!(run_output("print 8 / 2 / 2"), "2\n");
}

#[test]
fn decimal_arithmetic_is_exact() {
    // Base-10 semantics: no binary floating point drift
    assert_eq!(run_output("print 0.1 + 0.2"), "0.3\n");
    assert_eq!(run_output("print 0.25 * 4"), "1\n");
    assert_eq!(run_output("print 1 / 4"), "0.25\n");
    assert_eq!(run_output("print 1 - 2"), "-1\n");
}

#[test]
fn assignment_and_lookup_round_trip() {
    let (output, env) = run_source("x = 1 + 2 print x").expect("program should run");
    assert_eq!(output, "3\n");
    assert_eq!(env.lookup("x"), Some(number("3")));
}

#[test]
fn rebinding_overwrites() {
    let (_, env) = run_source("x = 1 x = x + 1").expect("program should run");
    assert_eq!(env.lookup("x"), Some(number("2")));
}

#[test]
fn print_yields_its_value() {
    let (output, env) = run_source("x = print 5").expect("program should run");
    assert_eq!(output, "5\n");
    assert_eq!(env.lookup("x"), Some(number("5")));

    // Print composes inside larger expressions
    let (output, env) = run_source("x = 1 + print 2").expect("program should run");
    assert_eq!(output, "2\n");
    assert_eq!(env.lookup("x"), Some(number("3")));
}

#[test]
fn sequential_side_effects_stay_ordered() {
    assert_eq!(run_output("print 1 print 2"), "1\n2\n");
}

#[test]
fn unbound_lookup_fails() {
    assert_eq!(run_error("print x").kind, ErrorKind::UnboundName);
    assert_eq!(run_error("y + 1").kind, ErrorKind::UnboundName);
}

#[test]
fn division_by_zero_fails() {
    assert_eq!(run_error("print 1 / 0").kind, ErrorKind::Arithmetic);
    assert_eq!(run_error("1 / (2 - 2)").kind, ErrorKind::Arithmetic);
}

#[test]
fn numeric_overflow_fails() {
    // The largest representable number; one more cannot be represented
    let source = "x = 79228162514264337593543950335 x + 1";
    assert_eq!(run_error(source).kind, ErrorKind::Arithmetic);

    let source = "x = 79228162514264337593543950335 x * 2";
    assert_eq!(run_error(source).kind, ErrorKind::Arithmetic);
}

#[test]
fn overflowing_literal_fails_to_lex() {
    // 30 digits exceeds what a number can hold
    let error = parse_source("999999999999999999999999999999").expect_err("should fail to lex");
    assert_eq!(error.kind, ErrorKind::Lex);
    assert!(error.message.contains("Invalid number"));
}

#[test]
fn function_call_evaluates_body_in_fresh_scope() {
    let source = "a = 100 f = function (a) ( a + 1 ) x = f(5) print a";
    let (output, env) = run_source(source).expect("program should run");

    // The parameter shadows the unrelated global of the same name
    assert_eq!(output, "100\n");
    assert_eq!(env.lookup("x"), Some(number("6")));
    assert_eq!(env.lookup("a"), Some(number("100")));
}

#[test]
fn function_body_sees_globals_but_not_caller_locals() {
    assert_eq!(run_output("g = 10 f = function () ( g + 1 ) print f()"), "11\n");

    // A binding made inside one call is invisible to a callee
    let source = "inner = function () ( h ) outer = function () ( h = 5 inner() ) outer()";
    assert_eq!(run_error(source).kind, ErrorKind::UnboundName);
}

#[test]
fn call_results_come_from_last_body_statement() {
    let (_, env) = run_source("f = function () ( y = 7 ) x = f()").expect("program should run");
    assert_eq!(env.lookup("x"), Some(number("7")));
    // The call frame was discarded with the body's bindings
    assert_eq!(env.lookup("y"), None);

    // An empty body yields 0
    let (_, env) = run_source("f = function () () x = f()").expect("program should run");
    assert_eq!(env.lookup("x"), Some(number("0")));
}

#[test]
fn nested_calls_compose() {
    assert_eq!(run_output("f = function (a) ( a * 2 ) print f(f(2))"), "8\n");
}

#[test]
fn arguments_evaluate_left_to_right_in_caller_scope() {
    let source = "f = function (x, y) ( x - y ) print f(print 1, print 2)";
    assert_eq!(run_output(source), "1\n2\n-1\n");
}

#[test]
fn arity_mismatch_fails() {
    let source = "f = function (a) ( a ) f(1, 2)";
    assert_eq!(run_error(source).kind, ErrorKind::Arity);

    let source = "f = function (a) ( a ) f()";
    assert_eq!(run_error(source).kind, ErrorKind::Arity);
}

#[test]
fn calling_a_non_function_fails() {
    assert_eq!(run_error("x = 1 x(2)").kind, ErrorKind::Type);
    assert_eq!(run_error("f(1)").kind, ErrorKind::UnboundName);
}

#[test]
fn arithmetic_on_a_function_fails() {
    let source = "f = function () () f + 1";
    assert_eq!(run_error(source).kind, ErrorKind::Type);
}

#[test]
fn failed_call_does_not_leak_bindings() {
    let program = parse_source("f = function (a) ( b = 1 a / 0 ) f(1)").expect("should parse");
    let mut env = Environment::new();
    let mut evaluator = Evaluator::new(Vec::new());

    let error = evaluator.run(&program, &mut env).expect_err("should fail");
    assert_eq!(error.kind, ErrorKind::Arithmetic);
    assert_eq!(env.lookup("b"), None);

    // The environment stays usable: a later define lands in globals again
    env.define("b", number("2"));
    assert_eq!(env.lookup("b"), Some(number("2")));
}

#[test]
fn function_values_print_their_signature() {
    assert_eq!(run_output("f = function (a, b) ( a ) print f"), "function(a, b)\n");
}

#[test]
fn lexical_errors_carry_their_kind() {
    let error = parse_source("1 $ 2").expect_err("should fail to lex");
    assert_eq!(error.kind, ErrorKind::Lex);

    let error = parse_source("(1 + 2").expect_err("should fail to parse");
    assert_eq!(error.kind, ErrorKind::Parse);
}

#[test]
fn ast_dump_is_deterministic() {
    let program = parse_source("x = 1 + 2").expect("should parse");
    let first = format!("{}", program);
    let second = format!("{}", program);
    assert_eq!(first, second);
    assert!(first.contains("assign: x"));
    assert!(first.contains("binary: +"));
}
