use crate::ast::{BinaryOp, Expr, Program, Stmt};
use crate::error::{RillError, Span};
use crate::lexer::{Token, TokenType};
use crate::value::Value;
use rust_decimal::Decimal;

/// Recursive-descent parser. Grammar, lowest to highest precedence:
///
///   statement  -> IDENTIFIER "=" expression | expression
///   expression -> term
///   term       -> factor (("+" | "-") factor)*
///   factor     -> primary (("*" | "/") primary)*
///   primary    -> NUMBER
///               | "(" expression ")"
///               | IDENTIFIER "(" arguments ")"
///               | IDENTIFIER
///               | "print" expression
///               | "function" "(" parameters ")" "(" statement* ")"
///
/// Statements are separated by whitespace; a trailing ";" is allowed and
/// consumed. Statements accumulate into the Program in source order.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(&mut self) -> Result<Program, RillError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Stmt, RillError> {
        if self.check(&TokenType::Identifier) && self.check_next(&TokenType::Equal) {
            self.assignment()
        } else {
            self.expression_statement()
        }
    }

    fn assignment(&mut self) -> Result<Stmt, RillError> {
        let name_token = self.advance().clone();
        let equals = self.advance().clone(); // the '='

        if self.is_at_end() {
            return Err(RillError::parse_error_with_help(
                Span::single(equals.span.end),
                format!("Expected expression after '{} ='", name_token.lexeme),
                "Assignments need a value on the right-hand side. Example: x = 1 + 2".to_string(),
            ));
        }

        let expr = self.expression()?;

        // Semicolons are optional statement terminators
        if self.check(&TokenType::Semicolon) {
            self.advance();
        }

        let end_span = self.previous().span.end;

        Ok(Stmt::Assign {
            name: name_token.lexeme,
            expr,
            span: Span::new(name_token.span.start, end_span),
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, RillError> {
        let start_span = self.peek().span.start;
        let expr = self.expression()?;

        if self.check(&TokenType::Semicolon) {
            self.advance();
        }

        let end_span = self.previous().span.end;

        Ok(Stmt::Expression {
            expr,
            span: Span::new(start_span, end_span),
        })
    }

    fn expression(&mut self) -> Result<Expr, RillError> {
        self.term()
    }

    fn term(&mut self) -> Result<Expr, RillError> {
        let mut expr = self.factor()?;

        while self.match_types(&[TokenType::Minus, TokenType::Plus]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Minus => BinaryOp::Subtract,
                TokenType::Plus => BinaryOp::Add,
                _ => unreachable!(),
            };

            let start = expr.span().start;
            let right = self.factor().map_err(|_| {
                RillError::parse_error_with_help(
                    operator_token.span.clone(),
                    format!("Expected expression after '{}'", operator_token.lexeme),
                    "Arithmetic operators like '+' and '-' require expressions on both sides."
                        .to_string(),
                )
            })?;
            let end = right.span().end;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, RillError> {
        let mut expr = self.primary()?;

        while self.match_types(&[TokenType::Slash, TokenType::Star]) {
            let operator_token = self.previous().clone();
            let operator = match operator_token.token_type {
                TokenType::Slash => BinaryOp::Divide,
                TokenType::Star => BinaryOp::Multiply,
                _ => unreachable!(),
            };

            let start = expr.span().start;
            let right = self.primary().map_err(|_| {
                RillError::parse_error_with_help(
                    operator_token.span.clone(),
                    format!("Expected expression after '{}'", operator_token.lexeme),
                    "Multiplication and division operators require expressions on both sides."
                        .to_string(),
                )
            })?;
            let end = right.span().end;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
                span: Span::new(start, end),
            };
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, RillError> {
        if self.is_at_end() {
            return Err(RillError::parse_error_with_help(
                self.peek().span.clone(),
                "Unexpected end of input".to_string(),
                "Expected an expression here. Check for unmatched parentheses or incomplete statements.".to_string(),
            ));
        }

        let token = self.advance().clone();

        match token.token_type {
            TokenType::Number => {
                let value = token.lexeme.parse::<Decimal>().map_err(|_| {
                    RillError::parse_error(token.span.clone(), "Invalid number".to_string())
                })?;
                Ok(Expr::Literal {
                    value: Value::Number(value),
                    span: token.span,
                })
            }
            TokenType::Identifier => {
                if self.check(&TokenType::LeftParen) {
                    self.advance(); // consume the '('
                    self.finish_call(token)
                } else {
                    Ok(Expr::Variable {
                        name: token.lexeme,
                        span: token.span,
                    })
                }
            }
            TokenType::Print => {
                let expr = self.expression()?;
                let span = Span::new(token.span.start, expr.span().end);
                Ok(Expr::Print {
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenType::Function => self.function_literal(token.span),
            TokenType::LeftParen => {
                let start_span = token.span.clone();

                // Empty parentheses () are a syntax error in this language
                if self.check(&TokenType::RightParen) {
                    return Err(RillError::parse_error_with_help(
                        Span::new(start_span.start, self.peek().span.end),
                        "Empty parentheses are not allowed".to_string(),
                        "Parentheses must contain an expression. Example: (x + 1)".to_string(),
                    ));
                }

                let expr = self.expression()?;
                let end_token = self.consume_with_help(
                    TokenType::RightParen,
                    "Expected ')' after expression",
                    "Every opening parenthesis '(' must have a matching closing parenthesis ')'."
                        .to_string(),
                )?;
                let span = Span::new(start_span.start, end_token.span.end);
                Ok(Expr::Grouping {
                    expr: Box::new(expr),
                    span,
                })
            }
            _ => {
                let help_msg = match token.token_type {
                    TokenType::RightParen => {
                        "Found ')' without matching '('. Check for unbalanced parentheses."
                    }
                    TokenType::Equal => {
                        "Assignments must start with a variable name. Example: x = 1"
                    }
                    TokenType::Eof => "Reached end of input while expecting an expression.",
                    _ => "Expected a number, variable, call, print, function, or parenthesized expression here.",
                };

                Err(RillError::parse_error_with_help(
                    token.span,
                    format!("Expected expression, found '{}'", token.lexeme),
                    help_msg.to_string(),
                ))
            }
        }
    }

    /// Parse the argument list of `name(...)`; the identifier and opening
    /// parenthesis are already consumed.
    fn finish_call(&mut self, name_token: Token) -> Result<Expr, RillError> {
        let mut args = Vec::new();

        if !self.check(&TokenType::RightParen) {
            loop {
                args.push(self.expression()?);

                if !self.match_types(&[TokenType::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after arguments",
            "Function calls must be closed with ')' after the arguments. Example: f(1, 2)"
                .to_string(),
        )?;

        let span = Span::new(name_token.span.start, paren.span.end);
        Ok(Expr::Call {
            name: name_token.lexeme,
            args,
            span,
        })
    }

    /// Parse `function (params) ( statements )`; the `function` keyword is
    /// already consumed. The closing ')' of the body block is the explicit
    /// end marker of the function.
    fn function_literal(&mut self, keyword_span: Span) -> Result<Expr, RillError> {
        self.consume_with_help(
            TokenType::LeftParen,
            "Expected '(' after 'function'",
            "Function literals declare their parameters in parentheses. Example: function (a, b) ( a + b )".to_string(),
        )?;

        let mut params = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                let param = self.consume_with_help(
                    TokenType::Identifier,
                    "Expected parameter name",
                    "Function parameters must be identifiers separated by commas. Example: function (a, b) ( a + b )".to_string(),
                )?;
                params.push(param.lexeme.clone());

                if !self.match_types(&[TokenType::Comma]) {
                    break;
                }
            }
        }

        self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after parameters",
            "The parameter list must be closed with ')'. Example: function (a, b) ( a + b )"
                .to_string(),
        )?;

        self.consume_with_help(
            TokenType::LeftParen,
            "Expected '(' before function body",
            "The function body is a parenthesized block of statements. Example: function (a) ( a + 1 )".to_string(),
        )?;

        let mut body = Vec::new();
        while !self.check(&TokenType::RightParen) && !self.is_at_end() {
            body.push(self.statement()?);
        }

        let end_token = self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after function body",
            "The function body must be closed with ')' after its statements.".to_string(),
        )?;

        let span = Span::new(keyword_span.start, end_token.span.end);
        Ok(Expr::Literal {
            value: Value::Function { params, body },
            span,
        })
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            &self.peek().token_type == token_type
        }
    }

    fn check_next(&self, token_type: &TokenType) -> bool {
        self.tokens
            .get(self.current + 1)
            .map_or(false, |token| &token.token_type == token_type)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume_with_help(
        &mut self,
        token_type: TokenType,
        message: &str,
        help: String,
    ) -> Result<&Token, RillError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            // Point at the unexpected token, or just past the last real one
            let error_span = if self.is_at_end() && self.current > 0 {
                let last_token = &self.tokens[self.current - 1];
                Span::single(last_token.span.end)
            } else {
                self.peek().span.clone()
            };

            Err(RillError::parse_error_with_help(
                error_span,
                message.to_string(),
                help,
            ))
        }
    }
}
