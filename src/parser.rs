//! Recursive descent parser.
//!
//! Grammar, from lowest to highest precedence:
//!
//! ```text
//! program    → statement* EOF
//! statement  → "print" expression ";" | expression ";"
//! expression → equality
//! equality   → comparison ( ( "!=" | "==" ) comparison )*
//! comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
//! term       → factor ( ( "-" | "+" ) factor )*
//! factor     → unary ( ( "/" | "*" ) unary )*
//! unary      → ( "!" | "-" ) unary | primary
//! primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
//! ```

use std::mem;

use tracing::debug;

use crate::ast::{BinaryOp, Expr, Literal, Operator, Stmt, UnaryOp};
use crate::diag::{SyntaxError, SyntaxErrors};
use crate::scanner::Scanner;
use crate::token::{Lexeme, Token};

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest nesting of groupings and unary operators accepted in one expression.
const MAX_NESTING: usize = 255;

/// Pulls lexemes from a `Scanner` on demand and builds the syntax tree.
///
/// Errors are collected rather than returned on first sight: after a bad statement the parser
/// skips to the next statement boundary and keeps going, so a single pass reports every
/// independent mistake.
#[derive(Debug)]
pub struct Parser<'s> {
    scanner: Scanner<'s>,
    current: Lexeme,
    previous: Lexeme,
    errors: Vec<SyntaxError>,
    nesting: usize,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Parser<'s> {
        Parser {
            scanner: Scanner::new(source),
            current: Lexeme::eof(1), // we haven't scanned anything yet
            previous: Lexeme::eof(1),
            errors: vec![],
            nesting: 0,
        }
    }

    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, SyntaxErrors> {
        let mut prg = vec![];
        self.advance();
        while self.current.token != Token::Eof {
            match self.statement() {
                Ok(stmt) => prg.push(stmt),
                Err(e) => {
                    debug!(line = e.pos, "{}, resynchronizing", e.message);
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }
        debug!(
            statements = prg.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        self.finish(prg)
    }

    /// Parse input consisting of exactly one expression.
    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxErrors> {
        self.advance();
        let parsed = self.expression().and_then(|expr| {
            if self.current.token == Token::Eof {
                Ok(expr)
            } else {
                Err(self.error_at_current("Expect end of expression."))
            }
        });
        match parsed {
            Ok(expr) => self.finish(expr),
            Err(e) => {
                self.errors.push(e);
                self.finish(Expr::Literal(Literal::Nil))
            }
        }
    }

    fn finish<T>(&mut self, parsed: T) -> Result<T, SyntaxErrors> {
        if self.errors.is_empty() {
            Ok(parsed)
        } else {
            Err(SyntaxErrors(mem::take(&mut self.errors)))
        }
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.current.token {
            Token::Print => {
                self.advance();
                let expr = Box::new(self.expression()?);
                self.consume(Token::Semicolon, "Expect ';' after value.")?;
                Ok(Stmt::Print(expr))
            }
            _ => {
                let expr = Box::new(self.expression()?);
                self.consume(Token::Semicolon, "Expect ';' after expression.")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;
        loop {
            let kind = match self.current.token {
                Token::EqualEqual => BinaryOp::Equal,
                Token::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            let op = self.operator(kind);
            expr = Expr::Binary(Box::new(expr), op, Box::new(self.comparison()?));
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        loop {
            let kind = match self.current.token {
                Token::Less => BinaryOp::Less,
                Token::LessEqual => BinaryOp::LessEqual,
                Token::Greater => BinaryOp::Greater,
                Token::GreaterEqual => BinaryOp::GreaterEqual,
                _ => break,
            };
            let op = self.operator(kind);
            expr = Expr::Binary(Box::new(expr), op, Box::new(self.term()?));
        }
        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        loop {
            let kind = match self.current.token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            let op = self.operator(kind);
            expr = Expr::Binary(Box::new(expr), op, Box::new(self.factor()?));
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;
        loop {
            let kind = match self.current.token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            let op = self.operator(kind);
            expr = Expr::Binary(Box::new(expr), op, Box::new(self.unary()?));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let kind = match self.current.token {
            Token::Minus => UnaryOp::Neg,
            Token::Bang => UnaryOp::Not,
            _ => return self.primary(),
        };
        let op = self.operator(kind);
        let operand = self.nested(Self::unary)?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.current.token == Token::LeftParen {
            self.advance();
            let expr = self.nested(Self::expression)?;
            self.consume(Token::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        let literal = match &self.current.token {
            Token::False => Literal::Bool(false),
            Token::True => Literal::Bool(true),
            Token::Nil => Literal::Nil,
            Token::Number(n) => Literal::Number(*n),
            Token::String(s) => Literal::String(s.clone()),
            _ => return Err(self.error_at_current("Expect expression.")),
        };
        self.advance();
        Ok(Expr::Literal(literal))
    }

    /// Parse a sub-expression one level deeper, bailing out before the tree gets deep enough
    /// to exhaust the stack of the parser or of the tree walkers.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error_at_current("Too much nesting."));
        }
        self.nesting += 1;
        let parsed = parse(self);
        self.nesting -= 1;
        parsed
    }

    /// Consume the current token as an operator of the given kind.
    fn operator<K>(&mut self, kind: K) -> Operator<K> {
        let pos = self.current.line;
        self.advance();
        Operator::new(kind, pos)
    }

    /// Move to the next lexeme, recording any scanner error met on the way.
    fn advance(&mut self) {
        loop {
            match self.scanner.get_token() {
                Ok(lexeme) => {
                    self.previous = mem::replace(&mut self.current, lexeme);
                    return;
                }
                Err(e) => self.errors.push(e),
            }
        }
    }

    fn consume(&mut self, expected: Token, message: &str) -> ParseResult<()> {
        if self.current.token == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error_at_current(message))
        }
    }

    fn error_at_current(&self, message: &str) -> SyntaxError {
        SyntaxError::at_lexeme(&self.current, message)
    }

    /// Discard lexemes until the probable start of the next statement.
    fn synchronize(&mut self) {
        self.advance();
        while self.current.token != Token::Eof {
            if self.previous.token == Token::Semicolon || self.current.token.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}
