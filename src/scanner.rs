//! Lexical analyzer

use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use crate::diag::{Position, SyntaxError};
use crate::token::{keyword, Lexeme, Token};

/// Turn source text into a sequence of lexemes.
#[derive(Debug, Clone)]
pub struct Scanner<'s> {
    source: &'s str,
    input: Peekable<CharIndices<'s>>,
    line: Position,

    // Byte offset of the first character of the lexeme being scanned.
    start: usize,
}

impl<'s> Scanner<'s> {
    /// Creates a new scanner operating on `source`.
    pub fn new(source: &'s str) -> Scanner<'s> {
        Scanner {
            source,
            input: source.char_indices().peekable(),
            line: 1,
            start: 0,
        }
    }

    /// Scan next lexeme and return it.
    ///
    /// On error the offending input is skipped so the next call resumes scanning after it.
    /// Returns `Token::Eof` forever once the input is exhausted.
    pub fn get_token(&mut self) -> Result<Lexeme, SyntaxError> {
        loop {
            self.start = self.offset();
            let ch = match self.advance() {
                None => return Ok(Lexeme::eof(self.line)),
                Some(ch) => ch,
            };
            let token = match ch {
                '\n' => {
                    self.line += 1;
                    continue;
                }
                ' ' | '\t' | '\r' => continue,
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '{' => Token::LeftBrace,
                '}' => Token::RightBrace,
                ',' => Token::Comma,
                '.' => Token::Dot,
                '-' => Token::Minus,
                '+' => Token::Plus,
                ';' => Token::Semicolon,
                '*' => Token::Star,
                '!' => self.either('=', Token::BangEqual, Token::Bang),
                '=' => self.either('=', Token::EqualEqual, Token::Equal),
                '<' => self.either('=', Token::LessEqual, Token::Less),
                '>' => self.either('=', Token::GreaterEqual, Token::Greater),
                '/' => {
                    if self.peek() == Some('/') {
                        self.skip_comment();
                        continue;
                    }
                    Token::Slash
                }
                '"' => self.scan_string()?,
                '0'..='9' => self.scan_number()?,
                'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(),
                _ => {
                    let message = format!("Unexpected character {}.", ch);
                    return Err(SyntaxError::at_line(self.line, message));
                }
            };
            return Ok(Lexeme::new(token, self.text(), self.line));
        }
    }

    fn either(&mut self, expected: char, matched: Token, otherwise: Token) -> Token {
        if self.peek() == Some(expected) {
            self.advance();
            matched
        } else {
            otherwise
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn scan_string(&mut self) -> Result<Token, SyntaxError> {
        loop {
            match self.advance() {
                None => return Err(SyntaxError::at_line(self.line, "Unterminated string.")),
                Some('"') => break,
                Some('\n') => self.line += 1,
                Some(_) => (),
            }
        }
        // Trim the surrounding quotes.
        let text = self.text();
        Ok(Token::String(text[1..text.len() - 1].to_string()))
    }

    fn scan_number(&mut self) -> Result<Token, SyntaxError> {
        self.skip_digits();
        // A fractional part needs at least one digit after the dot.
        if self.peek() == Some('.') && self.peek_next().map_or(false, |ch| ch.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
        }

        let text = self.text();
        text.parse::<f64>().map(Token::Number).map_err(|_| {
            SyntaxError::at_line(self.line, format!("Invalid number literal '{}'.", text))
        })
    }

    fn skip_digits(&mut self) {
        while self.peek().map_or(false, |ch| ch.is_ascii_digit()) {
            self.advance();
        }
    }

    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .map_or(false, |ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            self.advance();
        }

        let text = self.text();
        keyword(text).unwrap_or_else(|| Token::Identifier(text.to_string()))
    }

    fn advance(&mut self) -> Option<char> {
        self.input.next().map(|(_, ch)| ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.input.peek().map(|&(_, ch)| ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut lookahead = self.input.clone();
        lookahead.next();
        lookahead.next().map(|(_, ch)| ch)
    }

    /// Byte offset of the next unscanned character.
    fn offset(&mut self) -> usize {
        let len = self.source.len();
        self.input.peek().map_or(len, |&(i, _)| i)
    }

    /// Source text of the lexeme being scanned.
    fn text(&mut self) -> &'s str {
        let end = self.offset();
        &self.source[self.start..end]
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Lexeme, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok(Lexeme {
                token: Token::Eof, ..
            }) => None,
            r => Some(r),
        }
    }
}

/// Scan all of `source`.
///
/// The returned lexemes always end with `Token::Eof`; errors do not stop the scan.
pub fn scan(source: &str) -> (Vec<Lexeme>, Vec<SyntaxError>) {
    let mut scanner = Scanner::new(source);
    let mut lexemes = vec![];
    let mut errors = vec![];
    loop {
        match scanner.get_token() {
            Ok(lexeme) if lexeme.token == Token::Eof => {
                lexemes.push(lexeme);
                break;
            }
            Ok(lexeme) => lexemes.push(lexeme),
            Err(e) => errors.push(e),
        }
    }
    debug!(
        lexemes = lexemes.len(),
        errors = errors.len(),
        "scanned source"
    );
    (lexemes, errors)
}
