use std::fmt;

use crate::diag::Position;

/// "Words" produced by `Scanner`.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,

    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier(String),
    String(String),
    Number(f64),

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,
}

const KEYWORDS: [(&str, Token); 16] = [
    ("and", Token::And),
    ("class", Token::Class),
    ("else", Token::Else),
    ("false", Token::False),
    ("for", Token::For),
    ("fun", Token::Fun),
    ("if", Token::If),
    ("nil", Token::Nil),
    ("or", Token::Or),
    ("print", Token::Print),
    ("return", Token::Return),
    ("super", Token::Super),
    ("this", Token::This),
    ("true", Token::True),
    ("var", Token::Var),
    ("while", Token::While),
];

/// Return the token associated with `name` if it is a reserved word.
pub fn keyword(name: &str) -> Option<Token> {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == name)
        .map(|(_, token)| token.clone())
}

impl Token {
    /// Upper-case name of the token kind, payload excluded.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Eof => "EOF",
            Token::LeftParen => "LEFT_PAREN",
            Token::RightParen => "RIGHT_PAREN",
            Token::LeftBrace => "LEFT_BRACE",
            Token::RightBrace => "RIGHT_BRACE",
            Token::Comma => "COMMA",
            Token::Dot => "DOT",
            Token::Minus => "MINUS",
            Token::Plus => "PLUS",
            Token::Semicolon => "SEMICOLON",
            Token::Slash => "SLASH",
            Token::Star => "STAR",
            Token::Bang => "BANG",
            Token::BangEqual => "BANG_EQUAL",
            Token::Equal => "EQUAL",
            Token::EqualEqual => "EQUAL_EQUAL",
            Token::Greater => "GREATER",
            Token::GreaterEqual => "GREATER_EQUAL",
            Token::Less => "LESS",
            Token::LessEqual => "LESS_EQUAL",
            Token::Identifier(_) => "IDENTIFIER",
            Token::String(_) => "STRING",
            Token::Number(_) => "NUMBER",
            Token::And => "AND",
            Token::Class => "CLASS",
            Token::Else => "ELSE",
            Token::False => "FALSE",
            Token::Fun => "FUN",
            Token::For => "FOR",
            Token::If => "IF",
            Token::Nil => "NIL",
            Token::Or => "OR",
            Token::Print => "PRINT",
            Token::Return => "RETURN",
            Token::Super => "SUPER",
            Token::This => "THIS",
            Token::True => "TRUE",
            Token::Var => "VAR",
            Token::While => "WHILE",
        }
    }

    /// Tokens a statement can start with.  The parser resynchronizes on them after an error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            Token::Class
                | Token::Fun
                | Token::Var
                | Token::For
                | Token::If
                | Token::While
                | Token::Print
                | Token::Return
        )
    }
}

/// A token together with the source text it was scanned from.
#[derive(Debug, PartialEq, Clone)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    pub line: Position,
}

impl Lexeme {
    pub fn new(token: Token, text: impl Into<String>, line: Position) -> Lexeme {
        Lexeme {
            token,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: Position) -> Lexeme {
        Lexeme::new(Token::Eof, "", line)
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.token.name(), self.text)?;
        match &self.token {
            Token::String(s) => write!(f, "{}", s),
            Token::Number(n) => write!(f, "{:?}", n),
            _ => write!(f, "null"),
        }
    }
}
