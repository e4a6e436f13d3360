//! A tree-walk interpreter for a subset of the Lox language.
//!
//! See [Crafting Interpreters](https://craftinginterpreters.com/).
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - Only literals, unary and binary operators, `print` statements and expression statements
//! are supported.  There are no variables, control flow, functions or classes yet.
//! - The scanner recognizes the keywords of the full language, but the parser rejects the
//! constructs they introduce.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod diag;
pub mod eval;
pub mod interpreter;
pub mod token;

mod parser;
mod scanner;

pub use interpreter::{Interpreter, LoxError};
