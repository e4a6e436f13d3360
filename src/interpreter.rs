//! API to control the interpreter.

use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::debug;

use crate::ast::{Expr, Stmt};
use crate::diag::SyntaxErrors;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::Parser;
use crate::token::Lexeme;

/// Tree-walk interpreter.
///
/// # Example
///
/// Invoke the interpreter several times on the same output:
///
/// ```
/// # use treelox::interpreter::{Interpreter, LoxError};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.run("print 1 + 2 * 3;")?;
/// interp.run(r#"print "tree" + "lox";"#)?;
/// interp.run_line("-(4 - 6)")?;
///
/// assert_eq!(output, b"7\ntreelox\n2\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
#[derive(Debug, Error)]
pub enum LoxError {
    /// Errors found during lexical or syntactic analysis.  Nothing was executed.
    #[error("{0}")]
    Syntax(#[from] SyntaxErrors),

    /// Error occurring during evaluation.
    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    /// Failure to read the program text.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

impl LoxError {
    /// Process exit status for this error, following `sysexits.h`.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Syntax(_) => 65,
            LoxError::Runtime(RuntimeError::Io(_)) | LoxError::Io(_) => 74,
            LoxError::Runtime(_) => 70,
        }
    }
}

impl<'t, W: Write> Interpreter<'t, W> {
    pub fn new(output: &'t mut W) -> Interpreter<'t, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
        }
    }

    /// Run a whole program.  Nothing is executed if it contains any syntax error.
    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let prg = parse(source)?;
        debug!(statements = prg.len(), "running program");
        self.evaluator.execute(&prg)?;
        Ok(())
    }

    /// Read a whole program from `input` and run it.
    pub fn eval<R: Read>(&mut self, mut input: R) -> Result<(), LoxError> {
        let mut source = String::new();
        input.read_to_string(&mut source)?;
        self.run(&source)
    }

    /// Run one line typed at the prompt.
    ///
    /// The line is a program in its own right, but a lone expression without the trailing `;`
    /// is also accepted: its value gets printed.
    pub fn run_line(&mut self, line: &str) -> Result<(), LoxError> {
        let errors = match parse(line) {
            Ok(prg) => {
                self.evaluator.execute(&prg)?;
                return Ok(());
            }
            Err(errors) => errors,
        };
        // Report the errors of the program form, they are the more helpful ones.
        let expr = parse_expression(line).map_err(|_| errors)?;
        debug!(%expr, "evaluating bare expression");
        let value = self.evaluator.evaluate(&expr)?;
        self.evaluator.print(&value)?;
        Ok(())
    }
}

/// Scan all of `source` into lexemes, ending with [`Token::Eof`](crate::token::Token::Eof).
///
/// Lexical errors do not stop the scan: the lexemes around them are returned along with the
/// errors, which may be empty.
pub fn scan(source: &str) -> (Vec<Lexeme>, SyntaxErrors) {
    let (lexemes, errors) = crate::scanner::scan(source);
    (lexemes, errors.into())
}

/// Parse `source` as a program.
pub fn parse(source: &str) -> Result<Vec<Stmt>, SyntaxErrors> {
    Parser::new(source).parse_program()
}

/// Parse `source` as a single expression.
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxErrors> {
    Parser::new(source).parse_expression()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(input: &str) -> Result<String, LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        interp.run(input)?;
        let output = String::from_utf8(raw_output).expect("cannot convert output to string");
        Ok(output)
    }

    fn interpret_line(input: &str) -> Result<String, LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        Interpreter::new(&mut raw_output).run_line(input)?;
        Ok(String::from_utf8(raw_output).expect("cannot convert output to string"))
    }

    #[test]
    fn print_expr() -> Result<(), LoxError> {
        assert_eq!(interpret("print 3*2;")?, "6\n");
        Ok(())
    }

    #[test]
    fn print_several_values() -> Result<(), LoxError> {
        assert_eq!(
            interpret("print nil; print !nil; print 1.5; print \"s\";")?,
            "nil\ntrue\n1.5\ns\n"
        );
        Ok(())
    }

    #[test]
    fn grouping_changes_evaluation_order() -> Result<(), LoxError> {
        assert_eq!(interpret("print (1 + 2) * 3; print 1 + 2 * 3;")?, "9\n7\n");
        Ok(())
    }

    #[test]
    fn expression_statement_output_nothing() -> Result<(), LoxError> {
        assert_eq!(interpret("1 + 2; \"unused\";")?, "");
        Ok(())
    }

    #[test]
    fn syntax_error_prevents_execution() {
        let mut raw_output: Vec<u8> = Vec::new();
        let result = Interpreter::new(&mut raw_output).run("print 1; print ;");
        match result {
            Err(e @ LoxError::Syntax(_)) => {
                assert_eq!(e.exit_code(), 65);
                assert_eq!(e.to_string(), "[line 1] Error at ';': Expect expression.");
            }
            r => panic!("unexpected output: {:?}", r),
        }
        assert!(raw_output.is_empty());
    }

    #[test]
    fn runtime_error_keeps_earlier_output() {
        let mut raw_output: Vec<u8> = Vec::new();
        let result = Interpreter::new(&mut raw_output).run("print 1;\nprint -\"a\";\nprint 2;");
        match result {
            Err(e @ LoxError::Runtime(_)) => {
                assert_eq!(e.exit_code(), 70);
                assert_eq!(e.to_string(), "Operand must be a number.\n[line 2]");
            }
            r => panic!("unexpected output: {:?}", r),
        }
        assert_eq!(raw_output, b"1\n");
    }

    #[test]
    fn eval_reads_program_from_reader() -> Result<(), LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        Interpreter::new(&mut raw_output).eval("print 2 >= 1;".as_bytes())?;
        assert_eq!(raw_output, b"true\n");
        Ok(())
    }

    #[test]
    fn line_with_statement() -> Result<(), LoxError> {
        assert_eq!(interpret_line("print 1;")?, "1\n");
        assert_eq!(interpret_line("1;")?, "");
        Ok(())
    }

    #[test]
    fn line_with_bare_expression_prints_value() -> Result<(), LoxError> {
        assert_eq!(interpret_line("1 + 1")?, "2\n");
        assert_eq!(interpret_line("\"a\" == \"a\"")?, "true\n");
        Ok(())
    }

    #[test]
    fn bad_line_reports_program_errors() {
        match interpret_line("1 +") {
            Err(LoxError::Syntax(errors)) => assert_eq!(
                errors.to_string(),
                "[line 1] Error at end: Expect expression."
            ),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[derive(Debug)]
    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_print_is_an_io_error() {
        let mut output = ClosedOutput;
        match Interpreter::new(&mut output).run("print 1;") {
            Err(e @ LoxError::Runtime(RuntimeError::Io(_))) => assert_eq!(e.exit_code(), 74),
            r => panic!("unexpected output: {:?}", r),
        }
    }

    #[test]
    fn scan_keeps_lexemes_around_errors() {
        let (lexemes, errors) = scan("1 $ 2");
        assert_eq!(lexemes.len(), 3);
        assert_eq!(errors.to_string(), "[line 1] Error: Unexpected character $.");

        let (lexemes, errors) = scan("print ;");
        assert_eq!(lexemes.len(), 3);
        assert!(errors.is_empty());
    }
}
