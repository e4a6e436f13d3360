use std::fmt;
use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::trace;

use crate::ast::{BinaryOp, Expr, ExprVisitor, Literal, Operator, Stmt, StmtVisitor, UnaryOp};
use crate::diag::Position;

/// Result of evaluating an expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// `nil` and `false` are falsey, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(_) | Value::String(_) => true,
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Value {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            // Integral values print without a fractional part.
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

/// Errors raised while evaluating.  Carry the line of the faulty operator.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Operand must be a number.\n[line {pos}]")]
    OperandNotNumber { pos: Position },

    #[error("Operands must be numbers.\n[line {pos}]")]
    OperandsNotNumbers { pos: Position },

    #[error("Operands must be two numbers or two strings.\n[line {pos}]")]
    OperandsNotAddable { pos: Position },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Tree-walking evaluator.  `print` output goes to the injected writer.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
}

impl<'t, W: Write> Evaluator<'t, W> {
    pub fn new(output: &'t mut W) -> Evaluator<'t, W> {
        Evaluator { output }
    }

    /// Execute statements in order, stopping at the first runtime error.
    pub fn execute(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            trace!(%stmt, "executing");
            stmt.accept(self)?;
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        expr.accept(self)
    }

    /// Write a value the way `print` does.
    pub fn print(&mut self, value: &Value) -> Result<(), RuntimeError> {
        writeln!(self.output, "{}", value)?;
        Ok(())
    }
}

fn numbers(lhs: Value, rhs: Value, pos: Position) -> Result<(f64, f64), RuntimeError> {
    match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        _ => Err(RuntimeError::OperandsNotNumbers { pos }),
    }
}

impl<W: Write> ExprVisitor<Result<Value, RuntimeError>> for Evaluator<'_, W> {
    fn visit_literal(&mut self, literal: &Literal) -> Result<Value, RuntimeError> {
        Ok(Value::from(literal))
    }

    fn visit_grouping(&mut self, inner: &Expr) -> Result<Value, RuntimeError> {
        self.evaluate(inner)
    }

    fn visit_unary(
        &mut self,
        op: &Operator<UnaryOp>,
        operand: &Expr,
    ) -> Result<Value, RuntimeError> {
        let value = self.evaluate(operand)?;
        match op.kind {
            UnaryOp::Neg => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::OperandNotNumber { pos: op.pos }),
            },
            UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }

    fn visit_binary(
        &mut self,
        lhs: &Expr,
        op: &Operator<BinaryOp>,
        rhs: &Expr,
    ) -> Result<Value, RuntimeError> {
        let l = self.evaluate(lhs)?;
        let r = self.evaluate(rhs)?;
        let pos = op.pos;
        let value = match op.kind {
            BinaryOp::Add => match (l, r) {
                (Value::Number(l), Value::Number(r)) => Value::Number(l + r),
                (Value::String(l), Value::String(r)) => Value::String(l + &r),
                _ => return Err(RuntimeError::OperandsNotAddable { pos }),
            },
            BinaryOp::Sub => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Number(l - r)
            }
            BinaryOp::Mul => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Number(l * r)
            }
            BinaryOp::Div => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Number(l / r)
            }
            BinaryOp::Less => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Bool(l < r)
            }
            BinaryOp::LessEqual => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Bool(l <= r)
            }
            BinaryOp::Greater => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Bool(l > r)
            }
            BinaryOp::GreaterEqual => {
                let (l, r) = numbers(l, r, pos)?;
                Value::Bool(l >= r)
            }
            // Values of different types are never equal.
            BinaryOp::Equal => Value::Bool(l == r),
            BinaryOp::NotEqual => Value::Bool(l != r),
        };
        Ok(value)
    }
}

impl<W: Write> StmtVisitor<Result<(), RuntimeError>> for Evaluator<'_, W> {
    fn visit_expr_stmt(&mut self, expr: &Expr) -> Result<(), RuntimeError> {
        self.evaluate(expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, expr: &Expr) -> Result<(), RuntimeError> {
        let value = self.evaluate(expr)?;
        self.print(&value)
    }
}
