//! Syntax tree produced by the parser and walked by the evaluator.

use std::fmt;

use crate::diag::Position;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Expr(Box<Expr>),
    Print(Box<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(Literal),
    Grouping(Box<Expr>),
    Unary(Operator<UnaryOp>, Box<Expr>),
    Binary(Box<Expr>, Operator<BinaryOp>, Box<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

/// An operator and the line it appeared on, kept for runtime error reports.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Operator<K> {
    pub kind: K,
    pub pos: Position,
}

impl<K> Operator<K> {
    pub fn new(kind: K, pos: Position) -> Operator<K> {
        Operator { kind, pos }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
        };
        write!(f, "{}", symbol)
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal(&mut self, literal: &Literal) -> T;
    fn visit_grouping(&mut self, inner: &Expr) -> T;
    fn visit_unary(&mut self, op: &Operator<UnaryOp>, operand: &Expr) -> T;
    fn visit_binary(&mut self, lhs: &Expr, op: &Operator<BinaryOp>, rhs: &Expr) -> T;
}

pub trait StmtVisitor<T> {
    fn visit_expr_stmt(&mut self, expr: &Expr) -> T;
    fn visit_print_stmt(&mut self, expr: &Expr) -> T;
}

impl Expr {
    pub fn accept<T, V: ExprVisitor<T>>(&self, visitor: &mut V) -> T {
        match self {
            Expr::Literal(literal) => visitor.visit_literal(literal),
            Expr::Grouping(inner) => visitor.visit_grouping(inner),
            Expr::Unary(op, operand) => visitor.visit_unary(op, operand),
            Expr::Binary(lhs, op, rhs) => visitor.visit_binary(lhs, op, rhs),
        }
    }
}

impl Stmt {
    pub fn accept<T, V: StmtVisitor<T>>(&self, visitor: &mut V) -> T {
        match self {
            Stmt::Expr(expr) => visitor.visit_expr_stmt(expr),
            Stmt::Print(expr) => visitor.visit_print_stmt(expr),
        }
    }
}

/// Renders trees in fully parenthesized prefix notation, e.g. `(* (- 123.0) (group 45.67))`.
#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = String::with_capacity(2 + name.len() + exprs.len() * 4);
        out.push('(');
        out.push_str(name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&expr.accept(self));
        }
        out.push(')');
        out
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal(&mut self, literal: &Literal) -> String {
        match literal {
            Literal::Nil => "nil".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Number(n) => format!("{:?}", n),
            Literal::String(s) => s.clone(),
        }
    }

    fn visit_grouping(&mut self, inner: &Expr) -> String {
        self.parenthesize("group", &[inner])
    }

    fn visit_unary(&mut self, op: &Operator<UnaryOp>, operand: &Expr) -> String {
        self.parenthesize(&op.kind.to_string(), &[operand])
    }

    fn visit_binary(&mut self, lhs: &Expr, op: &Operator<BinaryOp>, rhs: &Expr) -> String {
        self.parenthesize(&op.kind.to_string(), &[lhs, rhs])
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_expr_stmt(&mut self, expr: &Expr) -> String {
        self.parenthesize("expr", &[expr])
    }

    fn visit_print_stmt(&mut self, expr: &Expr) -> String {
        self.parenthesize("print", &[expr])
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.accept(&mut AstPrinter))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.accept(&mut AstPrinter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(Literal::Number(n)))
    }

    #[test]
    fn print_nested_expression() {
        let expr = Expr::Binary(
            Box::new(Expr::Unary(Operator::new(UnaryOp::Neg, 1), number(123.0))),
            Operator::new(BinaryOp::Mul, 1),
            Box::new(Expr::Grouping(number(45.67))),
        );
        assert_eq!(expr.to_string(), "(* (- 123.0) (group 45.67))");
    }

    #[test]
    fn print_literals() {
        assert_eq!(Expr::Literal(Literal::Nil).to_string(), "nil");
        assert_eq!(Expr::Literal(Literal::Bool(false)).to_string(), "false");
        assert_eq!(
            Expr::Literal(Literal::String("hi".to_string())).to_string(),
            "hi"
        );
    }

    #[test]
    fn print_statements() {
        let sum = Box::new(Expr::Binary(
            number(1.0),
            Operator::new(BinaryOp::Add, 1),
            number(2.0),
        ));
        assert_eq!(Stmt::Print(sum.clone()).to_string(), "(print (+ 1.0 2.0))");
        assert_eq!(Stmt::Expr(sum).to_string(), "(expr (+ 1.0 2.0))");
    }

    #[test]
    fn print_comparison_and_not() {
        let expr = Expr::Unary(
            Operator::new(UnaryOp::Not, 1),
            Box::new(Expr::Binary(
                number(1.0),
                Operator::new(BinaryOp::GreaterEqual, 1),
                number(2.0),
            )),
        );
        assert_eq!(expr.to_string(), "(! (>= 1.0 2.0))");
    }
}
