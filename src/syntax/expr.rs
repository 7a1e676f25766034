use std::{fmt, mem};

use rust_decimal::Decimal;

use super::{token::Operator, ParamIndex};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Constant(Decimal),
    Ref {
        index: ParamIndex,
    },
    Binary {
        lhs: Box<Expression>,
        op: Operator,
        rhs: Box<Expression>,
    },
    Unary {
        op: Operator,
        operand: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(lhs: Expression, op: Operator, rhs: Expression) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: Operator, operand: Expression) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Renders the tree with parameter names substituted for indices.
    pub fn display<'a>(&'a self, params: &'a [String]) -> Infix<'a> {
        Infix { expr: self, params }
    }
}

/// Fully parenthesised infix rendering of an [`Expression`].
pub struct Infix<'a> {
    expr: &'a Expression,
    params: &'a [String],
}

enum Piece<'a> {
    Expr(&'a Expression),
    Op(Operator),
    Text(&'static str),
}

impl fmt::Display for Infix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut work = vec![Piece::Expr(self.expr)];

        while let Some(piece) = work.pop() {
            match piece {
                Piece::Text(s) => f.write_str(s)?,
                Piece::Op(op) => write!(f, " {op} ")?,
                Piece::Expr(Expression::Constant(v)) => write!(f, "{v}")?,
                Piece::Expr(Expression::Ref { index }) => match self.params.get(*index) {
                    Some(name) => write!(f, "{name}")?,
                    None => write!(f, "${index}")?,
                },
                Piece::Expr(Expression::Binary { lhs, op, rhs }) => {
                    work.push(Piece::Text(")"));
                    work.push(Piece::Expr(&**rhs));
                    work.push(Piece::Op(*op));
                    work.push(Piece::Expr(&**lhs));
                    work.push(Piece::Text("("));
                }
                Piece::Expr(Expression::Unary { op, operand }) => {
                    write!(f, "{op}")?;
                    work.push(Piece::Expr(&**operand));
                }
            }
        }

        Ok(())
    }
}

impl Expression {
    fn take_children(&mut self, out: &mut Vec<Expression>) {
        let leaf = || Expression::Constant(Decimal::ZERO);
        match self {
            Expression::Binary { lhs, rhs, .. } => {
                out.push(mem::replace(&mut **lhs, leaf()));
                out.push(mem::replace(&mut **rhs, leaf()));
            }
            Expression::Unary { operand, .. } => out.push(mem::replace(&mut **operand, leaf())),
            Expression::Constant(_) | Expression::Ref { .. } => (),
        }
    }
}

// Unlinks children before they drop so deep trees don't recurse.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = vec![];
        self.take_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}
