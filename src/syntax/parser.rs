use rust_decimal::Decimal;

use crate::error::ParseError;

use super::{
    expr::Expression,
    lexer::Lexer,
    number::NumberFormat,
    scope::ParamList,
    token::{Assoc, Operator, Token},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Op(Operator),
    LParen,
}

/// Result of a successful parse: the tree root and its parameter names in
/// binding order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Parsed {
    pub root: Expression,
    pub params: Vec<String>,
}

/// Two-stack shunting-yard parser. One instance parses one expression.
pub(crate) struct Parser<'src> {
    src: &'src str,
    lexer: Lexer<'src>,
    operands: Vec<Expression>,
    operators: Vec<Pending>,
    params: ParamList<'src>,
    expect_operand: bool,
}

fn malformed(msg: impl Into<String>) -> ParseError {
    ParseError::MalformedExpression(msg.into())
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str, format: NumberFormat) -> Self {
        Self {
            src,
            lexer: Lexer::new(src, format),
            operands: vec![],
            operators: vec![],
            params: ParamList::new(),
            expect_operand: true,
        }
    }

    pub fn parse(mut self) -> Result<Parsed, ParseError> {
        let mut empty = true;

        while let Some((off, token)) = self.lexer.next() {
            empty = false;
            self.shift(off, token)?;
        }

        if empty {
            return Ok(Parsed {
                root: Expression::Constant(Decimal::ZERO),
                params: vec![],
            });
        }

        if self.expect_operand {
            return Err(malformed("unexpected end of expression, expected an operand"));
        }

        while let Some(pending) = self.operators.pop() {
            match pending {
                Pending::Op(op) => self.reduce(op)?,
                Pending::LParen => return Err(malformed("unclosed `(`")),
            }
        }

        let root = self
            .operands
            .pop()
            .ok_or_else(|| malformed("expression has no operand"))?;
        if !self.operands.is_empty() {
            return Err(malformed(format!(
                "{} operands left without an operator",
                self.operands.len() + 1
            )));
        }

        log::debug!(
            "parsed `{}` with {} parameter(s)",
            self.src,
            self.params.len()
        );

        Ok(Parsed {
            root,
            params: self.params.into_names(),
        })
    }

    fn shift(&mut self, off: usize, token: Token<'src>) -> Result<(), ParseError> {
        match token {
            Token::Invalid(ch) => Err(ParseError::InvalidCharacter {
                ch,
                position: off,
                expression: self.src.to_owned(),
            }),
            Token::BadNumber(s) => Err(malformed(format!(
                "invalid number `{s}` at position {off}"
            ))),
            Token::Number(v) => {
                self.check_operand_position(off)?;
                self.push_operand(Expression::Constant(v));
                Ok(())
            }
            Token::Id(id) => {
                self.check_operand_position(off)?;
                let index = self.params.resolve(id);
                self.push_operand(Expression::Ref { index });
                Ok(())
            }
            Token::Op(Operator::Subtract) if self.expect_operand => {
                self.operators.push(Pending::Op(Operator::Negate));
                Ok(())
            }
            Token::Op(op) => {
                if self.expect_operand {
                    return Err(malformed(format!(
                        "operator `{op}` at position {off} is missing its left operand"
                    )));
                }
                self.reduce_while_binds_tighter(op)?;
                self.operators.push(Pending::Op(op));
                self.expect_operand = true;
                Ok(())
            }
            Token::LParen => {
                if !self.expect_operand {
                    return Err(malformed(format!(
                        "`(` at position {off} directly follows an operand"
                    )));
                }
                self.operators.push(Pending::LParen);
                Ok(())
            }
            Token::RParen => {
                if self.expect_operand {
                    return Err(malformed(format!(
                        "expected an operand before `)` at position {off}"
                    )));
                }
                loop {
                    match self.operators.pop() {
                        Some(Pending::Op(op)) => self.reduce(op)?,
                        Some(Pending::LParen) => break,
                        None => return Err(malformed(format!("unmatched `)` at position {off}"))),
                    }
                }
                Ok(())
            }
        }
    }

    fn check_operand_position(&self, off: usize) -> Result<(), ParseError> {
        if self.expect_operand {
            return Ok(());
        }
        Err(malformed(format!(
            "operand at position {off} directly follows another operand"
        )))
    }

    fn push_operand(&mut self, expr: Expression) {
        self.operands.push(expr);
        self.expect_operand = false;
    }

    fn reduce_while_binds_tighter(&mut self, incoming: Operator) -> Result<(), ParseError> {
        let (prec, assoc) = incoming.get();

        while let Some(Pending::Op(top)) = self.operators.last() {
            let top = *top;
            let pop = match assoc {
                Assoc::Left => top.precedence() >= prec,
            };
            if !pop {
                break;
            }
            self.operators.pop();
            self.reduce(top)?;
        }

        Ok(())
    }

    fn reduce(&mut self, op: Operator) -> Result<(), ParseError> {
        let expr = if op.arity() == 1 {
            let operand = self.pop_operand(op)?;
            Expression::unary(op, operand)
        } else {
            let rhs = self.pop_operand(op)?;
            let lhs = self.pop_operand(op)?;
            Expression::binary(lhs, op, rhs)
        };

        log::trace!("reduced {op:?}, {} operand(s) left", self.operands.len());
        self.operands.push(expr);
        Ok(())
    }

    fn pop_operand(&mut self, op: Operator) -> Result<Expression, ParseError> {
        self.operands
            .pop()
            .ok_or_else(|| malformed(format!("operator `{op}` is missing an operand")))
    }
}
