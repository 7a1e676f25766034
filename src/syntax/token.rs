use std::fmt;

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Unary minus. Never produced by the lexer; the compiler turns a `-`
    /// found where an operand is expected into this.
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
}

pub type Precedence = u8;

/// Symbols recognised as binary operators.
const SYMBOLS: [(char, Operator); 4] = [
    ('+', Operator::Add),
    ('-', Operator::Subtract),
    ('*', Operator::Multiply),
    ('/', Operator::Divide),
];

impl Operator {
    pub fn from_symbol(c: char) -> Option<Self> {
        SYMBOLS.iter().find(|(s, _)| *s == c).map(|(_, op)| *op)
    }

    pub fn is_symbol(c: char) -> bool {
        Self::from_symbol(c).is_some()
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide | Self::Negate => 2,
        }
    }

    pub fn assoc(self) -> Assoc {
        Assoc::Left
    }

    pub fn arity(self) -> usize {
        match self {
            Self::Negate => 1,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => 2,
        }
    }

    pub fn get(self) -> (Precedence, Assoc) {
        (self.precedence(), self.assoc())
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract | Self::Negate => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    Invalid(char),
    /// Digits that do not form a valid decimal (`1.2.3`, out of range).
    BadNumber(&'src str),
    Number(Decimal),
    Op(Operator),
    Id(&'src str),

    LParen,
    RParen,
}
