pub mod expr;
mod lexer;
pub mod number;
pub(crate) mod parser;
mod scope;
pub mod token;

pub use expr::Expression;
pub use number::NumberFormat;
pub use token::Operator;

/// Position of a variable in an expression's parameter list.
pub type ParamIndex = usize;
