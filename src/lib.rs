//! # decexpr
//!
//! Compiles infix arithmetic over decimal numbers and named variables into a
//! reusable [`CompiledExpression`], which can then be executed any number of
//! times with different [`Bindings`].
//!
//! ```
//! use decexpr::{compile, Bindings};
//! use rust_decimal::Decimal;
//!
//! let expr = compile("(a+b)/(a+c)").unwrap();
//! assert_eq!(expr.parameters(), &["a", "b", "c"]);
//!
//! let bindings = Bindings::from_iter([("a", 6), ("b", 4), ("c", 4)]);
//! assert_eq!(expr.execute(&bindings).unwrap(), Decimal::ONE);
//! ```

pub mod codegen;
pub mod error;
pub mod runtime;
pub mod syntax;

use rust_decimal::Decimal;

pub use error::{ErrorKind, PResult, ParseError, RuntimeError};
pub use runtime::{Bindings, CompiledExpression, Evaluator};
pub use syntax::NumberFormat;

/// Compiles `src` using `.` as decimal separator.
pub fn compile(src: &str) -> Result<CompiledExpression, ParseError> {
    CompiledExpression::compile(src)
}

/// Compiles and executes `src` once. Prefer [`compile`] when the same
/// expression is evaluated repeatedly.
pub fn evaluate(src: &str, bindings: &Bindings) -> PResult<Decimal> {
    Evaluator::new().evaluate(src, bindings)
}
