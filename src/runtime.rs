pub mod compiled;
pub mod env;
pub mod eval;

pub use compiled::CompiledExpression;
pub use env::Bindings;
pub use eval::Evaluator;
