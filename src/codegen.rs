mod compile;

pub(crate) use compile::Compiler;
pub use compile::{Instruction, Program};
