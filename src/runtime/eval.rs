use rust_decimal::Decimal;

use super::{compiled::CompiledExpression, env::Bindings};
use crate::{
    codegen::{Instruction, Program},
    error::{PResult, ParseError, RuntimeError},
    syntax::NumberFormat,
};

/// Runs `program` with `locals` as the parameter values.
pub(crate) fn run(program: &Program, locals: &[Decimal]) -> Result<Decimal, RuntimeError> {
    let mut stack: Vec<Decimal> = Vec::with_capacity(program.max_stack());

    for ins in program.instructions() {
        match *ins {
            Instruction::Const(v) => stack.push(v),
            Instruction::LocalGet(index) => stack.push(locals[index]),
            Instruction::Neg => {
                let v = pop(&mut stack)?;
                stack.push(-v);
            }
            Instruction::Add => binary(&mut stack, Decimal::checked_add)?,
            Instruction::Sub => binary(&mut stack, Decimal::checked_sub)?,
            Instruction::Mul => binary(&mut stack, Decimal::checked_mul)?,
            Instruction::Div => {
                if stack.last().is_some_and(Decimal::is_zero) {
                    return Err(RuntimeError::DivisionByZero);
                }
                binary(&mut stack, Decimal::checked_div)?
            }
        }
    }

    let mut result = pop(&mut stack)?;
    if result.is_zero() {
        result.set_sign_positive(true);
    }
    Ok(result)
}

fn pop(stack: &mut Vec<Decimal>) -> Result<Decimal, RuntimeError> {
    stack.pop().ok_or(RuntimeError::StackUnderflow)
}

fn binary<F>(stack: &mut Vec<Decimal>, apply: F) -> Result<(), RuntimeError>
where
    F: Fn(Decimal, Decimal) -> Option<Decimal>,
{
    let rhs = pop(stack)?;
    let lhs = pop(stack)?;
    stack.push(apply(lhs, rhs).ok_or(RuntimeError::Overflow)?);
    Ok(())
}

/// Compiles expressions with a fixed number format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    format: NumberFormat,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: NumberFormat) -> Self {
        Self { format }
    }

    pub fn compile(&self, src: &str) -> Result<CompiledExpression, ParseError> {
        CompiledExpression::compile_with(src, self.format)
    }

    /// Compiles `src` and executes it once.
    pub fn evaluate(&self, src: &str, bindings: &Bindings) -> PResult<Decimal> {
        Ok(self.compile(src)?.execute(bindings)?)
    }
}
