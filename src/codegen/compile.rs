use std::fmt;

use rust_decimal::Decimal;

use crate::syntax::{Expression, Operator, ParamIndex};

/// One step of a postfix stack program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Const(Decimal),
    LocalGet(ParamIndex),
    Add,
    Sub,
    Mul,
    Div,
    Neg,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(v) => write!(f, "const {v}"),
            Self::LocalGet(index) => write!(f, "local.get {index}"),
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
            Self::Neg => write!(f, "neg"),
        }
    }
}

/// Flat instruction sequence produced from an expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    max_stack: usize,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Deepest value stack any execution of this program reaches.
    pub fn max_stack(&self) -> usize {
        self.max_stack
    }
}

enum Step<'a> {
    Visit(&'a Expression),
    Emit(Instruction),
}

pub(crate) struct Compiler {
    instructions: Vec<Instruction>,
    depth: usize,
    max_stack: usize,
}

impl Compiler {
    pub fn compile(root: &Expression) -> Program {
        let mut compiler = Self {
            instructions: vec![],
            depth: 0,
            max_stack: 0,
        };
        compiler.compile_expr(root);

        log::debug!(
            "emitted {} instruction(s), max stack {}",
            compiler.instructions.len(),
            compiler.max_stack
        );

        Program {
            instructions: compiler.instructions,
            max_stack: compiler.max_stack,
        }
    }

    /// Post-order walk with an explicit work list; tree depth is unbounded.
    fn compile_expr(&mut self, root: &Expression) {
        let mut work = vec![Step::Visit(root)];

        while let Some(step) = work.pop() {
            match step {
                Step::Emit(ins) => self.emit(ins),
                Step::Visit(Expression::Constant(v)) => self.emit(Instruction::Const(*v)),
                Step::Visit(Expression::Ref { index }) => {
                    self.emit(Instruction::LocalGet(*index))
                }
                Step::Visit(Expression::Unary { op, operand }) => {
                    work.push(Step::Emit(Self::instruction_for(*op)));
                    work.push(Step::Visit(&**operand));
                }
                Step::Visit(Expression::Binary { lhs, op, rhs }) => {
                    work.push(Step::Emit(Self::instruction_for(*op)));
                    work.push(Step::Visit(&**rhs));
                    work.push(Step::Visit(&**lhs));
                }
            }
        }
    }

    fn instruction_for(op: Operator) -> Instruction {
        match op {
            Operator::Add => Instruction::Add,
            Operator::Subtract => Instruction::Sub,
            Operator::Multiply => Instruction::Mul,
            Operator::Divide => Instruction::Div,
            Operator::Negate => Instruction::Neg,
        }
    }

    fn emit(&mut self, ins: Instruction) {
        log::trace!("emit {ins}");

        match ins {
            Instruction::Const(_) | Instruction::LocalGet(_) => {
                self.depth += 1;
                self.max_stack = self.max_stack.max(self.depth);
            }
            Instruction::Add | Instruction::Sub | Instruction::Mul | Instruction::Div => {
                self.depth -= 1;
            }
            Instruction::Neg => (),
        }

        self.instructions.push(ins);
    }
}
