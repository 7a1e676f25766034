use std::fmt;

use rust_decimal::Decimal;

use super::{env::Bindings, eval};
use crate::{
    codegen::{Compiler, Instruction, Program},
    error::{ParseError, RuntimeError},
    syntax::{
        parser::{Parsed, Parser},
        Expression, NumberFormat,
    },
};

/// An expression compiled once and executable any number of times.
///
/// Holds the expression tree, the ordered parameter names and the lowered
/// program. Nothing is mutated by [`CompiledExpression::execute`], so a
/// single instance can be shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExpression {
    source: String,
    root: Expression,
    params: Vec<String>,
    program: Program,
}

impl CompiledExpression {
    pub fn compile(src: &str) -> Result<Self, ParseError> {
        Self::compile_with(src, NumberFormat::invariant())
    }

    pub fn compile_with(src: &str, format: NumberFormat) -> Result<Self, ParseError> {
        let Parsed { root, params } = Parser::new(src, format).parse()?;
        let program = Compiler::compile(&root);

        Ok(Self {
            source: src.to_owned(),
            root,
            params,
            program,
        })
    }

    /// Executes with `bindings`, which must bind exactly [`Self::parameters`].
    pub fn execute(&self, bindings: &Bindings) -> Result<Decimal, RuntimeError> {
        let frame = bindings.frame(&self.params)?;
        eval::run(&self.program, &frame)
    }

    pub fn execute_unbound(&self) -> Result<Decimal, RuntimeError> {
        self.execute(&Bindings::new())
    }

    /// Variable names in binding order.
    pub fn parameters(&self) -> &[String] {
        &self.params
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expression {
        &self.root
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Reverse Polish rendering with parameter names, e.g. `a b + 2 *`.
    pub fn to_postfix(&self) -> String {
        self.program
            .instructions()
            .iter()
            .map(|ins| match ins {
                Instruction::Const(v) => v.to_string(),
                Instruction::LocalGet(index) => self.params[*index].clone(),
                Instruction::Add => "+".into(),
                Instruction::Sub => "-".into(),
                Instruction::Mul => "*".into(),
                Instruction::Div => "/".into(),
                Instruction::Neg => "neg".into(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display(&self.params))
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::CompiledExpression;
    use crate::{error::RuntimeError, runtime::env::Bindings};

    #[test]
    fn invoke_multiple_times() {
        let compiled = CompiledExpression::compile("(a+b)/(a+c)").unwrap();

        let (a, b, c) = (dec!(6), dec!(3.9), dec!(4.9));
        let bindings = Bindings::from_iter([("a", a), ("b", b), ("c", c)]);
        assert_eq!(compiled.execute(&bindings).unwrap(), (a + b) / (a + c));

        let (a, b, c) = (dec!(5.4), dec!(-2.4), dec!(7.5));
        let bindings = Bindings::from_iter([("a", a), ("b", b), ("c", c)]);
        assert_eq!(compiled.execute(&bindings).unwrap(), (a + b) / (a + c));
    }

    #[test]
    fn distinct_parameter_counts() {
        let compiled = CompiledExpression::compile("(a+b)/(a+c)").unwrap();
        let compiled2 = CompiledExpression::compile("(a+b)/a").unwrap();

        assert_eq!(compiled.parameters(), &["a", "b", "c"]);
        assert_eq!(compiled2.parameters(), &["a", "b"]);

        let (a, b, c) = (dec!(6), dec!(3.9), dec!(4.9));
        let bindings = Bindings::from_iter([("a", a), ("b", b), ("c", c)]);
        assert_eq!(compiled.execute(&bindings).unwrap(), (a + b) / (a + c));

        let (a, b) = (dec!(5.4), dec!(-2.4));
        let bindings = Bindings::from_iter([("a", a), ("b", b)]);
        assert_eq!(compiled2.execute(&bindings).unwrap(), (a + b) / a);
    }

    #[test]
    fn reused_variable_has_one_slot() {
        let compiled = CompiledExpression::compile("a+a").unwrap();

        assert_eq!(compiled.parameters().len(), 1);
        assert_eq!(
            compiled.execute(&Bindings::from_iter([("a", 3)])).unwrap(),
            dec!(6)
        );
    }

    #[test]
    fn parameter_mismatch() {
        let compiled = CompiledExpression::compile("a+b").unwrap();
        let err = compiled
            .execute(&Bindings::from_iter([("a", 1)]))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ParameterMismatch { .. }));

        let compiled = CompiledExpression::compile("a").unwrap();
        let err = compiled
            .execute(&Bindings::from_iter([("a", 1), ("b", 2)]))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ParameterMismatch { .. }));

        assert_eq!(
            compiled.execute_unbound().unwrap_err().to_string(),
            "Expression contains 1 parameters but got 0; no values provided for: a"
        );
    }

    #[test]
    fn usable_after_failed_call() {
        let compiled = CompiledExpression::compile("a/b").unwrap();

        assert_eq!(
            compiled.execute(&Bindings::from_iter([("a", 1), ("b", 0)])),
            Err(RuntimeError::DivisionByZero)
        );
        assert!(compiled.execute(&Bindings::new()).is_err());
        assert_eq!(
            compiled
                .execute(&Bindings::from_iter([("a", 1), ("b", 4)]))
                .unwrap(),
            dec!(0.25)
        );
    }

    #[test]
    fn unbound_constant_expression() {
        let compiled = CompiledExpression::compile("").unwrap();

        assert!(compiled.parameters().is_empty());
        assert_eq!(compiled.execute_unbound().unwrap(), dec!(0));
    }

    #[test]
    fn renderings() {
        let compiled = CompiledExpression::compile("(a + b) * -c / 2").unwrap();

        assert_eq!(compiled.source(), "(a + b) * -c / 2");
        assert_eq!(compiled.to_string(), "(((a + b) * -c) / 2)");
        assert_eq!(compiled.to_postfix(), "a b + c neg * 2 /");
    }

    #[test]
    fn long_chains() {
        let sum = CompiledExpression::compile(&vec!["1"; 20_000].join("+")).unwrap();
        assert_eq!(sum.execute_unbound().unwrap(), dec!(20000));
        assert!(sum.to_string().starts_with("((((1 + 1) + 1)"));

        let terms = vec!["x"; 20_000].join(" - ");
        let diff = CompiledExpression::compile(&terms).unwrap();
        assert_eq!(diff.parameters(), &["x"]);
        assert_eq!(
            diff.execute(&Bindings::from_iter([("x", 1)])).unwrap(),
            dec!(-19998)
        );

        let nested = format!("{}7{}", "(-".repeat(20_000), ")".repeat(20_000));
        let nested = CompiledExpression::compile(&nested).unwrap();
        assert_eq!(nested.execute_unbound().unwrap(), dec!(7));
    }

    #[test]
    fn shared_between_threads() {
        let compiled = CompiledExpression::compile("x*x - y").unwrap();

        thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let compiled = &compiled;
                    s.spawn(move || {
                        compiled
                            .execute(&Bindings::from_iter([("x", i), ("y", 1)]))
                            .unwrap()
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let i = i as i64;
                assert_eq!(handle.join().unwrap(), Decimal::from(i * i - 1));
            }
        });
    }
}
