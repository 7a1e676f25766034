/// Failure while turning expression text into a compiled expression.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid character `{ch}` at position {position} in expression `{expression}`")]
    InvalidCharacter {
        ch: char,
        /// Byte offset of `ch` inside `expression`.
        position: usize,
        expression: String,
    },
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
}

/// Failure while executing an already compiled expression.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("{}", describe_mismatch(.expected, .got))]
    ParameterMismatch {
        /// Parameters of the expression, in binding order.
        expected: Vec<String>,
        /// Names that were supplied, sorted.
        got: Vec<String>,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Value stack underflow while executing program")]
    StackUnderflow,
}

#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Invalid number format: {0}")]
    Config(String),
}

pub type PResult<T> = Result<T, ErrorKind>;

impl RuntimeError {
    /// Expected parameters absent from the supplied names.
    pub fn missing(&self) -> Vec<&str> {
        match self {
            Self::ParameterMismatch { expected, got } => difference(expected, got),
            _ => vec![],
        }
    }

    /// Supplied names the expression does not use.
    pub fn unexpected(&self) -> Vec<&str> {
        match self {
            Self::ParameterMismatch { expected, got } => difference(got, expected),
            _ => vec![],
        }
    }
}

fn difference<'a>(names: &'a [String], other: &[String]) -> Vec<&'a str> {
    names
        .iter()
        .filter(|n| !other.contains(n))
        .map(String::as_str)
        .collect()
}

fn describe_mismatch(expected: &[String], got: &[String]) -> String {
    let mut msg = format!(
        "Expression contains {} parameters but got {}",
        expected.len(),
        got.len()
    );

    let missing = difference(expected, got);
    if !missing.is_empty() {
        msg.push_str(&format!("; no values provided for: {}", missing.join(",")));
    }

    let unexpected = difference(got, expected);
    if !unexpected.is_empty() {
        msg.push_str(&format!("; unknown parameters: {}", unexpected.join(",")));
    }

    msg
}
