use crate::error::{ErrorKind, PResult};

use super::token::Operator;

/// Separator characters recognised while scanning number literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimal_separator: char,
    group_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::invariant()
    }
}

impl NumberFormat {
    /// `.` as decimal separator, no grouping.
    pub const fn invariant() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: None,
        }
    }

    pub fn new(decimal_separator: char, group_separator: Option<char>) -> PResult<Self> {
        Self::check_separator(decimal_separator)?;

        if let Some(group) = group_separator {
            Self::check_separator(group)?;
            if group == decimal_separator {
                return Err(ErrorKind::Config(format!(
                    "decimal and group separator are both `{group}`"
                )));
            }
        }

        Ok(Self {
            decimal_separator,
            group_separator,
        })
    }

    fn check_separator(c: char) -> PResult<()> {
        if c.is_ascii_digit() || c.is_alphabetic() || Operator::is_symbol(c) || c == '(' || c == ')'
        {
            return Err(ErrorKind::Config(format!("`{c}` cannot be used as a separator")));
        }
        Ok(())
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn group_separator(&self) -> Option<char> {
        self.group_separator
    }

    pub(crate) fn is_literal_part(&self, c: char) -> bool {
        c.is_ascii_digit() || c == self.decimal_separator || Some(c) == self.group_separator
    }

    /// Rewrites a scanned literal into the form `Decimal` parses: group
    /// separators dropped, decimal separator as `.`, no trailing separator.
    pub(crate) fn normalize(&self, literal: &str) -> String {
        let mut out: String = literal
            .chars()
            .filter(|c| Some(*c) != self.group_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        if out.ends_with('.') {
            out.pop();
        }
        out
    }
}
