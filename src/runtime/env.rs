use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::RuntimeError;

/// Values supplied for an expression's variables, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: HashMap<String, Decimal>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Decimal>) -> Option<Decimal> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries.get(name).copied()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Orders the bound values by `params`. The bound names must be exactly
    /// the parameter names.
    pub(crate) fn frame(&self, params: &[String]) -> Result<Vec<Decimal>, RuntimeError> {
        if self.entries.len() != params.len() || params.iter().any(|p| !self.contains_key(p)) {
            return Err(RuntimeError::ParameterMismatch {
                expected: params.to_vec(),
                got: self.names().into_iter().map(str::to_owned).collect(),
            });
        }

        Ok(params.iter().filter_map(|p| self.get(p)).collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<Decimal>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        bindings.extend(iter);
        bindings
    }
}

impl<K, V> Extend<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<Decimal>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
