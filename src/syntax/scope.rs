use std::collections::HashMap;

use super::ParamIndex;

/// Distinct variable names of one expression, in first-occurrence order.
/// The position of a name is its binding index.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub(crate) struct ParamList<'src> {
    names: Vec<&'src str>,
    indices: HashMap<&'src str, ParamIndex>,
}

impl<'src> ParamList<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `id`, allocating the next free slot on first use.
    pub fn resolve(&mut self, id: &'src str) -> ParamIndex {
        if let Some(idx) = self.indices.get(id) {
            return *idx;
        }

        let idx = self.names.len();
        log::debug!("parameter `{id}` => {idx}");

        self.names.push(id);
        self.indices.insert(id, idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn into_names(self) -> Vec<String> {
        self.names.into_iter().map(str::to_owned).collect()
    }
}
