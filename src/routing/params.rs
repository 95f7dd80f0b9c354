//! Bound route parameters.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Parameters bound by a successful lookup, in the order they appear in the
/// registered pattern.
///
/// Names borrow from the tree and values borrow from the request path, so
/// building a `Params` never copies string data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'k, 'v> {
    entries: Vec<(&'k str, &'v str)>,
}

impl<'k, 'v> Params<'k, 'v> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'k str, value: &'v str) {
        self.entries.push((name, value));
    }

    /// Value bound to `name`, if the matched pattern declares it.
    pub fn get(&self, name: &str) -> Option<&'v str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&'k str, &'v str)> + '_ {
        self.entries.iter().copied()
    }
}

impl<'a, 'k, 'v> IntoIterator for &'a Params<'k, 'v> {
    type Item = (&'k str, &'v str);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (&'k str, &'v str)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

// Serialized as a JSON-style map; key order follows the pattern.
impl Serialize for Params<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
