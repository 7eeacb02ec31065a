//! Captured route parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The parameters captured by a single pattern match, in pattern order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteParams {
    entries: Vec<(String, String)>,
}

impl RouteParams {
    pub(crate) fn push(&mut self, key: String, value: String) {
        self.entries.push((key, value));
    }

    /// Get the value captured for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of captured parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Parameters accumulated while walking the prefixes of a path.
///
/// A parameter captured by an outer segment stays visible to the resolvers of every deeper
/// segment. A later capture of the same name overwrites the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulatedParams {
    params: BTreeMap<String, String>,
}

impl AccumulatedParams {
    /// Accumulate a single parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Merge every parameter of `captured` into the accumulated set.
    pub fn merge(&mut self, captured: &RouteParams) {
        for (key, value) in captured.iter() {
            self.insert(key, value);
        }
    }

    /// Get an accumulated parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Iterate over all accumulated parameters, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether no parameter was accumulated yet.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// A deterministic serialization of the accumulated parameters, e.g. `{"id":"42"}`.
    pub fn serialize(&self) -> String {
        // a map of strings always serializes
        serde_json::to_string(&self.params).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AccumulatedParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A parameter shown on a breadcrumb node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeParam {
    /// The parameter name, without the leading `:`.
    pub key: String,
    /// The raw path segment captured for it.
    pub value: String,
}
