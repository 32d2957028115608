use ecow::EcoString;
use hashbrown::HashMap;

use super::Value;

/// Caller-supplied variable values for one evaluation.
///
/// Bindings are read-only while an expression runs: assignments inside the
/// expression go to the evaluation's own frames, never back into this map.
///
/// # Example
///
/// ```
/// use tally_core::Bindings;
///
/// let bindings = Bindings::new().with("x", 3).with("name", "tally");
/// assert_eq!(bindings.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<EcoString, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<EcoString>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a binding, returning the previous value.
    pub fn insert(&mut self, name: impl Into<EcoString>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(EcoString::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<EcoString>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<EcoString>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Bindings {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
