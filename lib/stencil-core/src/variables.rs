//! Bound template variables.

use crate::Value;

/// Variable name to value bindings, in binding order.
///
/// Binding a name twice overrides the first value but keeps its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variables {
    entries: Vec<(String, Value)>,
}

impl Variables {
    /// Create an empty set of bindings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind a value to a name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(bound, _)| *bound == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value bound to a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    /// Bindings whose name satisfies the predicate, in binding order.
    #[must_use]
    pub fn filter(&self, mut predicate: impl FnMut(&str) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(name, _)| predicate(name))
                .cloned()
                .collect(),
        }
    }

    /// Iterate over bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into a [`Value::Map`], keeping binding order.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Map(self.entries)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (name, value) in iter {
            variables.insert(name, value);
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn rebinding_overrides_in_place() {
        let mut vars = Variables::new();
        vars.insert("a", 1);
        vars.insert("b", 2);
        vars.insert("a", 3);

        let names: Vec<_> = vars.iter().map(|(name, _)| name).collect();
        check!(names == vec!["a", "b"]);
        check!(vars.get("a") == Some(&Value::Int(3)));
    }

    #[test]
    fn filter_keeps_order() {
        let vars: Variables = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        let form = vars.filter(|name| name != "b");
        check!(form.into_value() == Value::map([("a", "1"), ("c", "3")]));
    }
}
