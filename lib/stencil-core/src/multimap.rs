//! Ordered multimap used for query parameters and headers.
//!
//! Keys keep the order of their first insertion and every key holds an
//! ordered list of values, duplicates included. Two write operations exist
//! and they are not interchangeable:
//!
//! - [`Multimap::append`] adds values after the ones already bound;
//! - [`Multimap::replace`] overrides whatever was bound to the key.
//!
//! Query and header maps passed as call arguments are merged with
//! [`Multimap::replace`], which is how they take precedence over values
//! coming from the template itself.

/// An insertion-ordered map from names to ordered value lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multimap<V> {
    entries: Vec<(String, Vec<V>)>,
    case_insensitive: bool,
}

impl<V> Default for Multimap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Multimap<V> {
    /// Create an empty multimap with case-sensitive keys.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            case_insensitive: false,
        }
    }

    /// Create an empty multimap whose keys compare ignoring ASCII case.
    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self {
            entries: Vec::new(),
            case_insensitive: true,
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| {
            if self.case_insensitive {
                name.eq_ignore_ascii_case(key)
            } else {
                name == key
            }
        })
    }

    /// Append values to a key, after any value already bound to it.
    pub fn append(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = V>) {
        let key = key.into();
        match self.position(&key) {
            Some(index) => {
                if let Some((_, existing)) = self.entries.get_mut(index) {
                    existing.extend(values);
                }
            }
            None => self.entries.push((key, values.into_iter().collect())),
        }
    }

    /// Override the values of a key.
    ///
    /// The key keeps its original position when it was already present.
    pub fn replace(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = V>) {
        let key = key.into();
        let values: Vec<V> = values.into_iter().collect();
        match self.position(&key) {
            Some(index) => {
                if let Some(entry) = self.entries.get_mut(index) {
                    *entry = (key, values);
                }
            }
            None => self.entries.push((key, values)),
        }
    }

    /// Values bound to a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[V]> {
        self.position(key)
            .and_then(|index| self.entries.get(index))
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate over keys and their values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there is no key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for Multimap<V> {
    type Item = (String, Vec<V>);
    type IntoIter = std::vec::IntoIter<(String, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
