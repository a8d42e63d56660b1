//! Ordered map type for LLSD maps.
//!
//! [`LlsdMap`] wraps an [`IndexMap`] so that entries serialize in the order
//! they were inserted. Keys are unique; inserting an existing key replaces
//! its value in place (last write wins, original position kept).
//!
//! ## Examples
//!
//! ```rust
//! use serde_llsd::{LlsdMap, Value};
//!
//! let mut map = LlsdMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("age").map(|v| v.as_integer()), Some(30));
//! ```

use crate::LlsdValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to LLSD values.
///
/// # Examples
///
/// ```rust
/// use serde_llsd::{LlsdMap, Value};
///
/// let mut map = LlsdMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
/// map.insert("first".to_string(), Value::from(3));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// assert_eq!(map.get("first"), Some(&Value::from(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlsdMap(IndexMap<String, LlsdValue>);

impl LlsdMap {
    #[must_use]
    pub fn new() -> Self {
        LlsdMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        LlsdMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the value it replaced.
    pub fn insert(&mut self, key: String, value: LlsdValue) -> Option<LlsdValue> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LlsdValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut LlsdValue> {
        self.0.get_mut(key)
    }

    /// Removes a key, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<LlsdValue> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, LlsdValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, LlsdValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, LlsdValue> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, LlsdValue> {
        self.0.iter_mut()
    }
}

impl From<HashMap<String, LlsdValue>> for LlsdMap {
    fn from(map: HashMap<String, LlsdValue>) -> Self {
        LlsdMap(map.into_iter().collect())
    }
}

impl From<LlsdMap> for HashMap<String, LlsdValue> {
    fn from(map: LlsdMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for LlsdMap {
    type Item = (String, LlsdValue);
    type IntoIter = indexmap::map::IntoIter<String, LlsdValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LlsdMap {
    type Item = (&'a String, &'a LlsdValue);
    type IntoIter = indexmap::map::Iter<'a, String, LlsdValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, LlsdValue)> for LlsdMap {
    fn from_iter<T: IntoIterator<Item = (String, LlsdValue)>>(iter: T) -> Self {
        LlsdMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, LlsdValue)> for LlsdMap {
    fn extend<T: IntoIterator<Item = (String, LlsdValue)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_keeps_order() {
        let mut map: LlsdMap = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), LlsdValue::from(v)))
            .collect();

        assert_eq!(map.remove("b"), Some(LlsdValue::Integer(2)));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_get_mut_replaces_in_place() {
        let mut map = LlsdMap::new();
        map.insert("x".to_string(), LlsdValue::Integer(1));
        if let Some(v) = map.get_mut("x") {
            *v = LlsdValue::Real(2.5);
        }
        assert_eq!(map.get("x"), Some(&LlsdValue::Real(2.5)));
    }
}
