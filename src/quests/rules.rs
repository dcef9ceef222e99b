//! Rule text lookup.
//!
//! Quests may reference shared rule texts by id. The `RuleMap` resolves
//! them for presentation; it is a pure key lookup.

use rustc_hash::FxHashMap;

/// Map of rule ids to rule texts.
///
/// ## Example
///
/// ```
/// use party_quest::quests::RuleMap;
///
/// let mut rules = RuleMap::new();
/// rules.insert("waterfall", "Everybody drinks until the player stops.");
///
/// assert_eq!(rules.get("waterfall"), Some("Everybody drinks until the player stops."));
/// assert_eq!(rules.get("unknown"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleMap {
    rules: FxHashMap<String, String>,
}

impl RuleMap {
    /// Create a new empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule.
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.rules.insert(id.into(), text.into());
    }

    /// Get a rule text by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.rules.get(id).map(String::as_str)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, text) in iter {
            map.insert(id, text);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut rules = RuleMap::new();
        rules.insert("a", "first");
        rules.insert("a", "second");

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("a"), Some("second"));
    }

    #[test]
    fn test_from_iter() {
        let rules: RuleMap = [("a", "x"), ("b", "y")].into_iter().collect();
        assert_eq!(rules.len(), 2);
        assert!(!rules.is_empty());
        assert_eq!(rules.get("b"), Some("y"));
    }
}
