//! Insertion-ordered map with case-insensitive key lookup
//!
//! CLI keys keep the spelling they were registered with (`Claude`), but
//! every lookup (`claude`, `CLAUDE`) resolves to the same entry.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered map whose keys compare case-insensitively.
///
/// Entries are kept in insertion order with their original spelling;
/// a lowercase secondary index makes lookups O(1).
#[derive(Clone, PartialEq, Eq)]
pub struct CaseInsensitiveMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(&fold(key)).copied()
    }

    /// The stored spelling of `key`, if present.
    pub fn resolve_key(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].0.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    /// Stored key and value for `key`.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.position(key)
            .map(|i| (self.entries[i].0.as_str(), &self.entries[i].1))
    }

    /// Insert or replace an entry.
    ///
    /// Replacing keeps the entry's position but adopts the new spelling.
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => {
                let (_, old) = std::mem::replace(&mut self.entries[i], (key, value));
                Some(old)
            }
            None => {
                self.index.insert(fold(&key), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove an entry, returning its stored key and value.
    pub fn remove(&mut self, key: &str) -> Option<(String, V)> {
        let i = self.index.remove(&fold(key))?;
        let removed = self.entries.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i {
                *pos -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for CaseInsensitiveMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseInsensitiveMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for CaseInsensitiveMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct MapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
    type Value = CaseInsensitiveMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = CaseInsensitiveMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CaseInsensitiveMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_ignores_case_but_keeps_spelling() {
        let mut map = CaseInsensitiveMap::new();
        map.insert("Claude", 1);

        assert_eq!(map.get("claude"), Some(&1));
        assert_eq!(map.get("CLAUDE"), Some(&1));
        assert_eq!(map.resolve_key("cLaUdE"), Some("Claude"));
        assert!(!map.contains_key("codex"));
    }

    #[test]
    fn insert_replaces_case_variant_in_place() {
        let mut map = CaseInsensitiveMap::new();
        map.insert("Claude", 1);
        map.insert("Codex", 2);

        let old = map.insert("CLAUDE", 3);

        assert_eq!(old, Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["CLAUDE", "Codex"]);
    }

    #[test]
    fn remove_reindexes_later_entries() {
        let mut map: CaseInsensitiveMap<i32> =
            [("a", 1), ("B", 2), ("c", 3)].into_iter().collect();

        let removed = map.remove("A");

        assert_eq!(removed, Some(("a".to_string(), 1)));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map.get("C"), Some(&3));
        assert_eq!(map.remove("missing"), None);
    }

    #[test]
    fn serializes_as_ordered_json_object() {
        let map: CaseInsensitiveMap<i32> = [("zeta", 1), ("Alpha", 2)].into_iter().collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":1,"Alpha":2}"#);

        let back: CaseInsensitiveMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("ALPHA"), Some(&2));
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["zeta", "Alpha"]);
    }
}
