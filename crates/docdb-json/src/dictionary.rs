//! Append-only string dictionary backing the binary user-string markers.

use std::collections::HashMap;

/// Bidirectional `index <-> string` table.
///
/// Indices are assigned in insertion order starting at 0 and never change, so
/// payloads written against a dictionary stay decodable for as long as the
/// dictionary lives. [`insert`](Self::insert) always appends; callers that
/// want one index per distinct string check [`index_of`](Self::index_of)
/// first, which is what the binary writer does.
///
/// The dictionary has no interior synchronization. Writers borrow it
/// mutably, readers and navigators borrow it shared; a host sharing one
/// dictionary across threads wraps it in its own lock.
#[derive(Debug, Clone, Default)]
pub struct StringDictionary {
    strings: Vec<String>,
    /// First index of every distinct string.
    lookup: HashMap<String, usize>,
}

impl StringDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty dictionary; `capacity` is only a reservation hint.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strings: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Appends `text` and returns its index.
    pub fn insert(&mut self, text: &str) -> usize {
        let index = self.strings.len();
        self.strings.push(text.to_owned());
        self.lookup.entry(text.to_owned()).or_insert(index);
        index
    }

    /// Returns the string stored at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Returns the first index holding `text`.
    pub fn index_of(&self, text: &str) -> Option<usize> {
        self.lookup.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_insertion_order() {
        let mut dict = StringDictionary::with_capacity(4);
        assert_eq!(dict.insert("id"), 0);
        assert_eq!(dict.insert("name"), 1);
        assert_eq!(dict.get(0), Some("id"));
        assert_eq!(dict.get(1), Some("name"));
        assert_eq!(dict.get(2), None);
        assert_eq!(dict.index_of("name"), Some(1));
        assert_eq!(dict.index_of("missing"), None);
    }

    #[test]
    fn duplicates_are_permitted_and_lookup_keeps_first() {
        let mut dict = StringDictionary::new();
        dict.insert("a");
        assert_eq!(dict.insert("a"), 1);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.index_of("a"), Some(0));
        assert_eq!(dict.iter().collect::<Vec<_>>(), vec!["a", "a"]);
    }
}
