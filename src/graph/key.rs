//! Node key type
//!
//! A key uniquely identifies a node within a graph. Keys are opaque,
//! caller-supplied strings; the walker never interprets them beyond
//! equality and ordering. Lexicographic ordering is what makes cycle
//! reports and serial walks reproducible across runs.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a node within a graph.
///
/// Keys appear in every lookup and every error message, so they are
/// cheap to create from string literals and display as their raw text.
///
/// # Examples
///
/// ```
/// use trellis::Key;
///
/// let key = Key::new("fetch_sources");
/// assert_eq!(key.as_str(), "fetch_sources");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key(String);

impl Key {
    /// Creates a new key from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the key's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_creation() {
        let key = Key::new("process_payment");
        assert_eq!(key.as_str(), "process_payment");
        assert_eq!(format!("{}", key), "process_payment");
        assert_eq!(format!("{:?}", key), "Key(process_payment)");
    }

    #[test]
    fn test_key_equality_and_ordering() {
        let a = Key::new("a");
        let b = Key::new("b");
        assert_eq!(a, Key::from("a"));
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_key_in_hash_set() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Key::new("a"));
        set.insert(Key::new("b"));
        set.insert(Key::new("a"));

        assert_eq!(set.len(), 2);
        // Borrow<str> lets callers probe with plain string slices.
        assert!(set.contains("a"));
    }

    #[test]
    fn test_key_from_string() {
        let owned: Key = String::from("x").into();
        let borrowed: Key = "x".into();
        assert_eq!(owned, borrowed);
    }
}
