//! Request parameter handling
//!
//! Storm API methods take a flat bag of named parameters which travels as
//! the `params` object of the JSON request body. The bag preserves
//! insertion order and keeps keys unique (last write wins).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered bag of request parameters for an API method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBag {
    entries: Map<String, Value>,
}

impl ParamBag {
    /// Create an empty parameter bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, overwriting any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Merge a batch of parameters into the bag.
    ///
    /// Keys already present are overwritten, matching single-key `set`.
    pub fn merge<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in params {
            self.entries.insert(key.into(), value.into());
        }
    }

    /// Remove a parameter.
    ///
    /// Returns `true` if the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove all parameters
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up a parameter value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of parameters currently set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    ///
    /// An empty bag means the request goes out as a GET with no body.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }
}

impl From<Map<String, Value>> for ParamBag {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.merge(iter);
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut bag = ParamBag::new();
        bag.set("page_size", "999");
        bag.set("page_num", 2);

        assert_eq!(bag.get("page_size"), Some(&json!("999")));
        assert_eq!(bag.get("page_num"), Some(&json!(2)));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_set_overwrites() {
        let mut bag = ParamBag::new();
        bag.set("uniq_id", "ABC123");
        bag.set("uniq_id", "XYZ789");

        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("uniq_id"), Some(&json!("XYZ789")));
    }

    #[test]
    fn test_merge_later_keys_win() {
        let mut bag = ParamBag::new();
        bag.set("domain", "example.com");
        bag.merge(vec![("domain", "other.com"), ("page_size", "50")]);

        assert_eq!(bag.get("domain"), Some(&json!("other.com")));
        assert_eq!(bag.get("page_size"), Some(&json!("50")));
    }

    #[test]
    fn test_remove() {
        let mut bag = ParamBag::new();
        bag.set("domain", "example.com");

        assert!(bag.remove("domain"));
        assert!(!bag.remove("domain"));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut bag: ParamBag = vec![("a", 1), ("b", 2)].into_iter().collect();
        bag.clear();
        assert!(bag.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut bag = ParamBag::new();
        bag.set("zebra", 1);
        bag.set("apple", 2);
        bag.set("mango", 3);

        let keys: Vec<&String> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut bag = ParamBag::new();
        bag.set("domain", "example.com");
        bag.set("features", json!({"cores": 4, "memory": 4096}));

        let encoded = serde_json::to_string(&bag).unwrap();
        let decoded: ParamBag = serde_json::from_str(&encoded).unwrap();
        assert_eq!(bag, decoded);
    }
}
