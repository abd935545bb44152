//! Credential values and key-to-name mappings.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

/// Per-sink mapping from abstract credential key to destination name.
///
/// e.g. `secretAccessKey` -> `DEPLOY_AWS_SECRET`
pub type KeyToName = BTreeMap<String, String>;

/// Fresh credential values produced by one source read.
///
/// Values are wiped from memory when the set is dropped. Keys iterate in
/// sorted order.
#[derive(Default)]
pub struct CredentialSet {
    values: BTreeMap<String, Zeroizing<String>>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(key.into(), Zeroizing::new(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

// Values are never printed.
impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_sorted() {
        let set: CredentialSet = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(set.get("b"), Some("2"));
    }

    #[test]
    fn test_debug_hides_values() {
        let set: CredentialSet = [("secret", "hunter2")].into_iter().collect();
        let dbg = format!("{:?}", set);
        assert!(dbg.contains("secret"));
        assert!(!dbg.contains("hunter2"));
    }
}
