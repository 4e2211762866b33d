use std::fmt;

use serde::{Deserialize, Serialize};

/// What `to_dictionary` does when two elements map to the same key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Later values overwrite earlier ones; the key keeps its first position
    #[default]
    LastWins,
    /// The first value for a key is kept, later ones are ignored
    FirstWins,
    /// A duplicate key fails with `InvalidArgument`
    Reject,
}

type Validator<T> = Box<dyn Fn(&T) -> bool>;

/// Options for [`crate::Sequence::to_dictionary_with`]
pub struct ToDictionaryOptions<K, V> {
    pub duplicate_keys: DuplicateKeyPolicy,
    pub initial_capacity: usize,
    /// Every computed key must pass, otherwise `InvalidArgument`
    pub key_validator: Option<Validator<K>>,
    /// Every value must pass, otherwise `InvalidArgument`
    pub item_validator: Option<Validator<V>>,
}

impl<K, V> Default for ToDictionaryOptions<K, V> {
    fn default() -> Self {
        ToDictionaryOptions {
            duplicate_keys: DuplicateKeyPolicy::LastWins,
            initial_capacity: 0,
            key_validator: None,
            item_validator: None,
        }
    }
}

impl<K, V> ToDictionaryOptions<K, V> {
    pub fn duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn key_validator(mut self, validator: impl Fn(&K) -> bool + 'static) -> Self {
        self.key_validator = Some(Box::new(validator));
        self
    }

    pub fn item_validator(mut self, validator: impl Fn(&V) -> bool + 'static) -> Self {
        self.item_validator = Some(Box::new(validator));
        self
    }

    pub(crate) fn accepts_key(&self, key: &K) -> bool {
        self.key_validator.as_ref().is_none_or(|valid| valid(key))
    }

    pub(crate) fn accepts_item(&self, item: &V) -> bool {
        self.item_validator.as_ref().is_none_or(|valid| valid(item))
    }
}

impl<K, V> fmt::Debug for ToDictionaryOptions<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToDictionaryOptions")
            .field("duplicate_keys", &self.duplicate_keys)
            .field("initial_capacity", &self.initial_capacity)
            .field("key_validator", &self.key_validator.is_some())
            .field("item_validator", &self.item_validator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ToDictionaryOptions::<String, i32>::default();
        assert_eq!(options.duplicate_keys, DuplicateKeyPolicy::LastWins);
        assert!(options.accepts_key(&"anything".to_string()));
        assert!(options.accepts_item(&-1));
    }

    #[test]
    fn test_validators() {
        let options = ToDictionaryOptions::<String, i32>::default()
            .key_validator(|k| !k.is_empty())
            .item_validator(|v| *v >= 0);
        assert!(!options.accepts_key(&String::new()));
        assert!(!options.accepts_item(&-1));
        assert!(options.accepts_item(&1));
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&DuplicateKeyPolicy::FirstWins).unwrap();
        assert_eq!(json, "\"FirstWins\"");
        let back: DuplicateKeyPolicy = serde_json::from_str("\"Reject\"").unwrap();
        assert_eq!(back, DuplicateKeyPolicy::Reject);
    }
}
