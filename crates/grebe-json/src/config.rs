//! Process-wide hard limits.
//!
//! Hard limits come from a configuration mapping handed to the converter
//! once at construction. Per-call requests may lower them but never raise
//! them. A configured `"0"` means unlimited and maps to `None` internally.

use crate::error::ConvertError;
use std::collections::HashMap;

/// Recognized configuration keys
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ConfigKey {
    /// Maximum traversal depth (non-scalar ancestry)
    MaxDepth,
    /// Maximum number of elements emitted per collection
    MaxCollectionSize,
    /// Maximum total number of nodes visited in one call
    MaxObjects,
}

impl ConfigKey {
    /// Wire name of the key
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::MaxDepth => "maxDepth",
            ConfigKey::MaxCollectionSize => "maxCollectionSize",
            ConfigKey::MaxObjects => "maxObjects",
        }
    }

    /// Built-in default, used when the key is absent. All limits default
    /// to unlimited; bounding is opt-in.
    pub fn default_value(self) -> &'static str {
        "0"
    }
}

/// Parsed hard limits
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessingConfig {
    max_depth: Option<usize>,
    max_collection_size: Option<usize>,
    max_objects: Option<usize>,
}

impl ProcessingConfig {
    /// Build directly from already-resolved limits (`None` = unlimited)
    pub fn new(
        max_depth: Option<usize>,
        max_collection_size: Option<usize>,
        max_objects: Option<usize>,
    ) -> Self {
        Self {
            max_depth,
            max_collection_size,
            max_objects,
        }
    }

    /// Parse a configuration mapping. Each present key must hold a
    /// non-negative integer string; `"0"` means unlimited; absent keys
    /// fall back to their built-in defaults.
    pub fn from_map(config: &HashMap<ConfigKey, String>) -> Result<Self, ConvertError> {
        Ok(Self {
            max_depth: parse_limit(ConfigKey::MaxDepth, config)?,
            max_collection_size: parse_limit(ConfigKey::MaxCollectionSize, config)?,
            max_objects: parse_limit(ConfigKey::MaxObjects, config)?,
        })
    }

    /// Hard limit for one dimension, `None` when unlimited
    pub fn limit(&self, key: ConfigKey) -> Option<usize> {
        match key {
            ConfigKey::MaxDepth => self.max_depth,
            ConfigKey::MaxCollectionSize => self.max_collection_size,
            ConfigKey::MaxObjects => self.max_objects,
        }
    }
}

fn parse_limit(
    key: ConfigKey,
    config: &HashMap<ConfigKey, String>,
) -> Result<Option<usize>, ConvertError> {
    let raw = config
        .get(&key)
        .map(String::as_str)
        .unwrap_or_else(|| key.default_value());
    let parsed: usize = raw.trim().parse().map_err(|_| ConvertError::BadConfig {
        key: key.as_str(),
        value: raw.to_string(),
    })?;
    Ok(if parsed == 0 { None } else { Some(parsed) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_keys_are_unlimited() {
        let config = ProcessingConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.limit(ConfigKey::MaxDepth), None);
        assert_eq!(config.limit(ConfigKey::MaxCollectionSize), None);
        assert_eq!(config.limit(ConfigKey::MaxObjects), None);
    }

    #[test]
    fn test_zero_means_unlimited() {
        let mut map = HashMap::new();
        map.insert(ConfigKey::MaxDepth, "0".to_string());
        map.insert(ConfigKey::MaxObjects, "100".to_string());
        let config = ProcessingConfig::from_map(&map).unwrap();
        assert_eq!(config.limit(ConfigKey::MaxDepth), None);
        assert_eq!(config.limit(ConfigKey::MaxObjects), Some(100));
    }

    #[test]
    fn test_malformed_value_is_rejected() {
        let mut map = HashMap::new();
        map.insert(ConfigKey::MaxCollectionSize, "many".to_string());
        let err = ProcessingConfig::from_map(&map).unwrap_err();
        assert!(matches!(err, ConvertError::BadConfig { key, .. } if key == "maxCollectionSize"));
    }
}
