//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::includes::DEFAULT_RECURSION_LIMIT;
use crate::core::limit::{LimitPolicy, deserialize_limit};
use crate::core::manager::DEFAULT_RESOURCE_KEY;
use crate::core::store::Fillable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for one exposed resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceConfig {
    /// Route segment (e.g., "posts" → `/posts`, `/posts/{id}`)
    pub name: String,

    /// Key wrapping a single item, in responses and request bodies
    #[serde(default = "default_key")]
    pub singular_key: String,

    /// Key wrapping a collection in responses
    #[serde(default = "default_key")]
    pub plural_key: String,

    /// Page size when the request gives none; `0`, `false` or absent means no limit
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub default_limit: Option<usize>,

    /// Ceiling for requested page sizes; `0`, `false` or absent means none
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub maximum_limit: Option<usize>,

    /// Fields clients may set through create/update
    #[serde(default)]
    pub fillable: Fillable,

    /// Camel-case include names before they reach transformers
    #[serde(default)]
    pub camel_case_includes: bool,
}

fn default_key() -> String {
    DEFAULT_RESOURCE_KEY.to_string()
}

fn default_recursion_limit() -> usize {
    DEFAULT_RECURSION_LIMIT
}

impl ResourceConfig {
    /// Config with `data` keys, no limits and nothing fillable
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            singular_key: default_key(),
            plural_key: default_key(),
            default_limit: None,
            maximum_limit: None,
            fillable: Fillable::default(),
            camel_case_includes: false,
        }
    }

    pub fn with_keys(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.singular_key = singular.into();
        self.plural_key = plural.into();
        self
    }

    pub fn with_limits(mut self, default: Option<usize>, maximum: Option<usize>) -> Self {
        self.default_limit = default.filter(|l| *l > 0);
        self.maximum_limit = maximum.filter(|l| *l > 0);
        self
    }

    pub fn with_fillable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fillable = Fillable::new(fields);
        self
    }

    pub fn with_camel_case_includes(mut self, enabled: bool) -> Self {
        self.camel_case_includes = enabled;
        self
    }

    pub fn limits(&self) -> LimitPolicy {
        LimitPolicy::new(self.default_limit, self.maximum_limit)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidResource {
            name: self.name.clone(),
            message: message.to_string(),
        };

        if self.name.is_empty() || self.name.contains('/') || self.name.contains('{') {
            return Err(invalid("name must be a single non-empty path segment"));
        }
        if self.singular_key.is_empty() || self.plural_key.is_empty() {
            return Err(invalid("resource keys must not be empty"));
        }
        if self.singular_key == "meta" || self.plural_key == "meta" {
            return Err(invalid("'meta' is reserved and cannot be a resource key"));
        }
        Ok(())
    }
}

/// Complete configuration for an API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Maximum include nesting depth
    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: usize,

    /// Exposed resources
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            resources: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Find a resource by route name
    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            resource.check()?;
            if !seen.insert(resource.name.as_str()) {
                return Err(ConfigError::DuplicateResource {
                    name: resource.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
recursion_limit: 4
resources:
  - name: posts
    singular_key: post
    plural_key: posts
    default_limit: 10
    maximum_limit: 50
    fillable: [title, body]
  - name: users
    default_limit: false
    camel_case_includes: true
"#;

    #[test]
    fn test_yaml_parsing() {
        let config = ApiConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(config.recursion_limit, 4);
        let posts = config.resource("posts").unwrap();
        assert_eq!(posts.singular_key, "post");
        assert_eq!(posts.limits(), LimitPolicy::new(Some(10), Some(50)));
        assert!(posts.fillable.allows("title"));

        let users = config.resource("users").unwrap();
        assert_eq!(users.singular_key, "data");
        assert_eq!(users.plural_key, "data");
        assert_eq!(users.default_limit, None);
        assert!(users.camel_case_includes);
        assert!(config.resource("comments").is_none());
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_yaml_str("resources: []").unwrap();
        assert_eq!(config.recursion_limit, DEFAULT_RECURSION_LIMIT);
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let yaml = "resources:\n  - name: posts\n  - name: posts\n";
        let err = ApiConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateResource { name } if name == "posts"));
    }

    #[test]
    fn test_reserved_meta_key_rejected() {
        let yaml = "resources:\n  - name: posts\n    plural_key: meta\n";
        let err = ApiConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidResource { .. }));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = ApiConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.resources.len(), 2);

        let missing = ApiConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_resources() {
        let config = ApiConfig::from_yaml_str(YAML).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = ApiConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
