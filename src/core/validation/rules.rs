//! Declarative validation rules

use super::validators;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Closure signature shared by custom rules and the built-in validators
pub type CheckFn = dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync;

/// One constraint on a field
#[derive(Clone)]
pub enum Rule {
    /// Field must be present and non-empty
    Required,
    String,
    Integer,
    Numeric,
    Boolean,
    Email,
    /// Minimum length, item count or value
    Min(f64),
    /// Maximum length, item count or value
    Max(f64),
    /// Value must be one of these
    In(Vec<String>),
    /// String must match
    Pattern(Regex),
    /// String must parse with this chrono format
    Date(String),
    /// Arbitrary check, e.g. uniqueness against a store
    Custom(Arc<CheckFn>),
}

impl Rule {
    /// Wrap a closure as a rule
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(check))
    }

    /// Check a present, non-blank value
    pub fn check(&self, field: &str, value: &Value) -> Result<(), String> {
        match self {
            Rule::Required => validators::required(field, Some(value)),
            Rule::String => validators::string()(field, value),
            Rule::Integer => validators::integer()(field, value),
            Rule::Numeric => validators::numeric()(field, value),
            Rule::Boolean => validators::boolean()(field, value),
            Rule::Email => validators::email()(field, value),
            Rule::Min(n) => validators::min(*n)(field, value),
            Rule::Max(n) => validators::max(*n)(field, value),
            Rule::In(allowed) => validators::in_list(allowed.clone())(field, value),
            Rule::Pattern(regex) => validators::pattern(regex.clone())(field, value),
            Rule::Date(format) => validators::date_format(format.clone())(field, value),
            Rule::Custom(check) => check(field, value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("Required"),
            Rule::String => f.write_str("String"),
            Rule::Integer => f.write_str("Integer"),
            Rule::Numeric => f.write_str("Numeric"),
            Rule::Boolean => f.write_str("Boolean"),
            Rule::Email => f.write_str("Email"),
            Rule::Min(n) => write!(f, "Min({})", n),
            Rule::Max(n) => write!(f, "Max({})", n),
            Rule::In(allowed) => write!(f, "In({:?})", allowed),
            Rule::Pattern(regex) => write!(f, "Pattern({})", regex.as_str()),
            Rule::Date(format) => write!(f, "Date({})", format),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Rules per field, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Rules(IndexMap<String, Vec<Rule>>);

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for a field (appends if the field already has some)
    pub fn field<I>(mut self, name: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        self.0.entry(name.into()).or_default().extend(rules);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Rules a resource applies to incoming payloads
///
/// Update rules receive the target identifier so that checks such as
/// "unique except this record" can exclude it.
pub trait ResourceRules: Send + Sync {
    fn rules_for_create(&self) -> Rules {
        Rules::new()
    }

    fn rules_for_update(&self, _id: &str) -> Rules {
        Rules::new()
    }
}

/// No validation
impl ResourceRules for () {}

/// Fixed rule sets for create and update
#[derive(Debug, Clone, Default)]
pub struct StaticRules {
    pub create: Rules,
    pub update: Rules,
}

impl StaticRules {
    /// Use the same rules for both operations
    pub fn same(rules: Rules) -> Self {
        Self {
            create: rules.clone(),
            update: rules,
        }
    }
}

impl ResourceRules for StaticRules {
    fn rules_for_create(&self) -> Rules {
        self.create.clone()
    }

    fn rules_for_update(&self, _id: &str) -> Rules {
        self.update.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_appends_in_order() {
        let rules = Rules::new()
            .field("title", [Rule::Required])
            .field("body", [Rule::String])
            .field("title", [Rule::Max(10.0)]);

        let fields: Vec<&str> = rules.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["title", "body"]);
        assert_eq!(rules.iter().next().map(|(_, r)| r.len()), Some(2));
    }

    #[test]
    fn test_custom_rule() {
        let rule = Rule::custom(|field, value| {
            if value == &json!("taken") {
                Err(format!("The {} has already been taken.", field))
            } else {
                Ok(())
            }
        });
        assert!(rule.check("slug", &json!("free")).is_ok());
        assert!(rule.check("slug", &json!("taken")).is_err());
        assert_eq!(format!("{:?}", rule), "Custom(..)");
    }

    #[test]
    fn test_update_rules_see_identifier() {
        struct Slugs;

        impl ResourceRules for Slugs {
            fn rules_for_update(&self, id: &str) -> Rules {
                let id = id.to_string();
                Rules::new().field(
                    "slug",
                    [Rule::custom(move |_, _| {
                        if id == "1" { Ok(()) } else { Err("taken".to_string()) }
                    })],
                )
            }
        }

        let rules = Slugs.rules_for_update("1");
        let (_, slug_rules) = rules.iter().next().unwrap();
        assert!(slug_rules[0].check("slug", &json!("x")).is_ok());
        assert!(Slugs.rules_for_create().is_empty());
    }
}
