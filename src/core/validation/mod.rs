//! Payload validation
//!
//! A [`Validator`] checks an attribute map against [`Rules`] and returns
//! per-field messages on failure. [`RuleValidator`] is the built-in
//! implementation; applications can plug in their own.

pub mod rules;
pub mod validators;

pub use rules::{ResourceRules, Rule, Rules, StaticRules};

use super::entity::AttributeMap;
use indexmap::IndexMap;

/// Field name → messages, in rule declaration order
pub type ValidationMessages = IndexMap<String, Vec<String>>;

/// Validation collaborator
pub trait Validator: Send + Sync {
    fn validate(&self, data: &AttributeMap, rules: &Rules) -> Result<(), ValidationMessages>;
}

/// Validator evaluating [`Rule`]s directly
///
/// Blank fields (missing, null, empty string or collection) only fail
/// [`Rule::Required`]; every other rule is skipped for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, data: &AttributeMap, rules: &Rules) -> Result<(), ValidationMessages> {
        let mut messages = ValidationMessages::new();

        for (field, field_rules) in rules.iter() {
            let value = data.get(field);
            let mut failures = Vec::new();

            if validators::is_blank(value) {
                if field_rules.iter().any(|r| matches!(r, Rule::Required)) {
                    failures.extend(validators::required(field, value).err());
                }
            } else if let Some(value) = value {
                failures.extend(
                    field_rules
                        .iter()
                        .filter_map(|rule| rule.check(field, value).err()),
                );
            }

            if !failures.is_empty() {
                messages.insert(field.to_string(), failures);
            }
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(messages)
        }
    }
}
