//! Page size resolution
//!
//! A limit of `None` means "no limit": the whole result set is returned and no
//! pagination cursor is attached. A configured or requested `0` is the same
//! thing.

use serde::{Deserialize, Deserializer};

/// Per-resource limit policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Used when the request carries no usable limit
    pub default: Option<usize>,

    /// Ceiling applied to whatever limit wins
    pub maximum: Option<usize>,
}

impl LimitPolicy {
    pub fn new(default: Option<usize>, maximum: Option<usize>) -> Self {
        Self {
            default: default.filter(|l| *l > 0),
            maximum: maximum.filter(|l| *l > 0),
        }
    }

    /// Resolve the effective limit for a raw `limit` query value
    ///
    /// Missing, zero and non-numeric values fall back to the default. A
    /// maximum only clamps a limit that exceeds it; "no limit" stays unlimited.
    ///
    /// # Examples
    ///
    /// ```
    /// use skeleton::core::limit::LimitPolicy;
    ///
    /// let policy = LimitPolicy::new(Some(10), Some(50));
    /// assert_eq!(policy.effective(None), Some(10));
    /// assert_eq!(policy.effective(Some("100")), Some(50));
    /// assert_eq!(policy.effective(Some("5")), Some(5));
    /// ```
    pub fn effective(&self, requested: Option<&str>) -> Option<usize> {
        let requested = requested.map(coerce_count).filter(|l| *l > 0);

        match (requested.or(self.default), self.maximum) {
            (Some(limit), Some(max)) if limit > max => Some(max),
            (limit, _) => limit,
        }
    }
}

/// Coerce a query value to a non-negative count
///
/// Leading whitespace is ignored and the longest run of leading digits is
/// used, so `"12abc"` is 12. Anything else, including negative numbers,
/// becomes 0.
pub fn coerce_count(raw: &str) -> usize {
    let digits: String = raw
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return 0;
    }

    digits.parse().unwrap_or(usize::MAX)
}

/// Deserialize a limit setting: an integer, `0`, `false` or `null`
///
/// Everything but a positive integer means "no limit".
pub fn deserialize_limit<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Setting {
        Count(usize),
        Flag(bool),
    }

    let setting = Option::<Setting>::deserialize(deserializer)?;
    match setting {
        Some(Setting::Count(0)) | Some(Setting::Flag(false)) | None => Ok(None),
        Some(Setting::Count(n)) => Ok(Some(n)),
        Some(Setting::Flag(true)) => Err(serde::de::Error::custom(
            "limit must be a positive integer, 0, false or null",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit_table() {
        let policy = LimitPolicy::new(Some(10), Some(50));
        assert_eq!(policy.effective(Some("0")), Some(10));
        assert_eq!(policy.effective(Some("100")), Some(50));
        assert_eq!(policy.effective(Some("5")), Some(5));
        assert_eq!(policy.effective(Some("50")), Some(50));
    }

    #[test]
    fn test_non_numeric_limit_uses_default() {
        let policy = LimitPolicy::new(Some(10), None);
        assert_eq!(policy.effective(Some("abc")), Some(10));
        assert_eq!(policy.effective(Some("-5")), Some(10));
        assert_eq!(policy.effective(Some("")), Some(10));
    }

    #[test]
    fn test_no_default_no_request_is_unlimited() {
        let policy = LimitPolicy::new(None, Some(50));
        assert_eq!(policy.effective(None), None);
        assert_eq!(policy.effective(Some("20")), Some(20));
        assert_eq!(policy.effective(Some("70")), Some(50));
    }

    #[test]
    fn test_default_above_maximum_is_clamped() {
        let policy = LimitPolicy::new(Some(100), Some(25));
        assert_eq!(policy.effective(None), Some(25));
    }

    #[test]
    fn test_zero_settings_mean_no_limit() {
        let policy = LimitPolicy::new(Some(0), Some(0));
        assert_eq!(policy, LimitPolicy::default());
        assert_eq!(policy.effective(Some("1000")), Some(1000));
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("42"), 42);
        assert_eq!(coerce_count("  7"), 7);
        assert_eq!(coerce_count("12abc"), 12);
        assert_eq!(coerce_count("+3"), 3);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count("-1"), 0);
        assert_eq!(coerce_count("99999999999999999999999999"), usize::MAX);
    }

    #[test]
    fn test_deserialize_limit_settings() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default, deserialize_with = "deserialize_limit")]
            limit: Option<usize>,
        }

        let parse = |s: &str| serde_json::from_str::<Wrapper>(s).map(|w| w.limit);
        assert_eq!(parse(r#"{"limit": 15}"#).unwrap(), Some(15));
        assert_eq!(parse(r#"{"limit": 0}"#).unwrap(), None);
        assert_eq!(parse(r#"{"limit": false}"#).unwrap(), None);
        assert_eq!(parse(r#"{"limit": null}"#).unwrap(), None);
        assert_eq!(parse(r#"{}"#).unwrap(), None);
        assert!(parse(r#"{"limit": true}"#).is_err());
    }
}
