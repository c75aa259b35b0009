//! Reusable field validators
//!
//! Each validator checks one present, non-empty value. Absence is handled by
//! [`Rule::Required`](super::rules::Rule::Required) before any of these run.

use serde_json::Value;
use validator::ValidateEmail;

/// `first_name` → `first name`, as used in messages
pub fn display_name(field: &str) -> String {
    field.replace('_', " ")
}

fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Whether a value counts as "not provided"
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Validator: field must be present and non-empty
pub fn required(field: &str, value: Option<&Value>) -> Result<(), String> {
    if is_blank(value) {
        Err(format!("The {} field is required.", display_name(field)))
    } else {
        Ok(())
    }
}

/// Validator: value must be a string
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_string() {
            Ok(())
        } else {
            Err(format!("The {} must be a string.", display_name(field)))
        }
    }
}

/// Validator: value must be an integer (numeric strings accepted)
pub fn integer() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        let ok = match value {
            Value::Number(n) => n.is_i64() || n.is_u64(),
            Value::String(s) => s.trim().parse::<i64>().is_ok(),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("The {} must be an integer.", display_name(field)))
        }
    }
}

/// Validator: value must be a number (numeric strings accepted)
pub fn numeric() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if as_number(value).is_some() {
            Ok(())
        } else {
            Err(format!("The {} must be a number.", display_name(field)))
        }
    }
}

/// Validator: value must be a boolean, 0/1 or "0"/"1"
pub fn boolean() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        let ok = match value {
            Value::Bool(_) => true,
            Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
            Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(format!(
                "The {} field must be true or false.",
                display_name(field)
            ))
        }
    }
}

/// Validator: value must be an email address
pub fn email() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if s.validate_email() => Ok(()),
        _ => Err(format!(
            "The {} must be a valid email address.",
            display_name(field)
        )),
    }
}

/// Validator: size must be at least `min`
///
/// Size is the character count for strings, the item count for arrays and
/// the value itself for numbers.
pub fn min(min: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::String(s) if (s.chars().count() as f64) < min => Err(format!(
            "The {} must be at least {} characters.",
            display_name(field),
            fmt_number(min)
        )),
        Value::Array(items) if (items.len() as f64) < min => Err(format!(
            "The {} must have at least {} items.",
            display_name(field),
            fmt_number(min)
        )),
        Value::Number(n) if n.as_f64().is_some_and(|n| n < min) => Err(format!(
            "The {} must be at least {}.",
            display_name(field),
            fmt_number(min)
        )),
        _ => Ok(()),
    }
}

/// Validator: size must not exceed `max`
pub fn max(max: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::String(s) if (s.chars().count() as f64) > max => Err(format!(
            "The {} may not be greater than {} characters.",
            display_name(field),
            fmt_number(max)
        )),
        Value::Array(items) if (items.len() as f64) > max => Err(format!(
            "The {} may not have more than {} items.",
            display_name(field),
            fmt_number(max)
        )),
        Value::Number(n) if n.as_f64().is_some_and(|n| n > max) => Err(format!(
            "The {} may not be greater than {}.",
            display_name(field),
            fmt_number(max)
        )),
        _ => Ok(()),
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let candidate = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(format!("The selected {} is invalid.", display_name(field))),
        };
        if allowed.contains(&candidate) {
            Ok(())
        } else {
            Err(format!("The selected {} is invalid.", display_name(field)))
        }
    }
}

/// Validator: string must match the pattern
pub fn pattern(
    regex: regex::Regex,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if regex.is_match(s) => Ok(()),
        _ => Err(format!("The {} format is invalid.", display_name(field))),
    }
}

/// Validator: date must match format
pub fn date_format(
    format: String,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let parsed = value.as_str().is_some_and(|s| {
            chrono::NaiveDateTime::parse_from_str(s, &format).is_ok()
                || chrono::NaiveDate::parse_from_str(s, &format).is_ok()
        });
        if parsed {
            Ok(())
        } else {
            Err(format!(
                "The {} does not match the format {}.",
                display_name(field),
                format
            ))
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === required() ===

    #[test]
    fn test_required_rejects_blank_values() {
        assert!(required("title", None).is_err());
        assert!(required("title", Some(&json!(null))).is_err());
        assert!(required("title", Some(&json!("   "))).is_err());
        assert!(required("tags", Some(&json!([]))).is_err());
        assert_eq!(
            required("first_name", None).unwrap_err(),
            "The first name field is required."
        );
    }

    #[test]
    fn test_required_accepts_falsy_scalars() {
        assert!(required("count", Some(&json!(0))).is_ok());
        assert!(required("active", Some(&json!(false))).is_ok());
    }

    // === type checks ===

    #[test]
    fn test_type_validators() {
        assert!(string()("name", &json!("x")).is_ok());
        assert!(string()("name", &json!(1)).is_err());

        assert!(integer()("age", &json!(3)).is_ok());
        assert!(integer()("age", &json!("42")).is_ok());
        assert!(integer()("age", &json!(3.5)).is_err());

        assert!(numeric()("price", &json!(3.5)).is_ok());
        assert!(numeric()("price", &json!("3.5")).is_ok());
        assert!(numeric()("price", &json!("abc")).is_err());

        assert!(boolean()("active", &json!(true)).is_ok());
        assert!(boolean()("active", &json!(1)).is_ok());
        assert!(boolean()("active", &json!("yes")).is_err());
    }

    #[test]
    fn test_email() {
        assert!(email()("email", &json!("ada@example.com")).is_ok());
        let err = email()("email", &json!("not-an-email")).unwrap_err();
        assert_eq!(err, "The email must be a valid email address.");
    }

    // === min() / max() ===

    #[test]
    fn test_min_by_kind() {
        let v = min(3.0);
        assert_eq!(
            v("title", &json!("ab")).unwrap_err(),
            "The title must be at least 3 characters."
        );
        assert!(v("title", &json!("abc")).is_ok());
        assert!(v("tags", &json!([1])).is_err());
        assert_eq!(
            v("age", &json!(2)).unwrap_err(),
            "The age must be at least 3."
        );
    }

    #[test]
    fn test_max_by_kind() {
        let v = max(5.0);
        assert!(v("title", &json!("abcdef")).is_err());
        assert!(v("title", &json!("abcde")).is_ok());
        assert!(v("score", &json!(5.5)).is_err());
        assert!(v("tags", &json!([1, 2, 3, 4, 5, 6])).is_err());
    }

    #[test]
    fn test_fractional_bounds_in_messages() {
        let err = max(2.5)("score", &json!(3)).unwrap_err();
        assert_eq!(err, "The score may not be greater than 2.5.");
    }

    // === in_list() / pattern() / date_format() ===

    #[test]
    fn test_in_list() {
        let v = in_list(vec!["draft".into(), "published".into()]);
        assert!(v("status", &json!("draft")).is_ok());
        assert_eq!(
            v("status", &json!("deleted")).unwrap_err(),
            "The selected status is invalid."
        );
    }

    #[test]
    fn test_pattern() {
        let v = pattern(regex::Regex::new("^[a-z-]+$").unwrap());
        assert!(v("slug", &json!("hello-world")).is_ok());
        assert!(v("slug", &json!("Hello World")).is_err());
    }

    #[test]
    fn test_date_format() {
        let v = date_format("%Y-%m-%d".to_string());
        assert!(v("published_on", &json!("2024-01-15")).is_ok());
        assert_eq!(
            v("published_on", &json!("15/01/2024")).unwrap_err(),
            "The published on does not match the format %Y-%m-%d."
        );

        let with_time = date_format("%Y-%m-%d %H:%M".to_string());
        assert!(with_time("at", &json!("2024-01-15 10:30")).is_ok());
    }
}
