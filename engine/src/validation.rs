//! Validator runner.
//!
//! Validators run after every slot has converted successfully, in
//! declaration order. The first failure stops the chain for that value.

use cmdtree_core::{Value, ValidatorInfo};

use crate::error::{ParseError, Result};

/// Applies `validators` to `value`. Sequences are checked element by element.
pub fn validate(validators: &[ValidatorInfo], value: &Value, name: &str) -> Result<()> {
    if validators.is_empty() {
        return Ok(());
    }
    match value {
        Value::List(items) => items
            .iter()
            .try_for_each(|item| validate_one(validators, item, name)),
        single => validate_one(validators, single, name),
    }
}

fn validate_one(validators: &[ValidatorInfo], value: &Value, name: &str) -> Result<()> {
    for validator in validators {
        let failure = match validator {
            ValidatorInfo::Bool { check, message } => (!check(value)).then(|| {
                message
                    .clone()
                    .unwrap_or_else(|| format!("invalid value '{value}'"))
            }),
            ValidatorInfo::Exception(check) => check(value).map(|err| err.to_string()),
            ValidatorInfo::Message(check) => check(value),
            ValidatorInfo::Property { name: property, accessor } => (!accessor(value))
                .then(|| format!("value '{value}' does not satisfy {property}")),
        };

        if let Some(message) = failure {
            return Err(ParseError::Validation {
                name: name.to_string(),
                message,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_bool_validator_default_and_configured_message() {
        let positive = ValidatorInfo::check(|v| v.as_int().is_some_and(|n| n > 0));
        let err = validate(&[positive.clone()], &Value::Int(-1), "--count").unwrap_err();
        assert_eq!(err.to_string(), "--count: invalid value '-1'");

        let configured = positive.with_message("must be positive");
        let err = validate(&[configured], &Value::Int(0), "--count").unwrap_err();
        assert_eq!(err.to_string(), "--count: must be positive");
    }

    #[test]
    fn test_exception_and_message_validators() {
        let exception = ValidatorInfo::exception(|v| {
            v.as_str()
                .filter(|s| s.is_empty())
                .map(|_| "must not be empty".into())
        });
        assert!(validate(&[exception.clone()], &Value::from("x"), "<NAME>").is_ok());
        assert_eq!(
            validate(&[exception], &Value::from(""), "<NAME>")
                .unwrap_err()
                .to_string(),
            "<NAME>: must not be empty"
        );

        let message = ValidatorInfo::message(|v| {
            (v.as_int() == Some(13)).then(|| "unlucky".to_string())
        });
        assert!(validate(&[message.clone()], &Value::Int(12), "<N>").is_ok());
        assert!(validate(&[message], &Value::Int(13), "<N>").is_err());
    }

    #[test]
    fn test_property_validator() {
        let absolute = ValidatorInfo::property("is_absolute", |v| {
            v.as_str().is_some_and(|s| s.starts_with('/'))
        });
        let err = validate(&[absolute], &Value::from("tmp"), "--dir").unwrap_err();
        assert_eq!(
            err.to_string(),
            "--dir: value 'tmp' does not satisfy is_absolute"
        );
    }

    #[test]
    fn test_first_failure_stops_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let validators = vec![
            ValidatorInfo::check(|_| false),
            ValidatorInfo::check(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ];
        assert!(validate(&validators, &Value::Int(1), "--x").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sequences_are_checked_per_element() {
        let short = ValidatorInfo::check(|v| v.as_str().is_some_and(|s| s.len() <= 3));
        let ok = Value::from(vec!["a", "bb"]);
        let bad = Value::from(vec!["a", "long"]);
        assert!(validate(&[short.clone()], &ok, "--tag").is_ok());
        assert_eq!(
            validate(&[short], &bad, "--tag").unwrap_err().to_string(),
            "--tag: invalid value 'long'"
        );
    }
}
