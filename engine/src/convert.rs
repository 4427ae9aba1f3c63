//! Raw string to [`Value`] conversion.

use cmdtree_core::{ParserInfo, SetterConvention, Value};

use crate::error::{ParseError, Result};

/// Converts `raw` with `parser`; `name` prefixes any error message.
pub fn convert(parser: &ParserInfo, raw: &str, name: &str) -> Result<Value> {
    match parser {
        ParserInfo::Identity => Ok(Value::Str(raw.to_string())),
        ParserInfo::Constructor(parse) | ParserInfo::DirectMethod(parse) => {
            parse(raw).map_err(|message| conversion(name, message))
        }
        ParserInfo::BoolOutMethod(try_parse) => {
            try_parse(raw).ok_or_else(|| conversion(name, invalid_value(raw)))
        }
        ParserInfo::AutoHandled(convention) => {
            run_setter(convention, raw, name)?;
            Ok(Value::Str(raw.to_string()))
        }
        ParserInfo::Invalid(diagnostic) => Err(conversion(name, diagnostic.clone())),
    }
}

fn run_setter(convention: &SetterConvention, raw: &str, name: &str) -> Result<()> {
    match convention {
        SetterConvention::Unit(set) => set(raw).map_err(|message| conversion(name, message)),
        SetterConvention::Bool(set) => {
            if set(raw) {
                Ok(())
            } else {
                Err(conversion(name, invalid_value(raw)))
            }
        }
        SetterConvention::ExitCode(set) => match set(raw) {
            0 => Ok(()),
            code => Err(ParseError::SetterExit {
                name: name.to_string(),
                code,
            }),
        },
        SetterConvention::Message(set) => match set(raw) {
            None => Ok(()),
            Some(message) => Err(conversion(name, message)),
        },
        SetterConvention::Error(set) => match set(raw) {
            None => Ok(()),
            Some(err) => Err(conversion(name, err.to_string())),
        },
    }
}

/// Value of a flag occurrence.
///
/// A bare flag toggles its default; an inline `true`/`false` (any case) sets
/// it explicitly.
pub fn convert_flag(inline: Option<&str>, default: bool, name: &str) -> Result<Value> {
    match inline {
        None => Ok(Value::Bool(!default)),
        Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        Some(raw) => Err(conversion(
            name,
            format!("invalid value '{raw}', expected true or false"),
        )),
    }
}

fn conversion(name: &str, message: String) -> ParseError {
    ParseError::Conversion {
        name: name.to_string(),
        message,
    }
}

fn invalid_value(raw: &str) -> String {
    format!("invalid value '{raw}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        assert_eq!(
            convert(&ParserInfo::Identity, "x y", "--name"),
            Ok(Value::from("x y"))
        );
    }

    #[test]
    fn test_direct_method_message_is_prefixed() {
        let err = convert(&ParserInfo::from_str::<i64>(), "abc", "<A>").unwrap_err();
        assert_eq!(err.to_string(), "<A>: invalid digit found in string");
    }

    #[test]
    fn test_constructor_error_surfaces_verbatim() {
        let parser = ParserInfo::constructor(|raw| {
            if raw.contains("://") {
                Ok(Value::from(raw))
            } else {
                Err(format!("'{raw}' is not an absolute URI"))
            }
        });
        let err = convert(&parser, "example", "--url").unwrap_err();
        assert_eq!(err.to_string(), "--url: 'example' is not an absolute URI");
    }

    #[test]
    fn test_bool_out_method_false_is_generic_error() {
        let parser = ParserInfo::try_parse(|raw| raw.parse::<u8>().ok().map(|n| Value::Int(n.into())));
        assert_eq!(convert(&parser, "7", "--n"), Ok(Value::Int(7)));
        assert_eq!(
            convert(&parser, "300", "--n").unwrap_err().to_string(),
            "--n: invalid value '300'"
        );
    }

    #[test]
    fn test_setter_conventions() {
        let unit = ParserInfo::AutoHandled(SetterConvention::unit(|raw| {
            if raw.is_empty() {
                Err("empty".to_string())
            } else {
                Ok(())
            }
        }));
        assert_eq!(convert(&unit, "a", "--s"), Ok(Value::from("a")));
        assert_eq!(convert(&unit, "", "--s").unwrap_err().to_string(), "--s: empty");

        let boolean = ParserInfo::AutoHandled(SetterConvention::boolean(|raw| raw == "ok"));
        assert!(convert(&boolean, "ok", "--s").is_ok());
        assert!(convert(&boolean, "no", "--s").is_err());

        let exit = ParserInfo::AutoHandled(SetterConvention::exit_code(|raw| {
            raw.parse().unwrap_or(1)
        }));
        assert!(convert(&exit, "0", "--s").is_ok());
        assert_eq!(
            convert(&exit, "9", "--s"),
            Err(ParseError::SetterExit {
                name: "--s".into(),
                code: 9
            })
        );

        let message = ParserInfo::AutoHandled(SetterConvention::message(|raw| {
            (raw.len() > 3).then(|| "too long".to_string())
        }));
        assert!(convert(&message, "abc", "--s").is_ok());
        assert_eq!(
            convert(&message, "abcd", "--s").unwrap_err().to_string(),
            "--s: too long"
        );

        let error = ParserInfo::AutoHandled(SetterConvention::error(|raw| {
            raw.parse::<i32>().err().map(|e| e.into())
        }));
        assert!(convert(&error, "12", "--s").is_ok());
        assert!(convert(&error, "x", "--s").is_err());
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(convert_flag(None, false, "--f"), Ok(Value::Bool(true)));
        assert_eq!(convert_flag(None, true, "--f"), Ok(Value::Bool(false)));
        assert_eq!(convert_flag(Some("False"), false, "--f"), Ok(Value::Bool(false)));
        assert_eq!(convert_flag(Some("TRUE"), false, "--f"), Ok(Value::Bool(true)));
        assert!(convert_flag(Some("yes"), false, "--f").is_err());
    }
}
