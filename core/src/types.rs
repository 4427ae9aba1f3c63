//! Descriptors for options, flags, positional arguments, and the conversion
//! and validation conventions attached to them.
//!
//! These are produced once by a model builder and never change during a
//! parse run. Conversion conventions are chosen when the descriptor is
//! built; the engine only dispatches on the variant.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::casing::{kebab, screaming_kebab};
use crate::value::Value;

/// Boxed error type used by command handlers and exception-style
/// validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fallible single-string conversion.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Try-parse conversion: `None` means the input was rejected.
pub type TryParseFn = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// How a raw string is turned into a [`Value`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ParserInfo, Value};
///
/// let int = ParserInfo::from_str::<i64>();
/// assert_eq!(int.kind(), "direct-method");
///
/// let even = ParserInfo::try_parse(|raw| {
///     raw.parse::<i64>().ok().filter(|n| n % 2 == 0).map(Value::Int)
/// });
/// assert_eq!(even.kind(), "bool-out-method");
/// ```
#[derive(Clone)]
pub enum ParserInfo {
    /// String passthrough.
    Identity,
    /// Single-string constructor; an `Err` carries the constructor's message.
    Constructor(ParseFn),
    /// Static parse function; an `Err` is a format-style failure.
    DirectMethod(ParseFn),
    /// Try-parse function; `None` is reported as a generic invalid value.
    BoolOutMethod(TryParseFn),
    /// Setter that performs conversion and validation itself.
    AutoHandled(SetterConvention),
    /// No usable conversion was found; carries the builder's diagnostic.
    Invalid(String),
}

impl ParserInfo {
    pub fn constructor<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        ParserInfo::Constructor(Arc::new(f))
    }

    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        ParserInfo::DirectMethod(Arc::new(f))
    }

    /// A [`ParserInfo::DirectMethod`] backed by [`FromStr`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str<T>() -> Self
    where
        T: FromStr + Into<Value> + 'static,
        T::Err: fmt::Display,
    {
        ParserInfo::direct(|raw| raw.parse::<T>().map(Into::into).map_err(|e| e.to_string()))
    }

    pub fn try_parse<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        ParserInfo::BoolOutMethod(Arc::new(f))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ParserInfo::Invalid(_))
    }

    /// Stable lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ParserInfo::Identity => "identity",
            ParserInfo::Constructor(_) => "constructor",
            ParserInfo::DirectMethod(_) => "direct-method",
            ParserInfo::BoolOutMethod(_) => "bool-out-method",
            ParserInfo::AutoHandled(convention) => convention.kind(),
            ParserInfo::Invalid(_) => "invalid",
        }
    }
}

impl fmt::Debug for ParserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserInfo::Invalid(diag) => f.debug_tuple("Invalid").field(diag).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// Return-type convention of an auto-handled setter.
///
/// Exactly one convention applies per member, picked from its declared
/// return type when the model is built.
#[derive(Clone)]
pub enum SetterConvention {
    /// No return value: failure is signaled through `Err`.
    Unit(Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>),
    /// `false` means the value is invalid.
    Bool(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    /// Non-zero is an exit-code override that ends the invocation.
    ExitCode(Arc<dyn Fn(&str) -> i32 + Send + Sync>),
    /// `Some(message)` is an error message.
    Message(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>),
    /// `Some(error)` is surfaced as the error.
    Error(Arc<dyn Fn(&str) -> Option<BoxError> + Send + Sync>),
}

impl SetterConvention {
    pub fn unit<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        SetterConvention::Unit(Arc::new(f))
    }

    pub fn boolean<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        SetterConvention::Bool(Arc::new(f))
    }

    pub fn exit_code<F>(f: F) -> Self
    where
        F: Fn(&str) -> i32 + Send + Sync + 'static,
    {
        SetterConvention::ExitCode(Arc::new(f))
    }

    pub fn message<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        SetterConvention::Message(Arc::new(f))
    }

    pub fn error<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<BoxError> + Send + Sync + 'static,
    {
        SetterConvention::Error(Arc::new(f))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SetterConvention::Unit(_) => "auto-unit",
            SetterConvention::Bool(_) => "auto-bool",
            SetterConvention::ExitCode(_) => "auto-exit-code",
            SetterConvention::Message(_) => "auto-message",
            SetterConvention::Error(_) => "auto-error",
        }
    }
}

/// Post-conversion acceptance check.
#[derive(Clone)]
pub enum ValidatorInfo {
    /// Pass/fail predicate with an optional configured message.
    Bool {
        check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
        message: Option<String>,
    },
    /// Returns an error object on failure.
    Exception(Arc<dyn Fn(&Value) -> Option<BoxError> + Send + Sync>),
    /// Returns an error message on failure.
    Message(Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>),
    /// Named boolean property of the value.
    Property {
        name: String,
        accessor: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    },
}

impl ValidatorInfo {
    pub fn check<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ValidatorInfo::Bool {
            check: Arc::new(f),
            message: None,
        }
    }

    /// Sets the failure message of a [`ValidatorInfo::Bool`]; other variants
    /// carry their own message and are returned unchanged.
    pub fn with_message(self, text: &str) -> Self {
        match self {
            ValidatorInfo::Bool { check, .. } => ValidatorInfo::Bool {
                check,
                message: Some(text.to_string()),
            },
            other => other,
        }
    }

    pub fn exception<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<BoxError> + Send + Sync + 'static,
    {
        ValidatorInfo::Exception(Arc::new(f))
    }

    pub fn message<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        ValidatorInfo::Message(Arc::new(f))
    }

    pub fn property<F>(name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ValidatorInfo::Property {
            name: name.to_string(),
            accessor: Arc::new(f),
        }
    }
}

impl fmt::Debug for ValidatorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorInfo::Bool { message, .. } => {
                f.debug_struct("Bool").field("message", message).finish()
            }
            ValidatorInfo::Exception(_) => f.write_str("Exception"),
            ValidatorInfo::Message(_) => f.write_str("Message"),
            ValidatorInfo::Property { name, .. } => {
                f.debug_struct("Property").field("name", name).finish()
            }
        }
    }
}

/// Whether an option takes a value.
#[derive(Debug, Clone)]
pub enum OptionKind {
    /// Boolean; presence alone toggles it.
    Flag,
    /// Takes one raw string per occurrence.
    Value {
        parser: ParserInfo,
        /// Declared type is array-like.
        sequence: bool,
        /// The parser consumes the whole array form in one occurrence.
        array_parser: bool,
    },
}

/// Schema for a named option or flag.
///
/// The long name is the kebab-cased backing symbol unless overridden; the
/// help placeholder is the uppercase form of the symbol.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{OptionInfo, ParserInfo};
///
/// let verbose = OptionInfo::flag("verbose").short('v').global();
/// assert!(verbose.is_flag());
/// assert_eq!(verbose.long, "verbose");
///
/// let limit = OptionInfo::value("URL_max_length", ParserInfo::from_str::<i64>()).long("opt2");
/// assert_eq!(limit.long, "opt2");
/// assert_eq!(limit.placeholder, "URL-MAX-LENGTH");
///
/// let tags = OptionInfo::value("tag", ParserInfo::Identity).sequence();
/// assert!(tags.is_repeatable());
/// ```
#[derive(Debug, Clone)]
pub struct OptionInfo {
    /// Long form without leading dashes.
    pub long: String,
    /// Backing symbol name.
    pub symbol: String,
    pub short: Option<char>,
    /// Placeholder shown after the option in help text.
    pub placeholder: String,
    pub description: Option<String>,
    /// Visible to the whole subtree of the declaring group.
    pub global: bool,
    pub kind: OptionKind,
    /// Used when the option is absent.
    pub default: Option<Value>,
    pub validators: Vec<ValidatorInfo>,
}

impl OptionInfo {
    pub fn flag(symbol: &str) -> Self {
        Self::with_kind(symbol, OptionKind::Flag)
    }

    pub fn value(symbol: &str, parser: ParserInfo) -> Self {
        Self::with_kind(
            symbol,
            OptionKind::Value {
                parser,
                sequence: false,
                array_parser: false,
            },
        )
    }

    fn with_kind(symbol: &str, kind: OptionKind) -> Self {
        Self {
            long: kebab(symbol),
            symbol: symbol.to_string(),
            short: None,
            placeholder: screaming_kebab(symbol),
            description: None,
            global: false,
            kind,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn long(mut self, name: &str) -> Self {
        self.long = name.to_string();
        self
    }

    pub fn short(mut self, alias: char) -> Self {
        self.short = Some(alias);
        self
    }

    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Absent means [`Value::None`] rather than a missing-option error.
    /// Flags and repeatable options keep `false` and `[]` when absent.
    pub fn optional(mut self) -> Self {
        self.default = Some(Value::None);
        self
    }

    /// Marks the declared type as array-like.
    pub fn sequence(mut self) -> Self {
        if let OptionKind::Value { sequence, .. } = &mut self.kind {
            *sequence = true;
        }
        self
    }

    /// Marks the parser as consuming the whole array form at once.
    pub fn array_parser(mut self) -> Self {
        if let OptionKind::Value { array_parser, .. } = &mut self.kind {
            *array_parser = true;
        }
        self
    }

    pub fn with_validator(mut self, validator: ValidatorInfo) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_flag(&self) -> bool {
        matches!(self.kind, OptionKind::Flag)
    }

    /// Each occurrence appends an element instead of overwriting.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self.kind,
            OptionKind::Value {
                sequence: true,
                array_parser: false,
                ..
            }
        )
    }

    /// Required options have no default and collect no sequence.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.is_flag() && !self.is_repeatable()
    }

    pub fn parser(&self) -> Option<&ParserInfo> {
        match &self.kind {
            OptionKind::Flag => None,
            OptionKind::Value { parser, .. } => Some(parser),
        }
    }

    /// `--long` form used in diagnostics.
    pub fn display_name(&self) -> String {
        format!("--{}", self.long)
    }

    pub fn matches_long(&self, name: &str) -> bool {
        self.long == name
    }

    pub fn matches_short(&self, alias: char) -> bool {
        self.short == Some(alias)
    }
}

/// Schema for a positional argument.
///
/// An argument with a default is optional and must follow every required
/// argument. At most one argument per command is variadic
/// ([`ArgumentInfo::params`]) and it must be last.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ArgumentInfo, ParserInfo};
///
/// let a = ArgumentInfo::new("a", ParserInfo::from_str::<i64>());
/// assert!(a.is_required());
/// assert_eq!(a.display_name(), "A");
///
/// let rest = ArgumentInfo::params("rest", ParserInfo::Identity);
/// assert!(!rest.is_required());
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentInfo {
    /// Backing symbol name.
    pub symbol: String,
    pub description: Option<String>,
    pub parser: ParserInfo,
    pub default: Option<Value>,
    /// Trailing variadic slot.
    pub is_params: bool,
    pub validators: Vec<ValidatorInfo>,
}

impl ArgumentInfo {
    pub fn new(symbol: &str, parser: ParserInfo) -> Self {
        Self {
            symbol: symbol.to_string(),
            description: None,
            parser,
            default: None,
            is_params: false,
            validators: Vec::new(),
        }
    }

    pub fn params(symbol: &str, parser: ParserInfo) -> Self {
        Self {
            is_params: true,
            ..Self::new(symbol, parser)
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_validator(mut self, validator: ValidatorInfo) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_required(&self) -> bool {
        !self.is_params && self.default.is_none()
    }

    /// Uppercase placeholder shown in usage lines.
    pub fn display_name(&self) -> String {
        screaming_kebab(&self.symbol)
    }
}
