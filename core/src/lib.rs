//! Command tree model for argv resolution and dispatch.
//!
//! This crate defines the immutable description of a program's command
//! hierarchy consumed by the `cmdtree-engine` runtime:
//!
//! - [`GroupBuilder`] / [`CommandBuilder`]: assemble nested groups and
//!   commands; [`GroupBuilder::build`] links them into a [`Model`].
//! - [`OptionInfo`]: a named option or flag with short alias, placeholder,
//!   default, and validators.
//! - [`ArgumentInfo`]: a positional slot, optionally defaulted or variadic.
//! - [`ParserInfo`] / [`SetterConvention`]: how raw strings become
//!   [`Value`]s.
//! - [`ValidatorInfo`]: post-conversion checks.
//! - [`Handler`] / [`Invocation`]: the backing operation of a command and
//!   the bound call it receives.
//!
//! Validation ([`validate_model`]) rejects ambiguous names, misplaced
//! arguments and unusable parsers when the model is built.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//!
//! use cmdtree_core::*;
//!
//! let model = GroupBuilder::new("mycli")
//!     .option(OptionInfo::flag("verbose").short('v').global())
//!     .command(
//!         CommandBuilder::new("sum", Handler::unit(|inv| {
//!             let total = inv.int("a").unwrap_or(0) + inv.int("b").unwrap_or(0);
//!             writeln!(inv.out(), "{total}")?;
//!             Ok(())
//!         }))
//!         .argument(ArgumentInfo::new("a", ParserInfo::from_str::<i64>()))
//!         .argument(ArgumentInfo::new("b", ParserInfo::from_str::<i64>())),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let sum = model.find_command(model.root(), "sum").unwrap();
//! assert_eq!(model.command(sum).id, "mycli sum");
//! ```

pub mod casing;
mod invocation;
mod model;
mod outline;
mod settings;
mod types;
mod validate;
mod value;

pub use invocation::{BoundValue, Handler, Invocation};
pub use model::{
    CommandBuilder, CommandId, CommandName, CommandNode, GroupBuilder, GroupId, GroupNode,
    HIDDEN_COMMAND, ID_SEPARATOR, Model, Node, OptionKey, OptionOwner, ParamSlot,
};
pub use outline::{ArgumentOutline, CommandOutline, GroupOutline, OptionOutline, outline};
pub use settings::{ProgramSettings, SettingsError};
pub use types::{
    ArgumentInfo, BoxError, OptionInfo, OptionKind, ParseFn, ParserInfo, SetterConvention,
    TryParseFn, ValidatorInfo,
};
pub use validate::{HELP_LONG, HELP_SHORT, ModelError, validate_model};
pub use value::Value;
