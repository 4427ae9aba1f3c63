//! Model validation.
//!
//! Catches structural defects (ambiguous names, misplaced arguments,
//! unusable parsers) before any argument vector is parsed. A model with
//! defects is never handed to the engine.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let noop = || Handler::unit(|_| Ok(()));
//! let err = GroupBuilder::new("app")
//!     .command(CommandBuilder::new("run", noop()))
//!     .command(CommandBuilder::new("run", noop()))
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, ModelError::AmbiguousMatch { .. }));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Model, Node, OptionOwner};
use crate::types::{ArgumentInfo, OptionInfo, OptionKind, ParserInfo};

/// Long name reserved for the implicit help option.
pub const HELP_LONG: &str = "help";
/// Short alias reserved for the implicit help option.
pub const HELP_SHORT: char = 'h';

/// Structural model defects. All are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A group, command or option name is empty.
    #[error("empty name in {0}")]
    EmptyName(String),
    /// Two siblings, or two options visible in the same scope, share a name.
    #[error("ambiguous name '{name}' in {scope}")]
    AmbiguousMatch { scope: String, name: String },
    /// A group declares more than one default command.
    #[error("group '{0}' declares more than one default command")]
    MultipleDefaults(String),
    /// A group declares more than one hidden command.
    #[error("group '{0}' declares more than one hidden command")]
    MultipleHidden(String),
    /// An option or argument carries an [`ParserInfo::Invalid`] parser.
    #[error("no usable conversion for '{slot}' in {scope}: {diagnostic}")]
    InvalidParser {
        scope: String,
        slot: String,
        diagnostic: String,
    },
    /// A required argument follows an optional one.
    #[error("required argument '{argument}' follows an optional argument in {command}")]
    RequiredAfterOptional { command: String, argument: String },
    /// A variadic argument is not the last argument, or there are several.
    #[error("variadic argument '{argument}' must be the last argument of {command}")]
    ParamsNotLast { command: String, argument: String },
    /// An option uses the name or alias of the implicit help option.
    #[error("option '{name}' in {scope} collides with the implicit help option")]
    ReservedName { scope: String, name: String },
}

/// Validates every group and command of a model.
///
/// Returns all defects found, in tree order.
pub fn validate_model(model: &Model) -> Vec<ModelError> {
    let mut errors = Vec::new();

    for gid in model.group_ids() {
        let group = model.group(gid);
        if group.name.trim().is_empty() {
            errors.push(ModelError::EmptyName(group.id.clone()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let children = group
            .groups
            .iter()
            .map(|&g| model.group(g).name.as_str())
            .chain(group.commands.iter().filter_map(|&c| {
                let cmd = model.command(c);
                (!cmd.is_hidden()).then(|| cmd.display_name())
            }));
        for name in children {
            if name.trim().is_empty() {
                errors.push(ModelError::EmptyName(group.id.clone()));
            } else if !seen.insert(name) {
                errors.push(ModelError::AmbiguousMatch {
                    scope: group.id.clone(),
                    name: name.to_string(),
                });
            }
        }

        let hidden = group
            .commands
            .iter()
            .filter(|&&c| model.command(c).is_hidden())
            .count();
        if hidden > 1 {
            errors.push(ModelError::MultipleHidden(group.id.clone()));
        }

        errors.extend(validate_scope(model, Node::Group(gid), &group.id));
    }

    for cid in model.command_ids() {
        let cmd = model.command(cid);
        errors.extend(validate_arguments(&cmd.id, &cmd.arguments));
        errors.extend(validate_scope(model, Node::Command(cid), &cmd.id));
    }

    errors
}

fn validate_scope(model: &Model, node: Node, scope: &str) -> Vec<ModelError> {
    let mut errors = Vec::new();
    let mut longs: HashSet<&str> = HashSet::new();
    let mut shorts: HashSet<char> = HashSet::new();

    for key in model.visible_options(node) {
        let opt = model.option(key);
        let owned = match (node, key.owner) {
            (Node::Group(g), OptionOwner::Group(owner)) => g == owner,
            (Node::Command(c), OptionOwner::Command(owner)) => c == owner,
            _ => false,
        };
        if owned {
            errors.extend(validate_option(scope, opt));
        }

        if !longs.insert(opt.long.as_str()) {
            errors.push(ModelError::AmbiguousMatch {
                scope: scope.to_string(),
                name: opt.display_name(),
            });
        }
        if let Some(short) = opt.short {
            if !shorts.insert(short) {
                errors.push(ModelError::AmbiguousMatch {
                    scope: scope.to_string(),
                    name: format!("-{short}"),
                });
            }
        }
    }

    errors
}

fn validate_option(scope: &str, opt: &OptionInfo) -> Vec<ModelError> {
    let mut errors = Vec::new();

    if opt.long.trim().is_empty() {
        errors.push(ModelError::EmptyName(scope.to_string()));
    }
    if opt.long == HELP_LONG || opt.short == Some(HELP_SHORT) {
        errors.push(ModelError::ReservedName {
            scope: scope.to_string(),
            name: opt.display_name(),
        });
    }
    if let OptionKind::Value {
        parser: ParserInfo::Invalid(diagnostic),
        ..
    } = &opt.kind
    {
        errors.push(ModelError::InvalidParser {
            scope: scope.to_string(),
            slot: opt.display_name(),
            diagnostic: diagnostic.clone(),
        });
    }

    errors
}

fn validate_arguments(command: &str, arguments: &[ArgumentInfo]) -> Vec<ModelError> {
    let mut errors = Vec::new();
    let mut seen_optional = false;

    for (i, arg) in arguments.iter().enumerate() {
        if let ParserInfo::Invalid(diagnostic) = &arg.parser {
            errors.push(ModelError::InvalidParser {
                scope: command.to_string(),
                slot: arg.display_name(),
                diagnostic: diagnostic.clone(),
            });
        }

        if arg.is_params {
            if i + 1 != arguments.len() {
                errors.push(ModelError::ParamsNotLast {
                    command: command.to_string(),
                    argument: arg.display_name(),
                });
            }
        } else if arg.is_required() {
            if seen_optional {
                errors.push(ModelError::RequiredAfterOptional {
                    command: command.to_string(),
                    argument: arg.display_name(),
                });
            }
        } else {
            seen_optional = true;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::Handler;
    use crate::model::{CommandBuilder, GroupBuilder};

    fn noop() -> Handler {
        Handler::unit(|_| Ok(()))
    }

    #[test]
    fn test_rejects_group_and_command_sharing_a_name() {
        let err = GroupBuilder::new("app")
            .group(GroupBuilder::new("remote"))
            .command(CommandBuilder::new("remote", noop()))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::AmbiguousMatch {
                scope: "app".into(),
                name: "remote".into()
            }
        );
    }

    #[test]
    fn test_rejects_multiple_defaults() {
        let err = GroupBuilder::new("app")
            .default_command(CommandBuilder::new("a", noop()))
            .default_command(CommandBuilder::new("b", noop()))
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::MultipleDefaults("app".into()));
    }

    #[test]
    fn test_rejects_multiple_hidden() {
        let err = GroupBuilder::new("app")
            .command(CommandBuilder::hidden(noop()))
            .command(CommandBuilder::hidden(noop()))
            .build()
            .unwrap_err();
        assert_eq!(err, ModelError::MultipleHidden("app".into()));
    }

    #[test]
    fn test_rejects_global_shadowed_by_command_option() {
        let err = GroupBuilder::new("app")
            .option(OptionInfo::flag("verbose").global())
            .command(CommandBuilder::new("run", noop()).option(OptionInfo::flag("verbose")))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::AmbiguousMatch {
                scope: "app run".into(),
                name: "--verbose".into()
            }
        );
    }

    #[test]
    fn test_rejects_reserved_help_alias() {
        let err = GroupBuilder::new("app")
            .command(CommandBuilder::new("run", noop()).option(OptionInfo::flag("host").short('h')))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::ReservedName { .. }));
    }

    #[test]
    fn test_rejects_invalid_parser() {
        let err = GroupBuilder::new("app")
            .command(CommandBuilder::new("run", noop()).argument(ArgumentInfo::new(
                "when",
                ParserInfo::Invalid("no conversion for Instant".into()),
            )))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidParser {
                scope: "app run".into(),
                slot: "WHEN".into(),
                diagnostic: "no conversion for Instant".into()
            }
        );
    }

    #[test]
    fn test_rejects_misplaced_arguments() {
        let err = GroupBuilder::new("app")
            .command(
                CommandBuilder::new("run", noop())
                    .argument(ArgumentInfo::new("a", ParserInfo::Identity).with_default("x"))
                    .argument(ArgumentInfo::new("b", ParserInfo::Identity)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::RequiredAfterOptional { .. }));

        let err = GroupBuilder::new("app")
            .command(
                CommandBuilder::new("run", noop())
                    .argument(ArgumentInfo::params("rest", ParserInfo::Identity))
                    .argument(ArgumentInfo::new("b", ParserInfo::Identity)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::ParamsNotLast { .. }));
    }

    #[test]
    fn test_accepts_valid_model() {
        let model = GroupBuilder::new("app")
            .option(OptionInfo::flag("verbose").short('v').global())
            .group(GroupBuilder::new("remote").command(CommandBuilder::hidden(noop())))
            .command(
                CommandBuilder::new("run", noop())
                    .argument(ArgumentInfo::new("a", ParserInfo::Identity))
                    .argument(ArgumentInfo::new("b", ParserInfo::Identity).with_default("x"))
                    .argument(ArgumentInfo::params("rest", ParserInfo::Identity)),
            )
            .build();
        assert!(model.is_ok());
    }
}
