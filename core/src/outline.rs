//! Serializable snapshot of a model's structure.
//!
//! Handlers, parsers and validators cannot be serialized; an outline keeps
//! the names, arity and descriptions so a tree can be exported as JSON or
//! YAML and inspected offline.

use serde::{Deserialize, Serialize};

use crate::model::{CommandId, GroupId, Model, Node};
use crate::types::{ArgumentInfo, OptionInfo};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionOutline {
    pub long: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// `None` for flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub global: bool,
    pub repeatable: bool,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub parser: String,
    pub validators: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentOutline {
    pub name: String,
    pub required: bool,
    pub params: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parser: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutline {
    /// Declared name; `#` for a hidden command.
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hidden: bool,
    pub is_default: bool,
    pub has_exit_code: bool,
    pub arguments: Vec<ArgumentOutline>,
    pub options: Vec<OptionOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutline {
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<OptionOutline>,
    pub commands: Vec<CommandOutline>,
    pub groups: Vec<GroupOutline>,
}

/// Builds an outline of the whole model, starting at the root group.
///
/// # Examples
///
/// ```
/// use cmdtree_core::*;
///
/// let model = GroupBuilder::new("app")
///     .default_command(CommandBuilder::new("run", Handler::unit(|_| Ok(()))))
///     .build()
///     .unwrap();
///
/// let outline = outline(&model);
/// assert_eq!(outline.name, "app");
/// assert!(outline.commands[0].is_default);
/// ```
pub fn outline(model: &Model) -> GroupOutline {
    group_outline(model, model.root())
}

fn group_outline(model: &Model, gid: GroupId) -> GroupOutline {
    let group = model.group(gid);
    GroupOutline {
        name: group.name.clone(),
        id: group.id.clone(),
        description: group.description.clone(),
        options: group.options.iter().map(option_outline).collect(),
        commands: group
            .commands
            .iter()
            .map(|&c| command_outline(model, c, group.default_command == Some(c)))
            .collect(),
        groups: group.groups.iter().map(|&g| group_outline(model, g)).collect(),
    }
}

fn command_outline(model: &Model, cid: CommandId, is_default: bool) -> CommandOutline {
    let cmd = model.command(cid);
    CommandOutline {
        name: cmd.name.to_string(),
        id: cmd.id.clone(),
        description: cmd.description.clone(),
        hidden: cmd.is_hidden(),
        is_default,
        has_exit_code: cmd.has_exit_code(),
        arguments: cmd.arguments.iter().map(argument_outline).collect(),
        options: model
            .visible_options(Node::Command(cid))
            .into_iter()
            .map(|k| option_outline(model.option(k)))
            .collect(),
    }
}

fn option_outline(opt: &OptionInfo) -> OptionOutline {
    OptionOutline {
        long: opt.long.clone(),
        short: opt.short,
        placeholder: (!opt.is_flag()).then(|| opt.placeholder.clone()),
        description: opt.description.clone(),
        global: opt.global,
        repeatable: opt.is_repeatable(),
        required: opt.is_required(),
        default: opt.default.as_ref().map(ToString::to_string),
        parser: opt.parser().map_or("flag", |p| p.kind()).to_string(),
        validators: opt.validators.len(),
    }
}

fn argument_outline(arg: &ArgumentInfo) -> ArgumentOutline {
    ArgumentOutline {
        name: arg.display_name(),
        required: arg.is_required(),
        params: arg.is_params,
        default: arg.default.as_ref().map(ToString::to_string),
        description: arg.description.clone(),
        parser: arg.parser.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::Handler;
    use crate::model::{CommandBuilder, GroupBuilder};
    use crate::types::ParserInfo;

    #[test]
    fn test_outline_includes_inherited_options_on_commands() {
        let model = GroupBuilder::new("app")
            .option(OptionInfo::flag("verbose").global())
            .command(
                CommandBuilder::new("fetch", Handler::exit_code(|_| Ok(0)))
                    .argument(ArgumentInfo::params("urls", ParserInfo::Identity))
                    .option(OptionInfo::value("depth", ParserInfo::from_str::<i64>()).with_default(1i64)),
            )
            .build()
            .unwrap();

        let outline = outline(&model);
        let fetch = &outline.commands[0];
        assert!(fetch.has_exit_code);
        assert_eq!(fetch.arguments[0].name, "URLS");
        assert!(fetch.arguments[0].params);

        let longs: Vec<&str> = fetch.options.iter().map(|o| o.long.as_str()).collect();
        assert_eq!(longs, vec!["depth", "verbose"]);
        assert_eq!(fetch.options[0].default.as_deref(), Some("1"));
        assert_eq!(fetch.options[0].parser, "direct-method");
        assert_eq!(fetch.options[1].parser, "flag");
    }

    #[test]
    fn test_outline_serializes_to_json() {
        let model = GroupBuilder::new("app")
            .command(CommandBuilder::hidden(Handler::unit(|_| Ok(()))))
            .build()
            .unwrap();
        let json = serde_json::to_value(outline(&model)).unwrap();
        assert_eq!(json["commands"][0]["name"], "#");
        assert_eq!(json["commands"][0]["hidden"], true);
    }
}
