//! Arena-backed command tree.
//!
//! Groups and commands are stored in flat vectors and addressed by
//! [`GroupId`] / [`CommandId`]. The tree is assembled from builders in one
//! pass; qualified identities are computed from the stored path at that
//! point and never change afterwards.

use std::fmt;

use crate::casing::kebab;
use crate::invocation::Handler;
use crate::types::{ArgumentInfo, OptionInfo};
use crate::validate::{ModelError, validate_model};

/// Separator between path segments of a qualified identity.
pub const ID_SEPARATOR: &str = " ";

/// Canonical rendering of the hidden command sentinel.
pub const HIDDEN_COMMAND: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

/// A group or a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Group(GroupId),
    Command(CommandId),
}

/// Declaring node of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionOwner {
    Group(GroupId),
    Command(CommandId),
}

/// Stable address of an option within a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionKey {
    pub owner: OptionOwner,
    pub index: usize,
}

/// Name of a command: either matchable, or the hidden sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandName {
    Named(String),
    Hidden,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandName::Named(name) => f.write_str(name),
            CommandName::Hidden => f.write_str(HIDDEN_COMMAND),
        }
    }
}

/// Position of a parameter in a command's declared parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    Argument(usize),
    Option(usize),
}

#[derive(Debug)]
pub struct GroupNode {
    pub name: String,
    /// Qualified identity: ancestor names and own name.
    pub id: String,
    /// Display path from the program name down to this group.
    pub path: Vec<String>,
    pub parent: Option<GroupId>,
    pub description: Option<String>,
    pub commands: Vec<CommandId>,
    pub groups: Vec<GroupId>,
    pub default_command: Option<CommandId>,
    pub options: Vec<OptionInfo>,
}

#[derive(Debug)]
pub struct CommandNode {
    pub name: CommandName,
    /// Qualified identity; hidden commands end in `#`.
    pub id: String,
    /// Display path; hidden commands take their group's path.
    pub path: Vec<String>,
    pub group: GroupId,
    pub description: Option<String>,
    pub arguments: Vec<ArgumentInfo>,
    pub options: Vec<OptionInfo>,
    pub params_order: Vec<ParamSlot>,
    pub handler: Handler,
}

impl CommandNode {
    pub fn is_hidden(&self) -> bool {
        self.name == CommandName::Hidden
    }

    /// Name shown to users; hidden commands show their group's name.
    pub fn display_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn has_exit_code(&self) -> bool {
        self.handler.has_exit_code()
    }

    pub fn params_argument(&self) -> Option<&ArgumentInfo> {
        self.arguments.last().filter(|a| a.is_params)
    }

    pub fn required_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.is_required()).count()
    }

    /// Number of non-variadic positional slots.
    pub fn fixed_count(&self) -> usize {
        self.arguments.iter().filter(|a| !a.is_params).count()
    }
}

/// An immutable command tree rooted at the program's group.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ArgumentInfo, CommandBuilder, GroupBuilder, Handler, ParserInfo};
///
/// let model = GroupBuilder::new("app")
///     .command(
///         CommandBuilder::new("sum", Handler::unit(|_| Ok(())))
///             .argument(ArgumentInfo::new("a", ParserInfo::from_str::<i64>()))
///             .argument(ArgumentInfo::new("b", ParserInfo::from_str::<i64>())),
///     )
///     .build()
///     .unwrap();
///
/// let root = model.root();
/// let sum = model.find_command(root, "sum").unwrap();
/// assert_eq!(model.command(sum).id, "app sum");
/// assert_eq!(model.command(sum).required_count(), 2);
/// ```
#[derive(Debug)]
pub struct Model {
    groups: Vec<GroupNode>,
    commands: Vec<CommandNode>,
}

impl Model {
    pub fn root(&self) -> GroupId {
        GroupId(0)
    }

    /// Program name (the root group's name).
    pub fn name(&self) -> &str {
        &self.groups[0].name
    }

    pub fn group(&self, id: GroupId) -> &GroupNode {
        &self.groups[id.0]
    }

    pub fn command(&self, id: CommandId) -> &CommandNode {
        &self.commands[id.0]
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        (0..self.groups.len()).map(GroupId)
    }

    pub fn command_ids(&self) -> impl Iterator<Item = CommandId> + '_ {
        (0..self.commands.len()).map(CommandId)
    }

    pub fn option(&self, key: OptionKey) -> &OptionInfo {
        match key.owner {
            OptionOwner::Group(g) => &self.group(g).options[key.index],
            OptionOwner::Command(c) => &self.command(c).options[key.index],
        }
    }

    /// Child group with the given name.
    pub fn find_group(&self, parent: GroupId, name: &str) -> Option<GroupId> {
        self.group(parent)
            .groups
            .iter()
            .copied()
            .find(|&g| self.group(g).name == name)
    }

    /// Child command with the given name; hidden commands never match.
    pub fn find_command(&self, parent: GroupId, name: &str) -> Option<CommandId> {
        self.group(parent)
            .commands
            .iter()
            .copied()
            .find(|&c| matches!(&self.command(c).name, CommandName::Named(n) if n == name))
    }

    pub fn hidden_command(&self, group: GroupId) -> Option<CommandId> {
        self.group(group)
            .commands
            .iter()
            .copied()
            .find(|&c| self.command(c).is_hidden())
    }

    /// Command run when a group is addressed without a matching child:
    /// the default command, else the hidden command.
    pub fn fallback_target(&self, group: GroupId) -> Option<CommandId> {
        self.group(group)
            .default_command
            .or_else(|| self.hidden_command(group))
    }

    /// The group itself followed by its ancestors up to the root.
    pub fn ancestors(&self, group: GroupId) -> Vec<GroupId> {
        let mut chain = vec![group];
        let mut current = self.group(group).parent;
        while let Some(g) = current {
            chain.push(g);
            current = self.group(g).parent;
        }
        chain
    }

    /// Options usable at `node`: own options first, then inherited globals
    /// from the innermost group outwards.
    ///
    /// A group also exposes the options of its fallback target, and a
    /// command that is its group's fallback target sees the group's local
    /// options.
    pub fn visible_options(&self, node: Node) -> Vec<OptionKey> {
        let mut keys = Vec::new();
        let inherited_from = match node {
            Node::Group(g) => {
                keys.extend(Self::keys_of(OptionOwner::Group(g), self.group(g).options.len()));
                if let Some(target) = self.fallback_target(g) {
                    let len = self.command(target).options.len();
                    keys.extend(Self::keys_of(OptionOwner::Command(target), len));
                }
                self.group(g).parent
            }
            Node::Command(c) => {
                let cmd = self.command(c);
                keys.extend(Self::keys_of(OptionOwner::Command(c), cmd.options.len()));
                let group = self.group(cmd.group);
                let is_target = self.fallback_target(cmd.group) == Some(c);
                for (index, opt) in group.options.iter().enumerate() {
                    if is_target || opt.global {
                        keys.push(OptionKey {
                            owner: OptionOwner::Group(cmd.group),
                            index,
                        });
                    }
                }
                group.parent
            }
        };

        if let Some(parent) = inherited_from {
            for g in self.ancestors(parent) {
                for (index, opt) in self.group(g).options.iter().enumerate() {
                    if opt.global {
                        keys.push(OptionKey {
                            owner: OptionOwner::Group(g),
                            index,
                        });
                    }
                }
            }
        }
        keys
    }

    /// Options bound for a run of `command`: its visible options, then the
    /// local options of the enclosing groups. Those may only be given
    /// before the command name, while their group is the current scope.
    pub fn path_options(&self, command: CommandId) -> Vec<OptionKey> {
        let mut keys = self.visible_options(Node::Command(command));
        for g in self.ancestors(self.command(command).group) {
            for key in Self::keys_of(OptionOwner::Group(g), self.group(g).options.len()) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn keys_of(owner: OptionOwner, len: usize) -> impl Iterator<Item = OptionKey> {
        (0..len).map(move |index| OptionKey { owner, index })
    }

    pub fn node_path(&self, node: Node) -> String {
        match node {
            Node::Group(g) => self.group(g).path.join(ID_SEPARATOR),
            Node::Command(c) => self.command(c).path.join(ID_SEPARATOR),
        }
    }
}

/// Builder for a command.
///
/// Arguments and options are recorded in call order, which becomes the
/// declared parameter order seen by the handler.
#[derive(Debug)]
pub struct CommandBuilder {
    name: CommandName,
    description: Option<String>,
    arguments: Vec<ArgumentInfo>,
    options: Vec<OptionInfo>,
    params_order: Vec<ParamSlot>,
    handler: Handler,
}

impl CommandBuilder {
    /// Creates a named command; the symbol is kebab-cased.
    pub fn new(symbol: &str, handler: Handler) -> Self {
        Self::with_name(CommandName::Named(kebab(symbol)), handler)
    }

    /// Creates the hidden command of a group.
    pub fn hidden(handler: Handler) -> Self {
        Self::with_name(CommandName::Hidden, handler)
    }

    fn with_name(name: CommandName, handler: Handler) -> Self {
        Self {
            name,
            description: None,
            arguments: Vec::new(),
            options: Vec::new(),
            params_order: Vec::new(),
            handler,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn argument(mut self, arg: ArgumentInfo) -> Self {
        self.params_order.push(ParamSlot::Argument(self.arguments.len()));
        self.arguments.push(arg);
        self
    }

    pub fn option(mut self, opt: OptionInfo) -> Self {
        self.params_order.push(ParamSlot::Option(self.options.len()));
        self.options.push(opt);
        self
    }
}

/// Builder for a group; the outermost group is the program.
#[derive(Debug)]
pub struct GroupBuilder {
    name: String,
    description: Option<String>,
    options: Vec<OptionInfo>,
    commands: Vec<(CommandBuilder, bool)>,
    groups: Vec<GroupBuilder>,
}

impl GroupBuilder {
    /// Creates a group; the symbol is kebab-cased.
    pub fn new(symbol: &str) -> Self {
        Self {
            name: kebab(symbol),
            description: None,
            options: Vec::new(),
            commands: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn option(mut self, opt: OptionInfo) -> Self {
        self.options.push(opt);
        self
    }

    pub fn command(mut self, cmd: CommandBuilder) -> Self {
        self.commands.push((cmd, false));
        self
    }

    /// Adds a command and makes it the group's default.
    pub fn default_command(mut self, cmd: CommandBuilder) -> Self {
        self.commands.push((cmd, true));
        self
    }

    pub fn group(mut self, group: GroupBuilder) -> Self {
        self.groups.push(group);
        self
    }

    /// Links the tree, computes identities and validates it.
    ///
    /// # Errors
    ///
    /// Returns the first structural defect found; see [`ModelError`].
    pub fn build(self) -> Result<Model, ModelError> {
        let mut model = Model {
            groups: Vec::new(),
            commands: Vec::new(),
        };
        let mut errors = Vec::new();
        insert_group(&mut model, self, None, &mut errors);
        errors.extend(validate_model(&model));

        match errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(model),
        }
    }
}

fn insert_group(
    model: &mut Model,
    builder: GroupBuilder,
    parent: Option<GroupId>,
    errors: &mut Vec<ModelError>,
) -> GroupId {
    let mut path = match parent {
        Some(p) => model.group(p).path.clone(),
        None => Vec::new(),
    };
    path.push(builder.name.clone());

    let id = GroupId(model.groups.len());
    model.groups.push(GroupNode {
        name: builder.name,
        id: path.join(ID_SEPARATOR),
        path,
        parent,
        description: builder.description,
        commands: Vec::new(),
        groups: Vec::new(),
        default_command: None,
        options: builder.options,
    });

    for (cmd, is_default) in builder.commands {
        let cid = insert_command(model, cmd, id);
        model.groups[id.0].commands.push(cid);
        if is_default {
            if model.groups[id.0].default_command.is_some() {
                errors.push(ModelError::MultipleDefaults(model.group(id).id.clone()));
            } else {
                model.groups[id.0].default_command = Some(cid);
            }
        }
    }

    for child in builder.groups {
        let gid = insert_group(model, child, Some(id), errors);
        model.groups[id.0].groups.push(gid);
    }

    id
}

fn insert_command(model: &mut Model, builder: CommandBuilder, group: GroupId) -> CommandId {
    let group_node = model.group(group);
    let mut path = group_node.path.clone();
    if let CommandName::Named(name) = &builder.name {
        path.push(name.clone());
    }
    let id = format!("{}{ID_SEPARATOR}{}", group_node.id, builder.name);

    let cid = CommandId(model.commands.len());
    model.commands.push(CommandNode {
        name: builder.name,
        id,
        path,
        group,
        description: builder.description,
        arguments: builder.arguments,
        options: builder.options,
        params_order: builder.params_order,
        handler: builder.handler,
    });
    cid
}
