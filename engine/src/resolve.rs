//! Command resolution.
//!
//! Walks the group tree, consuming leading positional tokens that name a
//! child group or command. Options met on the way are recorded against the
//! scope visible at that point, so a group's own options may precede the
//! name of one of its commands. When a token matches nothing, the current
//! group's default (or hidden) command takes over and receives that token
//! and everything after it.

use cmdtree_core::{CommandId, GroupId, Model, Node};
use tracing::debug;

use crate::context::{Occurrence, ParseContext};
use crate::error::{ParseError, Result};
use crate::token::{Scope, TokenKind, Tokenizer};

/// Outcome of resolving an argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// `-h`/`--help` was seen while positioned at this node.
    Help(Node),
    /// A command was selected; its tokens are recorded in the context.
    Command(CommandId),
    /// Stopped at a group that has nothing to run and nothing left to parse.
    Group(GroupId),
}

/// Resolves `args` against `model`, recording options and positionals in
/// `ctx`.
pub fn resolve(model: &Model, args: &[String], ctx: &mut ParseContext) -> Result<Resolution> {
    let mut group = model.root();
    let mut target: Option<CommandId> = None;
    let mut tokenizer = Tokenizer::new(args);

    let mut node = Node::Group(group);
    let mut scope = Scope::new(model, node);

    while let Some(token) = tokenizer.next_token(&scope) {
        let token = token?;
        match token.kind {
            TokenKind::Help => {
                debug!(node = %model.node_path(node), "Help requested");
                return Ok(Resolution::Help(node));
            }
            TokenKind::Terminator => {}
            TokenKind::Option { key, value } => {
                ctx.record_option(Occurrence {
                    key,
                    value,
                    raw: token.raw,
                    position: token.position,
                });
            }
            TokenKind::Positional(text) => {
                if target.is_none() {
                    if !tokenizer.is_terminated() {
                        if let Some(child) = model.find_group(group, &text) {
                            debug!(group = %model.group(child).id, "Descending into group");
                            group = child;
                            node = Node::Group(group);
                            scope = Scope::new(model, node);
                            continue;
                        }
                        if let Some(cmd) = model.find_command(group, &text) {
                            debug!(command = %model.command(cmd).id, "Matched command");
                            target = Some(cmd);
                            node = Node::Command(cmd);
                            scope = Scope::new(model, node);
                            continue;
                        }
                    }

                    let Some(fallback) = model.fallback_target(group) else {
                        return Err(ParseError::UnknownCommand {
                            token: text,
                            position: token.position,
                        });
                    };
                    debug!(command = %model.command(fallback).id, token = %text, "Falling back to group target");
                    target = Some(fallback);
                    node = Node::Command(fallback);
                    scope = Scope::new(model, node);
                }
                ctx.record_positional(text, token.position);
            }
        }
    }

    let target = match target.or_else(|| model.fallback_target(group)) {
        Some(cmd) => cmd,
        None => {
            if let Some(stray) = ctx.occurrences().first() {
                return Err(ParseError::UnknownOption {
                    token: stray.raw.clone(),
                    position: stray.position,
                });
            }
            return Ok(Resolution::Group(group));
        }
    };

    // Options of a fallback target are visible at group scope, but only
    // belong to the run when that target is the one selected.
    let bound = model.path_options(target);
    if let Some(stray) = ctx.occurrences().iter().find(|o| !bound.contains(&o.key)) {
        return Err(ParseError::UnknownOption {
            token: stray.raw.clone(),
            position: stray.position,
        });
    }

    ctx.set_target(target);
    Ok(Resolution::Command(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::{CommandBuilder, GroupBuilder, Handler, OptionInfo};

    fn noop() -> Handler {
        Handler::unit(|_| Ok(()))
    }

    fn model() -> Model {
        GroupBuilder::new("app")
            .option(OptionInfo::flag("verbose").short('v').global())
            .option(OptionInfo::flag("local"))
            .group(
                GroupBuilder::new("remote")
                    .command(CommandBuilder::new("add", noop()))
                    .command(CommandBuilder::hidden(noop())),
            )
            .group(GroupBuilder::new("empty").command(CommandBuilder::new("only", noop())))
            .default_command(
                CommandBuilder::new("status", noop()).option(OptionInfo::flag("porcelain")),
            )
            .build()
            .unwrap()
    }

    fn run(model: &Model, raw: &[&str]) -> (Result<Resolution>, ParseContext) {
        let args: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        let mut ctx = ParseContext::new();
        let result = resolve(model, &args, &mut ctx);
        (result, ctx)
    }

    fn id_of(model: &Model, resolution: Resolution) -> String {
        match resolution {
            Resolution::Command(c) => model.command(c).id.clone(),
            Resolution::Group(g) => model.group(g).id.clone(),
            Resolution::Help(n) => format!("help: {}", model.node_path(n)),
        }
    }

    #[test]
    fn test_matches_nested_command() {
        let model = model();
        let (result, ctx) = run(&model, &["-v", "remote", "add"]);
        assert_eq!(id_of(&model, result.unwrap()), "app remote add");
        assert_eq!(ctx.occurrences().len(), 1);
    }

    #[test]
    fn test_unmatched_token_goes_to_hidden_command() {
        let model = model();
        let (result, ctx) = run(&model, &["remote", "origin", "add"]);
        assert_eq!(id_of(&model, result.unwrap()), "app remote #");
        let texts: Vec<&str> = ctx.positionals().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["origin", "add"]);
    }

    #[test]
    fn test_empty_input_uses_root_default() {
        let model = model();
        let (result, _) = run(&model, &[]);
        assert_eq!(id_of(&model, result.unwrap()), "app status");
    }

    #[test]
    fn test_terminator_stops_matching() {
        let model = model();
        let (result, ctx) = run(&model, &["--", "remote"]);
        assert_eq!(id_of(&model, result.unwrap()), "app status");
        assert_eq!(ctx.positionals()[0].text, "remote");
    }

    #[test]
    fn test_group_without_target() {
        let model = model();
        let (result, _) = run(&model, &["empty"]);
        assert_eq!(id_of(&model, result.unwrap()), "app empty");

        let (result, _) = run(&model, &["empty", "nope"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnknownCommand {
                token: "nope".into(),
                position: 1
            }
        );
    }

    #[test]
    fn test_group_local_option_before_subcommand_name() {
        let model = model();
        let (result, ctx) = run(&model, &["--local", "remote", "add"]);
        assert_eq!(id_of(&model, result.unwrap()), "app remote add");
        assert_eq!(ctx.occurrences()[0].raw, "--local");

        let (result, _) = run(&model, &["remote", "add", "--local"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnknownOption {
                token: "--local".into(),
                position: 2
            }
        );

        let (result, _) = run(&model, &["--local"]);
        assert_eq!(id_of(&model, result.unwrap()), "app status");
    }

    #[test]
    fn test_default_command_option_rejected_for_sibling() {
        let model = model();
        let (result, _) = run(&model, &["--porcelain", "remote", "add"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnknownOption {
                token: "--porcelain".into(),
                position: 0
            }
        );

        let (result, _) = run(&model, &["--porcelain"]);
        assert_eq!(id_of(&model, result.unwrap()), "app status");
    }

    #[test]
    fn test_help_reports_current_node() {
        let model = model();
        let (result, _) = run(&model, &["remote", "--help", "--bogus"]);
        assert_eq!(id_of(&model, result.unwrap()), "help: app remote");

        let (result, _) = run(&model, &["remote", "add", "-h"]);
        assert_eq!(id_of(&model, result.unwrap()), "help: app remote add");
    }
}
