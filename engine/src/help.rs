//! Help text synthesis.
//!
//! Help is rendered from the model alone: description, usage lines, then
//! the Options, Arguments and Commands sections. Rendering is a pure
//! function of the model and settings, so the same node always yields the
//! same text.

use cmdtree_core::{
    ArgumentInfo, CommandId, GroupId, HELP_LONG, HELP_SHORT, ID_SEPARATOR, Model, Node,
    OptionInfo, OptionKey, ProgramSettings,
};

const INDENT: &str = "  ";
const USAGE_PREFIX: &str = "Usage: ";

struct Row {
    left: String,
    right: String,
}

/// Renders help for a group or command.
pub fn render_help(model: &Model, node: Node, settings: &ProgramSettings) -> String {
    match node {
        Node::Group(g) => group_help(model, g, settings),
        Node::Command(c) => command_help(model, c, settings),
    }
}

fn command_help(model: &Model, cid: CommandId, settings: &ProgramSettings) -> String {
    let cmd = model.command(cid);
    let visible = model.visible_options(Node::Command(cid));
    let path = cmd.path.join(ID_SEPARATOR);

    let mut out = String::new();
    push_description(&mut out, cmd.description.as_deref());
    push_usage(&mut out, &[command_usage(model, cid, &path, &visible)]);
    push_section(&mut out, "Options", &option_rows(model, &visible, settings));
    push_section(&mut out, "Arguments", &argument_rows(&cmd.arguments, settings));
    out
}

fn group_help(model: &Model, gid: GroupId, settings: &ProgramSettings) -> String {
    let group = model.group(gid);
    let visible = model.visible_options(Node::Group(gid));
    let path = group.path.join(ID_SEPARATOR);
    let target = model.fallback_target(gid);

    let mut usage = Vec::new();
    if let Some(t) = target {
        usage.push(command_usage(model, t, &path, &visible));
    }
    let commands = command_rows(model, gid);
    if !commands.is_empty() {
        usage.push(format!("{path} [OPTIONS] <COMMAND>"));
    }
    if usage.is_empty() {
        usage.push(format!("{path} [OPTIONS]"));
    }

    let description = group
        .description
        .as_deref()
        .or_else(|| target.and_then(|t| model.command(t).description.as_deref()));

    let mut out = String::new();
    push_description(&mut out, description);
    push_usage(&mut out, &usage);
    push_section(&mut out, "Options", &option_rows(model, &visible, settings));
    if let Some(t) = target {
        push_section(
            &mut out,
            "Arguments",
            &argument_rows(&model.command(t).arguments, settings),
        );
    }
    push_section(&mut out, "Commands", &commands);
    out
}

fn command_usage(model: &Model, cid: CommandId, path: &str, visible: &[OptionKey]) -> String {
    let mut parts = vec![path.to_string(), "[OPTIONS]".to_string()];
    for &key in visible {
        let opt = model.option(key);
        if opt.is_required() {
            parts.push(format!("--{} <{}>", opt.long, opt.placeholder));
        }
    }
    parts.extend(model.command(cid).arguments.iter().map(argument_usage));
    parts.join(" ")
}

fn argument_usage(arg: &ArgumentInfo) -> String {
    let name = arg.display_name();
    if arg.is_params {
        format!("[{name}]...")
    } else if arg.is_required() {
        format!("<{name}>")
    } else {
        format!("[{name}]")
    }
}

fn option_rows(model: &Model, visible: &[OptionKey], settings: &ProgramSettings) -> Vec<Row> {
    let mut rows: Vec<Row> = visible
        .iter()
        .map(|&key| option_row(model.option(key), settings))
        .collect();
    rows.push(Row {
        left: format!("-{HELP_SHORT}, --{HELP_LONG}"),
        right: "Show help information".to_string(),
    });
    rows
}

fn option_row(opt: &OptionInfo, settings: &ProgramSettings) -> Row {
    let short = match opt.short {
        Some(alias) => format!("-{alias}, "),
        None => "    ".to_string(),
    };
    let value = if opt.is_flag() {
        String::new()
    } else if opt.is_repeatable() {
        format!(" <{}>...", opt.placeholder)
    } else {
        format!(" <{}>", opt.placeholder)
    };

    let mut notes = Vec::new();
    if opt.is_required() {
        notes.push("[required]".to_string());
    }
    if settings.show_defaults && !opt.is_flag() {
        if let Some(default) = opt.default.as_ref().filter(|d| !d.is_none()) {
            notes.push(format!("[default: {default}]"));
        }
    }

    Row {
        left: format!("{short}--{}{value}", opt.long),
        right: describe(opt.description.as_deref(), notes),
    }
}

fn argument_rows(arguments: &[ArgumentInfo], settings: &ProgramSettings) -> Vec<Row> {
    arguments
        .iter()
        .map(|arg| {
            let mut notes = Vec::new();
            if settings.show_defaults {
                if let Some(default) = arg.default.as_ref().filter(|d| !d.is_none()) {
                    notes.push(format!("[default: {default}]"));
                }
            }
            Row {
                left: argument_usage(arg),
                right: describe(arg.description.as_deref(), notes),
            }
        })
        .collect()
}

fn command_rows(model: &Model, gid: GroupId) -> Vec<Row> {
    let group = model.group(gid);
    let commands = group.commands.iter().filter_map(|&c| {
        let cmd = model.command(c);
        if cmd.is_hidden() {
            return None;
        }
        let notes = if group.default_command == Some(c) {
            vec!["[default]".to_string()]
        } else {
            Vec::new()
        };
        Some(Row {
            left: cmd.display_name().to_string(),
            right: describe(cmd.description.as_deref(), notes),
        })
    });
    let groups = group.groups.iter().map(|&g| {
        let child = model.group(g);
        Row {
            left: child.name.clone(),
            right: describe(child.description.as_deref(), Vec::new()),
        }
    });
    commands.chain(groups).collect()
}

fn describe(description: Option<&str>, notes: Vec<String>) -> String {
    description
        .map(str::to_string)
        .into_iter()
        .chain(notes)
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_description(out: &mut String, description: Option<&str>) {
    if let Some(desc) = description {
        out.push_str(desc);
        out.push_str("\n\n");
    }
}

fn push_usage(out: &mut String, lines: &[String]) {
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(USAGE_PREFIX);
        } else {
            out.push_str(&" ".repeat(USAGE_PREFIX.len()));
        }
        out.push_str(line);
        out.push('\n');
    }
}

fn push_section(out: &mut String, title: &str, rows: &[Row]) {
    if rows.is_empty() {
        return;
    }
    let width = rows
        .iter()
        .map(|r| r.left.chars().count())
        .max()
        .unwrap_or(0);

    out.push('\n');
    out.push_str(title);
    out.push_str(":\n");
    for row in rows {
        if row.right.is_empty() {
            out.push_str(&format!("{INDENT}{}\n", row.left));
        } else {
            out.push_str(&format!("{INDENT}{:<width$}  {}\n", row.left, row.right));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::{CommandBuilder, GroupBuilder, Handler, ParserInfo};

    fn noop() -> Handler {
        Handler::unit(|_| Ok(()))
    }

    fn model() -> Model {
        GroupBuilder::new("app")
            .with_description("Example program")
            .option(OptionInfo::flag("verbose").short('v').global().with_description("Chatty"))
            .command(
                CommandBuilder::new("fetch", noop())
                    .with_description("Fetch things")
                    .argument(ArgumentInfo::new("source", ParserInfo::Identity))
                    .argument(ArgumentInfo::new("dest", ParserInfo::Identity).with_default("."))
                    .argument(ArgumentInfo::params("extra", ParserInfo::Identity))
                    .option(
                        OptionInfo::value("URL_max_length", ParserInfo::from_str::<i64>())
                            .long("opt2")
                            .with_description("Limit"),
                    )
                    .option(
                        OptionInfo::value("depth", ParserInfo::from_str::<i64>())
                            .with_default(1i64),
                    ),
            )
            .group(
                GroupBuilder::new("with-hidden")
                    .with_description("Hidden target")
                    .command(
                        CommandBuilder::hidden(noop())
                            .argument(ArgumentInfo::params("items", ParserInfo::Identity)),
                    ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_command_help_layout() {
        let model = model();
        let fetch = model.find_command(model.root(), "fetch").unwrap();
        let help = render_help(&model, Node::Command(fetch), &ProgramSettings::default());

        let expected = "\
Fetch things

Usage: app fetch [OPTIONS] --opt2 <URL-MAX-LENGTH> <SOURCE> [DEST] [EXTRA]...

Options:
      --opt2 <URL-MAX-LENGTH>  Limit [required]
      --depth <DEPTH>          [default: 1]
  -v, --verbose                Chatty
  -h, --help                   Show help information

Arguments:
  <SOURCE>
  [DEST]      [default: .]
  [EXTRA]...
";
        assert_eq!(help, expected);
    }

    #[test]
    fn test_group_help_hides_hidden_command() {
        let model = model();
        let help = render_help(&model, Node::Group(model.root()), &ProgramSettings::default());

        assert!(help.starts_with("Example program\n\nUsage: app [OPTIONS] <COMMAND>\n"));
        assert!(help.contains("\nCommands:\n  fetch        Fetch things\n  with-hidden  Hidden target\n"));
        assert!(!help.contains('#'));
    }

    #[test]
    fn test_group_with_hidden_target_shows_its_usage() {
        let model = model();
        let group = model.find_group(model.root(), "with-hidden").unwrap();
        let help = render_help(&model, Node::Group(group), &ProgramSettings::default());
        assert!(help.contains("Usage: app with-hidden [OPTIONS] [ITEMS]...\n"));
        assert!(!help.contains("Commands:"));
    }

    #[test]
    fn test_defaults_can_be_hidden() {
        let model = model();
        let fetch = model.find_command(model.root(), "fetch").unwrap();
        let settings = ProgramSettings {
            show_defaults: false,
            ..Default::default()
        };
        let help = render_help(&model, Node::Command(fetch), &settings);
        assert!(!help.contains("[default:"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let model = model();
        let settings = ProgramSettings::default();
        let first = render_help(&model, Node::Group(model.root()), &settings);
        let second = render_help(&model, Node::Group(model.root()), &settings);
        assert_eq!(first, second);
    }
}
