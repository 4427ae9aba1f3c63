//! Sample command tree served by the `cmdtree` binary.

use std::io::Write;

use cmdtree_core::{
    ArgumentInfo, CommandBuilder, GroupBuilder, Handler, Model, ModelError, OptionInfo,
    ParserInfo, SetterConvention, ValidatorInfo, Value,
};

const COLOR_CHOICES: [&str; 3] = ["auto", "always", "never"];

/// Builds the demo model.
///
/// # Errors
///
/// Returns the first structural defect of the tree.
pub fn model() -> Result<Model, ModelError> {
    GroupBuilder::new("demo")
        .with_description("Sample command tree")
        .option(
            OptionInfo::flag("verbose")
                .short('v')
                .global()
                .with_description("Print extra detail"),
        )
        .option(
            OptionInfo::value("color", ParserInfo::AutoHandled(color_setter()))
                .global()
                .with_placeholder("WHEN")
                .with_default("auto")
                .with_description("When to colorize output"),
        )
        .command(sum())
        .command(echo())
        .command(exit())
        .group(with_hidden())
        .group(with_visible())
        .group(remote())
        .build()
}

fn color_setter() -> SetterConvention {
    SetterConvention::message(|raw| {
        (!COLOR_CHOICES.contains(&raw))
            .then(|| format!("expected one of {}", COLOR_CHOICES.join(", ")))
    })
}

fn sum() -> CommandBuilder {
    CommandBuilder::new(
        "sum",
        Handler::unit(|inv| {
            let total = inv.int("a").unwrap_or_default() + inv.int("b").unwrap_or_default();
            writeln!(inv.out(), "{total}")?;
            Ok(())
        }),
    )
    .with_description("Add two integers")
    .argument(ArgumentInfo::new("a", ParserInfo::from_str::<i64>()))
    .argument(ArgumentInfo::new("b", ParserInfo::from_str::<i64>()))
}

fn echo() -> CommandBuilder {
    CommandBuilder::new(
        "echo",
        Handler::unit(|inv| {
            let sep = inv.str("sep").unwrap_or(" ").to_string();
            let words: Vec<String> = inv
                .get("words")
                .and_then(Value::as_list)
                .unwrap_or_default()
                .iter()
                .map(Value::to_string)
                .collect();
            let mut line = words.join(&sep);
            if inv.flag("upper") {
                line = line.to_uppercase();
            }
            writeln!(inv.out(), "{line}")?;
            Ok(())
        }),
    )
    .with_description("Print words")
    .option(
        OptionInfo::flag("upper")
            .short('u')
            .with_description("Uppercase the output"),
    )
    .option(
        OptionInfo::value("sep", ParserInfo::Identity)
            .short('s')
            .with_default(" ")
            .with_description("Word separator"),
    )
    .argument(ArgumentInfo::params("words", ParserInfo::Identity))
}

fn exit() -> CommandBuilder {
    CommandBuilder::new(
        "exit",
        Handler::exit_code(|inv| {
            let code = inv.int("code").unwrap_or_default();
            Ok(i32::try_from(code)?)
        }),
    )
    .with_description("Exit with the given status")
    .argument(
        ArgumentInfo::new("code", ParserInfo::from_str::<i64>()).with_validator(
            ValidatorInfo::check(|v| v.as_int().is_some_and(|c| (0..=255).contains(&c)))
                .with_message("exit code must be between 0 and 255"),
        ),
    )
}

fn with_hidden() -> GroupBuilder {
    GroupBuilder::new("withHidden")
        .with_description("Group whose hidden command takes every token")
        .command(
            CommandBuilder::hidden(Handler::unit(|inv| {
                let items = inv.get("items").cloned().unwrap_or_default();
                writeln!(inv.out(), "{items}")?;
                Ok(())
            }))
            .argument(ArgumentInfo::params("items", ParserInfo::Identity)),
        )
}

fn with_visible() -> GroupBuilder {
    GroupBuilder::new("withVisible")
        .with_description("Group with a named default command")
        .default_command(
            CommandBuilder::new(
                "bar",
                Handler::unit(|inv| {
                    let flag = if inv.flag("flag") { "True" } else { "False" };
                    let a = inv.int("a").unwrap_or_default();
                    writeln!(inv.out(), "bar({flag}): {a}")?;
                    Ok(())
                }),
            )
            .with_description("Print the flag and a number")
            .option(OptionInfo::flag("flag").short('f'))
            .argument(ArgumentInfo::new("a", ParserInfo::from_str::<i64>())),
        )
}

fn remote() -> GroupBuilder {
    GroupBuilder::new("remote")
        .with_description("Manage remotes")
        .option(
            OptionInfo::flag("dry_run")
                .short('n')
                .with_description("Only show what would change"),
        )
        .command(
            CommandBuilder::new(
                "add",
                Handler::unit(|inv| {
                    let name = inv.str("name").unwrap_or_default().to_string();
                    let url = inv.str("url").unwrap_or_default().to_string();
                    let tags = inv.get("tag").cloned().unwrap_or_default();
                    let verb = if inv.flag("dry-run") { "would add" } else { "added" };
                    writeln!(inv.out(), "{verb} {name} -> {url} [{tags}]")?;
                    Ok(())
                }),
            )
            .with_description("Add a remote")
            .argument(ArgumentInfo::new("name", ParserInfo::Identity))
            .argument(ArgumentInfo::new(
                "url",
                ParserInfo::constructor(|raw| {
                    if raw.contains("://") {
                        Ok(Value::from(raw))
                    } else {
                        Err(format!("'{raw}' is not an absolute URL"))
                    }
                }),
            ))
            .option(
                OptionInfo::value("tag", ParserInfo::Identity)
                    .short('t')
                    .sequence()
                    .with_description("Label for the remote"),
            ),
        )
        .default_command(
            CommandBuilder::new(
                "list",
                Handler::unit(|inv| {
                    let dry_run = inv.flag("dry-run");
                    writeln!(inv.out(), "origin (dry run: {dry_run})")?;
                    Ok(())
                }),
            )
            .with_description("List remotes"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::validate_model;

    #[test]
    fn test_demo_model_is_valid() {
        let model = model().unwrap();
        assert!(validate_model(&model).is_empty());
        assert_eq!(model.name(), "demo");
    }

    #[test]
    fn test_group_names_are_kebab_cased() {
        let model = model().unwrap();
        assert!(model.find_group(model.root(), "with-hidden").is_some());
        assert!(model.find_group(model.root(), "with-visible").is_some());
    }
}
