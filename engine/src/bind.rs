//! Slot binding: arity checks, conversion and validation of everything the
//! resolver recorded for the target command.

use cmdtree_core::{
    ArgumentInfo, BoundValue, CommandId, Model, OptionInfo, OptionKey, OptionKind,
    OptionOwner, ParamSlot, ValidatorInfo, Value,
};
use tracing::debug;

use crate::context::{Occurrence, ParseContext, RawArgument};
use crate::convert::{convert, convert_flag};
use crate::error::{ParseError, Result};
use crate::validation::validate;

/// Converted values of one command, ready for dispatch.
#[derive(Debug)]
pub struct Bound {
    pub command: CommandId,
    /// Own arguments and options in declared parameter order.
    pub params: Vec<BoundValue>,
    /// Options of enclosing groups: inherited globals, then group options
    /// given before the command name.
    pub inherited: Vec<BoundValue>,
}

/// A converted slot awaiting validation.
struct Converted<'m> {
    value: Value,
    /// Came from the command line rather than a default.
    explicit: bool,
    name: String,
    validators: &'m [ValidatorInfo],
}

/// Binds the recorded tokens to `command`'s slots.
///
/// Conversion of every slot happens before any validator runs.
pub fn bind(model: &Model, command: CommandId, ctx: &ParseContext) -> Result<Bound> {
    let cmd = model.command(command);
    let given = ctx.positionals();
    check_arity(cmd.required_count(), cmd.fixed_count(), cmd.params_argument().is_some(), given)?;
    debug!(
        command = %cmd.id,
        positionals = given.len(),
        occurrences = ctx.occurrences().len(),
        "Binding command"
    );

    let fixed = cmd.fixed_count();
    let mut arguments = Vec::with_capacity(cmd.arguments.len());
    for (i, arg) in cmd.arguments.iter().enumerate() {
        let raw = if arg.is_params {
            given.get(fixed..).unwrap_or_default()
        } else {
            given.get(i..=i).unwrap_or_default()
        };
        arguments.push(bind_argument(arg, raw)?);
    }

    let keys = model.path_options(command);
    let mut options = Vec::with_capacity(keys.len());
    for &key in &keys {
        let occurrences: Vec<&Occurrence> = ctx.occurrences_of(key).collect();
        options.push(bind_option(model.option(key), &occurrences)?);
    }

    for slot in arguments.iter().chain(options.iter()) {
        if slot.explicit {
            validate(slot.validators, &slot.value, &slot.name)?;
        }
    }

    let mut arguments: Vec<Option<Value>> = arguments.into_iter().map(|s| Some(s.value)).collect();
    let mut options: Vec<(OptionKey, Option<Value>)> = keys
        .into_iter()
        .zip(options.into_iter().map(|s| Some(s.value)))
        .collect();

    let mut params = Vec::with_capacity(cmd.params_order.len());
    for slot in &cmd.params_order {
        match *slot {
            ParamSlot::Argument(i) => {
                let arg = &cmd.arguments[i];
                params.push(BoundValue {
                    symbol: arg.symbol.clone(),
                    name: arg.display_name(),
                    value: arguments[i].take().unwrap_or_default(),
                });
            }
            ParamSlot::Option(index) => {
                let key = OptionKey {
                    owner: OptionOwner::Command(command),
                    index,
                };
                let value = options
                    .iter_mut()
                    .find(|(k, _)| *k == key)
                    .and_then(|(_, v)| v.take())
                    .unwrap_or_default();
                params.push(option_value(model.option(key), value));
            }
        }
    }

    let inherited = options
        .into_iter()
        .filter(|(key, _)| key.owner != OptionOwner::Command(command))
        .map(|(key, value)| option_value(model.option(key), value.unwrap_or_default()))
        .collect();

    Ok(Bound {
        command,
        params,
        inherited,
    })
}

fn check_arity(
    required: usize,
    fixed: usize,
    has_params: bool,
    given: &[RawArgument],
) -> Result<()> {
    if given.len() < required {
        return Err(ParseError::MissingArguments {
            expected: required,
            got: given.len(),
        });
    }
    if given.len() > fixed && !has_params {
        return Err(ParseError::TooManyArguments {
            max: fixed,
            got: given.len(),
            token: given[fixed].text.clone(),
        });
    }
    Ok(())
}

fn bind_argument<'m>(arg: &'m ArgumentInfo, raw: &[RawArgument]) -> Result<Converted<'m>> {
    let name = format!("<{}>", arg.display_name());

    let value = if arg.is_params {
        let items = raw
            .iter()
            .map(|r| convert(&arg.parser, &r.text, &name))
            .collect::<Result<Vec<_>>>()?;
        Value::List(items)
    } else {
        match raw.first() {
            Some(r) => convert(&arg.parser, &r.text, &name)?,
            None => {
                return Ok(Converted {
                    value: arg.default.clone().unwrap_or_default(),
                    explicit: false,
                    name,
                    validators: &arg.validators,
                });
            }
        }
    };

    Ok(Converted {
        value,
        explicit: true,
        name,
        validators: &arg.validators,
    })
}

fn bind_option<'m>(opt: &'m OptionInfo, occurrences: &[&Occurrence]) -> Result<Converted<'m>> {
    let name = opt.display_name();

    if occurrences.is_empty() {
        // A flag or repeatable option made optional still has a value.
        let value = match &opt.default {
            Some(default) if !default.is_none() => default.clone(),
            _ if opt.is_flag() => Value::Bool(false),
            _ if opt.is_repeatable() => Value::List(Vec::new()),
            Some(default) => default.clone(),
            None => return Err(ParseError::MissingOption { option: name }),
        };
        return Ok(Converted {
            value,
            explicit: false,
            name,
            validators: &opt.validators,
        });
    }

    let value = match &opt.kind {
        OptionKind::Flag => {
            let default = opt.default.as_ref().and_then(Value::as_bool).unwrap_or(false);
            let mut converted = occurrences
                .iter()
                .map(|o| convert_flag(o.value.as_deref(), default, &name))
                .collect::<Result<Vec<_>>>()?;
            converted.pop().unwrap_or_default()
        }
        OptionKind::Value { parser, .. } => {
            let mut converted = Vec::with_capacity(occurrences.len());
            for occurrence in occurrences {
                let raw = occurrence.value.as_deref().unwrap_or_default();
                converted.push(convert(parser, raw, &name)?);
            }
            if opt.is_repeatable() {
                Value::List(converted)
            } else {
                converted.pop().unwrap_or_default()
            }
        }
    };

    Ok(Converted {
        value,
        explicit: true,
        name,
        validators: &opt.validators,
    })
}

fn option_value(opt: &OptionInfo, value: Value) -> BoundValue {
    BoundValue {
        symbol: opt.symbol.clone(),
        name: opt.long.clone(),
        value,
    }
}
