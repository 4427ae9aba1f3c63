//! Handler dispatch.

use std::io::Write;

use cmdtree_core::{BoxError, Handler, ID_SEPARATOR, Invocation, Model};
use tracing::debug;

use crate::bind::Bound;

/// Runs the bound command's handler and returns its exit code.
///
/// Handlers without an exit code report `0` on success. Handler errors are
/// returned unchanged.
pub fn dispatch(model: &Model, bound: Bound, out: &mut dyn Write) -> Result<i32, BoxError> {
    let cmd = model.command(bound.command);
    let mut invocation = Invocation::new(
        cmd.path.join(ID_SEPARATOR),
        bound.params,
        bound.inherited,
        out,
    );
    debug!(command = %cmd.id, "Dispatching");

    let code = match &cmd.handler {
        Handler::Unit(run) => run(&mut invocation).map(|()| 0)?,
        Handler::ExitCode(run) => run(&mut invocation)?,
    };
    debug!(command = %cmd.id, code, "Handler finished");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::{ArgumentInfo, CommandBuilder, GroupBuilder, ParserInfo};

    fn bound_for(model: &Model, name: &str) -> Bound {
        Bound {
            command: model.find_command(model.root(), name).unwrap(),
            params: Vec::new(),
            inherited: Vec::new(),
        }
    }

    #[test]
    fn test_exit_code_handler_sets_code() {
        let model = GroupBuilder::new("app")
            .command(CommandBuilder::new("quit", Handler::exit_code(|_| Ok(7))))
            .command(CommandBuilder::new(
                "echo",
                Handler::unit(|inv| {
                    let path = inv.path().to_string();
                    writeln!(inv.out(), "{path}")?;
                    Ok(())
                }),
            ))
            .build()
            .unwrap();

        let mut out = Vec::new();
        assert_eq!(dispatch(&model, bound_for(&model, "quit"), &mut out).unwrap(), 7);
        assert_eq!(dispatch(&model, bound_for(&model, "echo"), &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "app echo\n");
    }

    #[test]
    fn test_handler_error_propagates() {
        let model = GroupBuilder::new("app")
            .command(
                CommandBuilder::new("fail", Handler::unit(|_| Err("disk full".into())))
                    .argument(ArgumentInfo::new("x", ParserInfo::Identity).with_default("")),
            )
            .build()
            .unwrap();

        let mut out = Vec::new();
        let err = dispatch(&model, bound_for(&model, "fail"), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }
}
