//! Runtime for [`cmdtree_core`] models.
//!
//! A [`Program`] pairs a validated [`Model`] with its [`ProgramSettings`] and
//! turns an argument vector into one handler call:
//!
//! 1. [`resolve`] walks the group tree and records option occurrences and
//!    positionals in a [`ParseContext`];
//! 2. [`bind`] checks arity, converts every slot, then runs validators;
//! 3. [`dispatch`] calls the handler with the bound [`Invocation`].
//!
//! Parse failures are written to the diagnostic stream and end the run with
//! the usage-error exit code. `-h`/`--help` renders help for the node reached
//! so far. Handler errors are returned to the caller unchanged.
//!
//! [`Invocation`]: cmdtree_core::Invocation
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//!
//! use cmdtree_core::{ArgumentInfo, CommandBuilder, GroupBuilder, Handler, ParserInfo};
//! use cmdtree_engine::{ParseContext, Program};
//!
//! let model = GroupBuilder::new("calc")
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
//! let program = Program::new(model);
//! let args = vec!["sum".to_string(), "1".to_string(), "1".to_string()];
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! let code = program
//!     .invoke(&mut ParseContext::new(), &args, &mut out, &mut err)
//!     .unwrap();
//!
//! assert_eq!(code, 0);
//! assert_eq!(String::from_utf8(out).unwrap(), "2\n");
//! ```

mod bind;
mod context;
mod convert;
mod dispatch;
mod error;
mod help;
mod resolve;
mod token;
mod validation;

use std::io::{self, Write};

use cmdtree_core::{BoxError, Model, Node, ProgramSettings};
use tracing::debug;

pub use bind::{Bound, bind};
pub use context::{Occurrence, ParseContext, RawArgument};
pub use convert::{convert, convert_flag};
pub use dispatch::dispatch;
pub use error::{ParseError, Result};
pub use help::render_help;
pub use resolve::{Resolution, resolve};
pub use validation::validate;

/// A validated model ready to run.
#[derive(Debug)]
pub struct Program {
    model: Model,
    settings: ProgramSettings,
}

impl Program {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            settings: ProgramSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ProgramSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn settings(&self) -> &ProgramSettings {
        &self.settings
    }

    /// Help text for a group or command of this program.
    pub fn help(&self, node: Node) -> String {
        render_help(&self.model, node, &self.settings)
    }

    /// Runs `args` against process stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns the handler's error unchanged, or an I/O error if a stream
    /// cannot be written.
    pub fn run<I, S>(&self, args: I) -> std::result::Result<i32, BoxError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut ctx = ParseContext::new();
        let mut out = io::stdout().lock();
        let mut err = io::stderr().lock();
        let code = self.invoke(&mut ctx, &args, &mut out, &mut err)?;
        out.flush()?;
        Ok(code)
    }

    /// Runs `args` once, writing command output to `out` and help or
    /// diagnostics to `err`.
    ///
    /// `ctx` is reset on entry and keeps this run's state afterwards.
    ///
    /// # Errors
    ///
    /// Parse failures are not errors here: they are reported on `err` and
    /// turned into the usage-error exit code. Only handler errors and I/O
    /// failures are returned.
    pub fn invoke(
        &self,
        ctx: &mut ParseContext,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> std::result::Result<i32, BoxError> {
        ctx.reset();
        debug!(args = args.len(), "Invoking program");

        let command = match resolve(&self.model, args, ctx) {
            Ok(Resolution::Command(command)) => command,
            Ok(Resolution::Help(node)) => return self.show_help(node, err),
            Ok(Resolution::Group(group)) => return self.show_help(Node::Group(group), err),
            Err(e) => return self.report(&e, err),
        };

        let bound = match bind(&self.model, command, ctx) {
            Ok(bound) => bound,
            Err(e) => return self.report(&e, err),
        };
        ctx.set_bound(bound.params.clone(), bound.inherited.clone());

        dispatch(&self.model, bound, out)
    }

    fn show_help(&self, node: Node, err: &mut dyn Write) -> std::result::Result<i32, BoxError> {
        err.write_all(self.help(node).as_bytes())?;
        Ok(self.settings.help_exit_code)
    }

    fn report(&self, e: &ParseError, err: &mut dyn Write) -> std::result::Result<i32, BoxError> {
        debug!(error = %e, "Parse failed");
        if e.is_reported() {
            writeln!(err, "{e}")?;
        }
        Ok(e.exit_code(&self.settings))
    }
}
