//! Command backing operations and the invocation they receive.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::types::BoxError;
use crate::value::Value;

type UnitFn = dyn Fn(&mut Invocation<'_>) -> Result<(), BoxError> + Send + Sync;
type ExitCodeFn = dyn Fn(&mut Invocation<'_>) -> Result<i32, BoxError> + Send + Sync;

/// A command's backing operation.
///
/// The variant records the declared return type: only
/// [`Handler::ExitCode`] maps its result to the process exit code.
#[derive(Clone)]
pub enum Handler {
    Unit(Arc<UnitFn>),
    ExitCode(Arc<ExitCodeFn>),
}

impl Handler {
    pub fn unit<F>(f: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Handler::Unit(Arc::new(f))
    }

    pub fn exit_code<F>(f: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<i32, BoxError> + Send + Sync + 'static,
    {
        Handler::ExitCode(Arc::new(f))
    }

    pub fn has_exit_code(&self) -> bool {
        matches!(self, Handler::ExitCode(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Unit(_) => f.write_str("Handler::Unit"),
            Handler::ExitCode(_) => f.write_str("Handler::ExitCode"),
        }
    }
}

/// A bound parameter: backing symbol, long/display name, converted value.
#[derive(Debug, Clone)]
pub struct BoundValue {
    pub symbol: String,
    pub name: String,
    pub value: Value,
}

/// Fully bound call handed to a [`Handler`].
///
/// Own parameters are kept in the command's declared order; options
/// inherited from enclosing groups are looked up by name only.
pub struct Invocation<'a> {
    path: String,
    params: Vec<BoundValue>,
    inherited: Vec<BoundValue>,
    out: &'a mut dyn Write,
}

impl<'a> Invocation<'a> {
    pub fn new(
        path: String,
        params: Vec<BoundValue>,
        inherited: Vec<BoundValue>,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            path,
            params,
            inherited,
            out,
        }
    }

    /// Qualified path of the invoked command.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Own parameter values in declared order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|p| &p.value)
    }

    /// Looks up a value by backing symbol or long name, own parameters first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .chain(self.inherited.iter())
            .find(|p| p.symbol == name || p.name == name)
            .map(|p| &p.value)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Output stream for the command's regular output.
    pub fn out(&mut self) -> &mut dyn Write {
        self.out
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("inherited", &self.inherited)
            .finish_non_exhaustive()
    }
}
