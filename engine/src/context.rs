//! Per-run binding state.
//!
//! A [`ParseContext`] holds everything one invocation accumulates: raw
//! option occurrences, positional tokens, "was set" markers and the final
//! bound values. The model itself is never mutated. Reuse a context across
//! invocations only through [`ParseContext::reset`].

use std::collections::HashSet;

use cmdtree_core::{BoundValue, CommandId, OptionKey, Value};

/// One occurrence of an option on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub key: OptionKey,
    /// Inline (`--name=value`) or following-element value; `None` for a bare
    /// flag.
    pub value: Option<String>,
    /// The argv element that named the option.
    pub raw: String,
    pub position: usize,
}

/// A positional token with its argv position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    pub text: String,
    pub position: usize,
}

#[derive(Debug, Default)]
pub struct ParseContext {
    occurrences: Vec<Occurrence>,
    positionals: Vec<RawArgument>,
    was_set: HashSet<OptionKey>,
    target: Option<CommandId>,
    params: Vec<BoundValue>,
    inherited: Vec<BoundValue>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state from a previous run.
    pub fn reset(&mut self) {
        self.occurrences.clear();
        self.positionals.clear();
        self.was_set.clear();
        self.target = None;
        self.params.clear();
        self.inherited.clear();
    }

    pub fn record_option(&mut self, occurrence: Occurrence) {
        self.was_set.insert(occurrence.key);
        self.occurrences.push(occurrence);
    }

    pub fn record_positional(&mut self, text: String, position: usize) {
        self.positionals.push(RawArgument { text, position });
    }

    /// Whether the option appeared at least once in this run.
    pub fn was_set(&self, key: OptionKey) -> bool {
        self.was_set.contains(&key)
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Occurrences of one option, in command-line order.
    pub fn occurrences_of(&self, key: OptionKey) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter().filter(move |o| o.key == key)
    }

    pub fn positionals(&self) -> &[RawArgument] {
        &self.positionals
    }

    /// Command selected by the last run, if resolution got that far.
    pub fn target(&self) -> Option<CommandId> {
        self.target
    }

    pub(crate) fn set_target(&mut self, target: CommandId) {
        self.target = Some(target);
    }

    pub(crate) fn set_bound(&mut self, params: Vec<BoundValue>, inherited: Vec<BoundValue>) {
        self.params = params;
        self.inherited = inherited;
    }

    pub fn params(&self) -> &[BoundValue] {
        &self.params
    }

    pub fn inherited(&self) -> &[BoundValue] {
        &self.inherited
    }

    /// Bound value by backing symbol or long name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .chain(self.inherited.iter())
            .find(|b| b.symbol == name || b.name == name)
            .map(|b| &b.value)
    }
}
