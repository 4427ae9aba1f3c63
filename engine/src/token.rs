//! Argv tokenizer.
//!
//! Classifies raw elements left to right. Whether an option consumes the
//! following element depends on the options visible at that point, so each
//! step takes the current [`Scope`]. The stream is lazy and cannot be
//! restarted.

use std::collections::VecDeque;

use cmdtree_core::{HELP_LONG, HELP_SHORT, Model, Node, OptionKey};

use crate::error::{ParseError, Result};

/// Options visible at one point of resolution.
#[derive(Debug)]
pub struct Scope<'m> {
    model: &'m Model,
    keys: Vec<OptionKey>,
}

impl<'m> Scope<'m> {
    pub fn new(model: &'m Model, node: Node) -> Self {
        Self {
            model,
            keys: model.visible_options(node),
        }
    }

    pub fn find_long(&self, name: &str) -> Option<OptionKey> {
        self.keys
            .iter()
            .copied()
            .find(|&k| self.model.option(k).matches_long(name))
    }

    pub fn find_short(&self, alias: char) -> Option<OptionKey> {
        self.keys
            .iter()
            .copied()
            .find(|&k| self.model.option(k).matches_short(alias))
    }

    fn is_flag(&self, key: OptionKey) -> bool {
        self.model.option(key).is_flag()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `--`
    Terminator,
    /// `-h` or `--help`.
    Help,
    Option {
        key: OptionKey,
        value: Option<String>,
    },
    Positional(String),
}

/// A classified argv element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The argv element the token came from.
    pub raw: String,
    /// Index of that element in argv.
    pub position: usize,
}

#[derive(Debug)]
pub struct Tokenizer<'a> {
    args: &'a [String],
    next: usize,
    terminated: bool,
    pending: VecDeque<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self {
            args,
            next: 0,
            terminated: false,
            pending: VecDeque::new(),
        }
    }

    /// Whether `--` has been seen.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Classifies the next element against `scope`.
    pub fn next_token(&mut self, scope: &Scope<'_>) -> Option<Result<Token>> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(token));
        }

        let position = self.next;
        let raw = self.args.get(position)?.clone();
        self.next += 1;

        if self.terminated {
            return Some(Ok(positional(raw, position)));
        }
        if raw == "--" {
            self.terminated = true;
            return Some(Ok(Token {
                kind: TokenKind::Terminator,
                raw,
                position,
            }));
        }

        let result = if let Some(body) = raw.strip_prefix("--") {
            self.long_option(scope, body, &raw, position)
        } else if raw.len() > 1 && raw.starts_with('-') {
            self.short_options(scope, &raw, position)
        } else {
            Ok(positional(raw, position))
        };
        Some(result)
    }

    fn long_option(
        &mut self,
        scope: &Scope<'_>,
        body: &str,
        raw: &str,
        position: usize,
    ) -> Result<Token> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };

        let Some(key) = scope.find_long(name) else {
            if name == HELP_LONG && inline.is_none() {
                return Ok(token(TokenKind::Help, raw, position));
            }
            return Err(ParseError::UnknownOption {
                token: raw.to_string(),
                position,
            });
        };

        let value = match inline {
            Some(value) => Some(value),
            None if scope.is_flag(key) => None,
            None => Some(self.take_value(raw, position)?),
        };
        Ok(token(TokenKind::Option { key, value }, raw, position))
    }

    fn short_options(&mut self, scope: &Scope<'_>, raw: &str, position: usize) -> Result<Token> {
        let aliases: Vec<char> = raw[1..].chars().collect();
        let Some((last, leading)) = aliases.split_last() else {
            return Ok(positional(raw.to_string(), position));
        };

        if scope.find_short(aliases[0]).is_none() && looks_like_number(raw) {
            return Ok(positional(raw.to_string(), position));
        }

        for &alias in leading {
            let kind = match scope.find_short(alias) {
                Some(key) if scope.is_flag(key) => TokenKind::Option { key, value: None },
                Some(_) => {
                    return Err(ParseError::InvalidShortCombination {
                        token: raw.to_string(),
                        alias,
                        position,
                    });
                }
                None if alias == HELP_SHORT => TokenKind::Help,
                None => {
                    return Err(ParseError::UnknownOption {
                        token: format!("-{alias}"),
                        position,
                    });
                }
            };
            self.pending.push_back(token(kind, raw, position));
        }

        let kind = match scope.find_short(*last) {
            Some(key) if scope.is_flag(key) => TokenKind::Option { key, value: None },
            Some(key) => TokenKind::Option {
                key,
                value: Some(self.take_value(raw, position)?),
            },
            None if *last == HELP_SHORT => TokenKind::Help,
            None => {
                return Err(ParseError::UnknownOption {
                    token: format!("-{last}"),
                    position,
                });
            }
        };
        self.pending.push_back(token(kind, raw, position));

        match self.pending.pop_front() {
            Some(first) => Ok(first),
            None => Ok(positional(raw.to_string(), position)),
        }
    }

    fn take_value(&mut self, option: &str, position: usize) -> Result<String> {
        match self.args.get(self.next) {
            Some(value) => {
                self.next += 1;
                Ok(value.clone())
            }
            None => Err(ParseError::MissingOptionValue {
                option: option.to_string(),
                position,
            }),
        }
    }
}

fn token(kind: TokenKind, raw: &str, position: usize) -> Token {
    Token {
        kind,
        raw: raw.to_string(),
        position,
    }
}

fn positional(raw: String, position: usize) -> Token {
    Token {
        kind: TokenKind::Positional(raw.clone()),
        raw,
        position,
    }
}

/// `-5`, `-0.25` and similar negative numbers.
fn looks_like_number(raw: &str) -> bool {
    let body = &raw[1..];
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.') && body.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdtree_core::{CommandBuilder, GroupBuilder, Handler, OptionInfo, ParserInfo};

    fn model() -> Model {
        GroupBuilder::new("app")
            .default_command(
                CommandBuilder::new("run", Handler::unit(|_| Ok(())))
                    .option(OptionInfo::flag("all").short('a'))
                    .option(OptionInfo::flag("brief").short('b'))
                    .option(OptionInfo::value("output", ParserInfo::Identity).short('o').optional()),
            )
            .build()
            .unwrap()
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn collect(model: &Model, raw: &[&str]) -> Result<Vec<Token>> {
        let scope = Scope::new(model, Node::Group(model.root()));
        let argv = args(raw);
        let mut tokenizer = Tokenizer::new(&argv);
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token(&scope) {
            out.push(token?);
        }
        Ok(out)
    }

    fn long_of(model: &Model, token: &Token) -> String {
        match &token.kind {
            TokenKind::Option { key, .. } => model.option(*key).long.clone(),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn test_long_option_consumes_next_element() {
        let model = model();
        let tokens = collect(&model, &["--output", "--weird", "x"]).unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(
            matches!(&tokens[0].kind, TokenKind::Option { value: Some(v), .. } if v == "--weird")
        );
        assert_eq!(tokens[1].kind, TokenKind::Positional("x".into()));
        assert_eq!(tokens[1].position, 2);
    }

    #[test]
    fn test_inline_value_splits_at_first_equals() {
        let model = model();
        let tokens = collect(&model, &["--output=a=b"]).unwrap();
        assert!(matches!(&tokens[0].kind, TokenKind::Option { value: Some(v), .. } if v == "a=b"));
    }

    #[test]
    fn test_flag_does_not_consume_next_element() {
        let model = model();
        let tokens = collect(&model, &["--all", "x"]).unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Option { value: None, .. }));
        assert_eq!(tokens[1].kind, TokenKind::Positional("x".into()));
    }

    #[test]
    fn test_combined_short_flags_with_trailing_value() {
        let model = model();
        let tokens = collect(&model, &["-abo", "out.txt"]).unwrap();
        let longs: Vec<String> = tokens.iter().map(|t| long_of(&model, t)).collect();
        assert_eq!(longs, vec!["all", "brief", "output"]);
        assert!(
            matches!(&tokens[2].kind, TokenKind::Option { value: Some(v), .. } if v == "out.txt")
        );
    }

    #[test]
    fn test_combined_short_rejects_value_option_before_last() {
        let model = model();
        let err = collect(&model, &["-oa", "x"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidShortCombination {
                token: "-oa".into(),
                alias: 'o',
                position: 0
            }
        );
    }

    #[test]
    fn test_terminator_makes_everything_positional() {
        let model = model();
        let tokens = collect(&model, &["--", "--all", "-b"]).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Terminator);
        assert_eq!(tokens[1].kind, TokenKind::Positional("--all".into()));
        assert_eq!(tokens[2].kind, TokenKind::Positional("-b".into()));
    }

    #[test]
    fn test_unknown_option_names_token() {
        let model = model();
        let err = collect(&model, &["--nope"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOption {
                token: "--nope".into(),
                position: 0
            }
        );
    }

    #[test]
    fn test_help_and_negative_numbers() {
        let model = model();
        let tokens = collect(&model, &["-5", "-1.5", "-h", "--help"]).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Positional("-5".into()));
        assert_eq!(tokens[1].kind, TokenKind::Positional("-1.5".into()));
        assert_eq!(tokens[2].kind, TokenKind::Help);
        assert_eq!(tokens[3].kind, TokenKind::Help);
    }

    #[test]
    fn test_missing_value_at_end() {
        let model = model();
        let err = collect(&model, &["-o"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingOptionValue {
                option: "-o".into(),
                position: 0
            }
        );
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let model = model();
        let tokens = collect(&model, &["-"]).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Positional("-".into()));
    }
}
