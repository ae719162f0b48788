use std::collections::btree_map::Entry;
use thiserror::Error;

use crate::coerce::{check_inclusion, coerce, CoercionError};
use crate::constant::*;
use crate::model::{Arity, Kind, Params, Value};
use crate::schema::{ArgumentSpec, CommandSpec, OptionSpec};
use crate::tokens::{GlobalScope, OptionLookup, Token, Tokenizer};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An invalid declaration, detected when the [`CommandTable`](./struct.CommandTable.html) is finalized.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// A single problem found while parsing.
/// The `Display` of each variant is the human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No command token was provided.
    #[error("Unknown command")]
    NoCommand,

    /// The command token names no declared command.
    #[error("{} is an unknown command", capitalize(.0))]
    UnknownCommand(String),

    /// An option token names no declared option.
    #[error("{} is an unknown option", capitalize(.0))]
    UnknownOption(String),

    /// A required argument was not provided.
    #[error("{} is required", capitalize(.0))]
    MissingRequiredArgument(String),

    /// More positional tokens than declared arguments.
    #[error("Too many arguments")]
    TooManyArguments,

    /// A required option was not provided.
    #[error("{} is required", capitalize(.0))]
    MissingRequiredOption(String),

    /// A value could not be converted to the parameter's kind.
    #[error("{} is invalid", capitalize(.0))]
    TypeCoercion(String),

    /// A value is outside the parameter's allowed values.
    #[error("{} is invalid", capitalize(.0))]
    Inclusion(String),
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::default(),
    }
}

/// The errors of a failed parse, in a fixed order:
/// command resolution, unknown options, missing required arguments, too many arguments,
/// missing required options, then type/inclusion errors in token order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorList {
    errors: Vec<ParseError>,
}

impl ErrorList {
    /// The individual errors.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The human readable message of each error.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl From<ParseError> for ErrorList {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_messages().join("\n"))
    }
}

impl std::error::Error for ErrorList {}

/// The outcome of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// The recognized command.
    pub command: String,
    /// The argument values, in order (splat values expanded in place).
    pub args: Vec<Value>,
    /// The option values (global and command), including `help` unless it is disabled.
    pub params: Params,
}

impl ParseResult {
    /// Whether the help flag was given.
    pub fn help(&self) -> bool {
        matches!(self.params.get(HELP_NAME), Some(Value::Boolean(true)))
    }
}

pub(crate) struct Parser<'a> {
    commands: &'a [CommandSpec],
    globals: &'a [OptionSpec],
}

impl<'a> Parser<'a> {
    pub(crate) fn new(commands: &'a [CommandSpec], globals: &'a [OptionSpec]) -> Self {
        Self { commands, globals }
    }

    pub(crate) fn parse(&self, tokens: &[&str]) -> Result<ParseResult, ErrorList> {
        let global_scope = GlobalScope(self.globals);
        let mut tokenizer = Tokenizer::new(tokens, &global_scope);
        let mut leading = Vec::default();

        // 1. Resolve the command: the first positional token.
        // Anything ahead of it may only be a global option.
        let command = loop {
            match tokenizer.next() {
                Some(Token::Positional(name)) => {
                    match self.commands.iter().find(|c| c.name() == name) {
                        Some(command) => break command,
                        None => return Err(ErrorList::from(ParseError::UnknownCommand(name))),
                    }
                }
                Some(token) => leading.push(token),
                None => return Err(ErrorList::from(ParseError::NoCommand)),
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Resolved command '{}'.", command.name());
        }

        tokenizer.rescope(command);
        let trailing: Vec<Token> = tokenizer.collect();
        let mut matching = Matching::new(command);

        // 2. Match the options, collecting the positional tokens along the way.
        let offset = leading.len();

        for (index, token) in leading.into_iter().enumerate() {
            matching.feed(index, token, &global_scope);
        }

        for (index, token) in trailing.into_iter().enumerate() {
            matching.feed(offset + index, token, command);
        }

        matching.close()
    }

    /// Whether the help option is given as an option, rather than consumed as another option's value.
    pub(crate) fn help_requested(&self, tokens: &[&str]) -> bool {
        let global_scope = GlobalScope(self.globals);
        let mut tokenizer = Tokenizer::new(tokens, &global_scope);
        let mut scope: &dyn OptionLookup = &global_scope;
        let mut resolved = false;

        while let Some(token) = tokenizer.next() {
            let help = match token {
                Token::LongOption { name, .. } => {
                    matches!(scope.resolve_long(&name), Some((option, false)) if is_help(option))
                }
                Token::ShortOption { short, .. } => scope.by_short(short).map_or(false, is_help),
                Token::ShortFlagGroup(shorts) => shorts
                    .into_iter()
                    .any(|short| scope.by_short(short).map_or(false, is_help)),
                Token::Positional(name) if !resolved => {
                    resolved = true;

                    if let Some(command) = self.commands.iter().find(|c| c.name() == name) {
                        tokenizer.rescope(command);
                        scope = command;
                    }

                    false
                }
                Token::Positional(_) | Token::Unknown(_) => false,
            };

            if help {
                return true;
            }
        }

        false
    }
}

fn is_help(option: &OptionSpec) -> bool {
    option.name() == HELP_NAME
}

struct Matching<'a> {
    command: &'a CommandSpec,
    params: Params,
    args: Vec<Value>,
    positionals: Vec<(usize, String)>,
    unknown_options: Vec<ParseError>,
    missing_arguments: Vec<ParseError>,
    too_many_arguments: bool,
    missing_options: Vec<ParseError>,
    invalid: Vec<(usize, ParseError)>,
}

impl<'a> Matching<'a> {
    fn new(command: &'a CommandSpec) -> Self {
        Self {
            command,
            params: Params::default(),
            args: Vec::default(),
            positionals: Vec::default(),
            unknown_options: Vec::default(),
            missing_arguments: Vec::default(),
            too_many_arguments: false,
            missing_options: Vec::default(),
            invalid: Vec::default(),
        }
    }

    fn feed(&mut self, index: usize, token: Token, lookup: &dyn OptionLookup) {
        match token {
            Token::Unknown(name) => {
                self.unknown_options.push(ParseError::UnknownOption(name));
            }
            Token::LongOption { name, value } => match lookup.resolve_long(&name) {
                Some((option, negated)) => self.assign(index, option, value.as_deref(), negated),
                None => self.unknown_options.push(ParseError::UnknownOption(name)),
            },
            Token::ShortOption { short, value } => match lookup.by_short(short) {
                Some(option) => self.assign(index, option, value.as_deref(), false),
                None => self
                    .unknown_options
                    .push(ParseError::UnknownOption(short.to_string())),
            },
            Token::ShortFlagGroup(shorts) => {
                for short in shorts {
                    match lookup.by_short(short) {
                        Some(option) => self.assign(index, option, None, false),
                        None => self
                            .unknown_options
                            .push(ParseError::UnknownOption(short.to_string())),
                    }
                }
            }
            Token::Positional(value) => self.positionals.push((index, value)),
        }
    }

    fn assign(&mut self, index: usize, option: &OptionSpec, raw: Option<&str>, negated: bool) {
        let kind = option.kind();
        let value = match (raw, negated) {
            (None, true) => Ok(Value::Boolean(false)),
            (None, false) if kind == Kind::Boolean => Ok(Value::Boolean(true)),
            (Some(raw), false) => coerce(raw, kind),
            // A negation doesn't take a value, and every other kind needs one.
            (raw, _) => Err(CoercionError::Invalid {
                token: raw.unwrap_or_default().to_string(),
                kind,
            }),
        };
        let value = value.and_then(|v| check_inclusion(&v, option.allowed()).map(|_| v));

        match value {
            Ok(value) => {
                self.accumulate(option.name(), value.clone());
                option.run_hook(&value, &mut self.params);
            }
            Err(CoercionError::Invalid { .. }) => self
                .invalid
                .push((index, ParseError::TypeCoercion(option.name().to_string()))),
            Err(CoercionError::Excluded { .. }) => self
                .invalid
                .push((index, ParseError::Inclusion(option.name().to_string()))),
        }
    }

    // Arrays and hashes accumulate across occurrences; anything else is replaced.
    fn accumulate(&mut self, name: &str, value: Value) {
        match self.params.entry(name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Array(existing), Value::Array(items)) => existing.extend(items),
                (Value::Hash(existing), Value::Hash(pairs)) => existing.extend(pairs),
                (existing, value) => *existing = value,
            },
        }
    }

    fn match_arguments(&mut self) {
        let command = self.command;
        let positionals = std::mem::take(&mut self.positionals);
        let mut remaining = positionals.into_iter();

        for argument in command.arguments() {
            match argument.arity() {
                Arity::Single => match remaining.next() {
                    Some((index, raw)) => self.capture(index, argument, &raw),
                    None => self.absent(argument),
                },
                Arity::Splat => {
                    let rest: Vec<(usize, String)> = remaining.by_ref().collect();

                    if rest.is_empty() {
                        self.absent(argument);
                    }

                    for (index, raw) in rest {
                        self.capture(index, argument, &raw);
                    }
                }
                Arity::Greedy => {
                    let rest: Vec<(usize, String)> = remaining.by_ref().collect();

                    match rest.first() {
                        Some((index, _)) => {
                            let joined = rest
                                .iter()
                                .map(|(_, raw)| raw.as_str())
                                .collect::<Vec<&str>>()
                                .join(" ");
                            self.capture(*index, argument, &joined);
                        }
                        None => self.absent(argument),
                    }
                }
            }
        }

        if remaining.next().is_some() {
            self.too_many_arguments = true;
        }
    }

    fn capture(&mut self, index: usize, argument: &ArgumentSpec, raw: &str) {
        match coerce(raw, argument.kind()) {
            Ok(value) => self.args.push(value),
            Err(_) => self
                .invalid
                .push((index, ParseError::TypeCoercion(argument.name().to_string()))),
        }
    }

    fn absent(&mut self, argument: &ArgumentSpec) {
        if argument.required() {
            self.missing_arguments
                .push(ParseError::MissingRequiredArgument(argument.name().to_string()));
        } else if let Some(default) = argument.default() {
            self.args.push(default.clone());
        }
    }

    fn close(mut self) -> Result<ParseResult, ErrorList> {
        // 3. Match the positional tokens against the arguments.
        let help = matches!(self.params.get(HELP_NAME), Some(Value::Boolean(true)));
        self.match_arguments();

        // 4. Check the required options, then 5. fill in the defaults.
        let command = self.command;

        for option in command.merged_options() {
            if self.params.contains_key(option.name()) {
                continue;
            }

            if option.required() {
                self.missing_options
                    .push(ParseError::MissingRequiredOption(option.name().to_string()));
            } else if let Some(default) = option.default() {
                self.params
                    .insert(option.name().to_string(), default.clone());
            }
        }

        // 6. Aggregate.
        // When help is asked for, the completeness checks are waived so that help may be shown.
        let Matching {
            params,
            args,
            unknown_options,
            missing_arguments,
            too_many_arguments,
            missing_options,
            mut invalid,
            ..
        } = self;
        let mut errors = unknown_options;

        if !help {
            errors.extend(missing_arguments);

            if too_many_arguments {
                errors.push(ParseError::TooManyArguments);
            }

            errors.extend(missing_options);
        }

        invalid.sort_by_key(|(index, _)| *index);
        errors.extend(invalid.into_iter().map(|(_, error)| error));

        if errors.is_empty() {
            Ok(ParseResult {
                command: command.name().to_string(),
                args,
                params,
            })
        } else {
            Err(ErrorList { errors })
        }
    }
}
