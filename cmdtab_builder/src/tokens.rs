use crate::coerce::parse_number;
use crate::constant::*;
use crate::model::Kind;
use crate::schema::{CommandSpec, OptionSpec};

/// A classified Cli token.
///
/// Values have already been attached to their options: `--key value` and `--key=value` both produce
/// `LongOption { name: "key", value: Some("value") }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    LongOption { name: String, value: Option<String> },
    ShortOption { short: char, value: Option<String> },
    ShortFlagGroup(Vec<char>),
    Positional(String),
    // A dash token which names no declared option.
    Unknown(String),
}

/// The options visible to the tokenizer.
pub(crate) trait OptionLookup {
    fn by_name(&self, name: &str) -> Option<&OptionSpec>;

    fn by_short(&self, short: char) -> Option<&OptionSpec>;

    /// Resolve a long name, including the `no-NAME` negation of a boolean.
    /// The flag is `true` when negated.
    fn resolve_long(&self, name: &str) -> Option<(&OptionSpec, bool)> {
        if let Some(option) = self.by_name(name) {
            return Some((option, false));
        }

        let positive = name.strip_prefix(NEGATION_PREFIX)?;

        match self.by_name(positive) {
            Some(option) if option.is_boolean() && option.use_no() => Some((option, true)),
            _ => None,
        }
    }

    fn is_boolean_short(&self, short: char) -> bool {
        self.by_short(short).map_or(false, OptionSpec::is_boolean)
    }
}

/// The global options only: used for the tokens ahead of the command.
pub(crate) struct GlobalScope<'a>(pub(crate) &'a [OptionSpec]);

impl<'a> OptionLookup for GlobalScope<'a> {
    fn by_name(&self, name: &str) -> Option<&OptionSpec> {
        self.0.iter().find(|o| o.name() == name)
    }

    fn by_short(&self, short: char) -> Option<&OptionSpec> {
        self.0.iter().find(|o| o.short() == Some(short))
    }
}

impl OptionLookup for CommandSpec {
    fn by_name(&self, name: &str) -> Option<&OptionSpec> {
        self.option(name)
    }

    // A global shadowed by a local option is hidden under its short too.
    fn by_short(&self, short: char) -> Option<&OptionSpec> {
        self.merged_options().find(|o| o.short() == Some(short))
    }
}

pub(crate) struct Tokenizer<'t> {
    raw: &'t [&'t str],
    position: usize,
    lookup: &'t dyn OptionLookup,
    terminated: bool,
}

impl<'t> Tokenizer<'t> {
    pub(crate) fn new(raw: &'t [&'t str], lookup: &'t dyn OptionLookup) -> Self {
        Self {
            raw,
            position: 0,
            lookup,
            terminated: false,
        }
    }

    /// Switch the visible options for the tokens that follow.
    pub(crate) fn rescope(&mut self, lookup: &'t dyn OptionLookup) {
        self.lookup = lookup;
    }

    fn long(&mut self, raw: &str, body: &str) -> Token {
        // Find a 'long' flag, such as:
        //  --initial
        //  --initial ..
        //  --initial=..
        //  --no-initial
        let (name, inline) = split_inline(body);
        let lookup = self.lookup;

        match lookup.resolve_long(name) {
            Some((option, negated)) => {
                let value = if negated || option.is_boolean() {
                    inline.map(String::from)
                } else {
                    self.take_value(option.kind(), inline)
                };

                Token::LongOption {
                    name: name.to_string(),
                    value,
                }
            }
            None => Token::Unknown(unknown_name(raw, name)),
        }
    }

    fn short(&mut self, raw: &str, body: &str) -> Token {
        // Find 'short' flag(s), such as (both -i and -v are example boolean flags, -n takes a value):
        //  -i
        //  -i=..
        //  -iv
        //  -n ..
        //  -n..
        //  -n=..
        let (head, _) = split_inline(body);
        let mut chars = body.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return Token::Positional(raw.to_string()),
        };
        let rest = chars.as_str();

        let lookup = self.lookup;
        let option = match lookup.by_short(first) {
            Some(option) => option,
            None if parse_number(raw).is_some() => return Token::Positional(raw.to_string()),
            None => return Token::Unknown(unknown_name(raw, head)),
        };
        let kind = option.kind();

        if rest.is_empty() {
            let value = if kind == Kind::Boolean {
                None
            } else {
                self.take_value(kind, None)
            };

            return Token::ShortOption {
                short: first,
                value,
            };
        }

        if let Some(inline) = rest.strip_prefix(INLINE_DELIMITER) {
            let value = if kind == Kind::Boolean {
                Some(inline.to_string())
            } else {
                self.take_value(kind, Some(inline))
            };

            return Token::ShortOption {
                short: first,
                value,
            };
        }

        if kind != Kind::Boolean {
            return Token::ShortOption {
                short: first,
                value: self.take_value(kind, Some(rest)),
            };
        }

        // A boolean head is only valid as a group of boolean flags.
        if rest.chars().all(|c| lookup.is_boolean_short(c)) {
            Token::ShortFlagGroup(body.chars().collect())
        } else {
            Token::Unknown(head.to_string())
        }
    }

    // The value token is consumed literally, even when it looks like an option.
    fn take_value(&mut self, kind: Kind, inline: Option<&str>) -> Option<String> {
        if kind == Kind::Greedy {
            let mut parts: Vec<&str> = inline.into_iter().collect();
            parts.extend(self.raw[self.position..].iter());
            self.position = self.raw.len();

            return if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            };
        }

        match inline {
            Some(value) => Some(value.to_string()),
            None => {
                let value = self.raw.get(self.position)?;
                self.position += 1;
                Some(value.to_string())
            }
        }
    }
}

impl<'t> Iterator for Tokenizer<'t> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = *self.raw.get(self.position)?;
        self.position += 1;

        if self.terminated {
            return Some(Token::Positional(raw.to_string()));
        }

        if raw == END_OF_OPTIONS {
            self.terminated = true;
            return self.next();
        }

        if let Some(body) = raw.strip_prefix("--") {
            return Some(self.long(raw, body));
        }

        match raw.strip_prefix('-') {
            Some(body) if !body.is_empty() => Some(self.short(raw, body)),
            _ => Some(Token::Positional(raw.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn tokenize(raw: &[&str], lookup: &dyn OptionLookup) -> Vec<Token> {
    Tokenizer::new(raw, lookup).collect()
}

// An empty name (ex: `--=x`) is reported by its whole token.
fn unknown_name(raw: &str, name: &str) -> String {
    if name.is_empty() {
        raw.to_string()
    } else {
        name.to_string()
    }
}

fn split_inline(token: &str) -> (&str, Option<&str>) {
    match token.split_once(INLINE_DELIMITER) {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}
