//! The resolved (finalized) declarations.
//! These are immutable once built by [`CommandTable::finalize`](./struct.CommandTable.html#method.finalize).
use std::sync::Arc;

use crate::model::{Arity, Kind, Params, Value};

mod short;

pub use short::allocate_short_names;

/// Callback invoked once per accepted option value, with the params being accumulated by the parse.
pub type RunHook = Arc<dyn Fn(&Value, &mut Params) + Send + Sync>;

/// The set of values an option is constrained to.
#[derive(Debug, Clone, PartialEq)]
pub enum Inclusion {
    /// Any of these values, in declaration order.
    Values(Vec<Value>),
    /// A number within `start..=end`.
    Range {
        /// Inclusive lower bound.
        start: f64,
        /// Inclusive upper bound.
        end: f64,
    },
}

impl Inclusion {
    /// Whether `value` satisfies this constraint.
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Inclusion::Values(values) => values.contains(value),
            Inclusion::Range { start, end } => match value.as_f64() {
                Some(n) => *start <= n && n <= *end,
                None => false,
            },
        }
    }

    pub(crate) fn kind(&self) -> Option<Kind> {
        match self {
            Inclusion::Values(values) => values.first().map(Value::kind),
            Inclusion::Range { .. } => Some(Kind::Numeric),
        }
    }
}

impl std::fmt::Display for Inclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inclusion::Values(values) => write!(
                f,
                "{{{}}}",
                values
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            Inclusion::Range { start, end } => write!(f, "{{{start}..{end}}}"),
        }
    }
}

/// A finalized option.
#[derive(Clone)]
pub struct OptionSpec {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: Kind,
    pub(crate) short: Option<char>,
    pub(crate) default: Option<Value>,
    pub(crate) required: bool,
    pub(crate) allowed: Option<Inclusion>,
    pub(crate) use_no: bool,
    pub(crate) hook: Option<RunHook>,
}

impl OptionSpec {
    #[cfg(test)]
    pub(crate) fn basic(name: &str, short: char, kind: Kind) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            kind,
            short: Some(short),
            default: None,
            required: false,
            allowed: None,
            use_no: false,
            hook: None,
        }
    }

    /// The long name, matched by `--NAME`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The resolved kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The short name, matched by `-C`.
    /// Only `None` on an un-finalized declaration.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The value used when the option isn't specified.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the option must be specified.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The values this option is constrained to.
    pub fn allowed(&self) -> Option<&Inclusion> {
        self.allowed.as_ref()
    }

    /// Whether `--no-NAME` sets this boolean option to `false`.
    pub fn use_no(&self) -> bool {
        self.use_no
    }

    pub(crate) fn is_boolean(&self) -> bool {
        self.kind == Kind::Boolean
    }

    pub(crate) fn run_hook(&self, value: &Value, params: &mut Params) {
        if let Some(hook) = &self.hook {
            hook(value, params);
        }
    }
}

impl std::fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = match &self.short {
            Some(s) => format!("-{s}/"),
            None => "".to_string(),
        };
        let required = if self.required { ", required" } else { "" };
        let default = match &self.default {
            Some(d) => format!(", default={d}"),
            None => "".to_string(),
        };

        write!(
            f,
            "Opt[{short}--{name}, {kind}{required}{default}]",
            name = self.name,
            kind = self.kind,
        )
    }
}

/// A finalized positional argument.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: Kind,
    pub(crate) arity: Arity,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
}

impl ArgumentSpec {
    /// The argument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The resolved kind (of each value, for a splat).
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// How many tokens this argument takes.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether at least one token must be provided.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The value used when no token is provided.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether this argument collects the remaining tokens as a sequence.
    pub fn is_splat(&self) -> bool {
        self.arity == Arity::Splat
    }

    /// Whether this argument collects the remaining tokens as one joined string.
    pub fn is_greedy(&self) -> bool {
        self.arity == Arity::Greedy
    }
}

/// A finalized command: its arguments, its own options, and the shared global options.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) arguments: Vec<ArgumentSpec>,
    pub(crate) options: Vec<OptionSpec>,
    pub(crate) globals: Arc<[OptionSpec]>,
}

impl CommandSpec {
    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The positional arguments, in order.
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// The command's own options, in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// The global options shared by every command.
    pub fn globals(&self) -> &[OptionSpec] {
        &self.globals
    }

    /// Find an option by name: command-local first, then global.
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .chain(self.globals.iter())
            .find(|o| o.name == name)
    }

    /// Every option in scope for this command, globals first.
    /// A global shadowed by a command-local option of the same name is left out.
    pub fn merged_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.globals
            .iter()
            .filter(|g| !self.options.iter().any(|o| o.name == g.name))
            .chain(self.options.iter())
    }
}
