use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::coerce::check_inclusion;
use crate::model::{Arity, Kind, Params, Value};
use crate::parser::ConfigError;
use crate::schema::{ArgumentSpec, Inclusion, OptionSpec, RunHook};

/// The declaration of a named option, specified via `--NAME` or `-C`.
///
/// When the kind isn't given, it is taken from the default, or else the allowed values.
/// Failing those, the option is a boolean flag.
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::{CommandDecl, CommandTable, Kind, OptionDecl, Value};
///
/// let cli = CommandTable::new("program")
///     .global(OptionDecl::new("level").range(0..=3).default(1))
///     .global(OptionDecl::new("format").allowed(["json", "text"]))
///     .global(OptionDecl::new("tags").kind(Kind::Array))
///     .command(CommandDecl::new("status"))
///     .finalize()
///     .unwrap();
///
/// let result = cli.parse(&["status", "--format", "json", "-t", "a,b"]).unwrap();
/// assert_eq!(result.params.get("level"), Some(&Value::from(1)));
/// assert_eq!(result.params.get("format"), Some(&Value::from("json")));
/// assert_eq!(result.params.get("tags"), Some(&Value::from(vec!["a", "b"])));
/// ```
#[derive(Clone)]
pub struct OptionDecl {
    name: String,
    description: Option<String>,
    kind: Option<Kind>,
    short: Option<char>,
    default: Option<Value>,
    required: bool,
    allowed: Option<Inclusion>,
    use_no: bool,
    hook: Option<RunHook>,
}

impl OptionDecl {
    /// Declare an option, matched by `--NAME`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: None,
            short: None,
            default: None,
            required: false,
            allowed: None,
            use_no: false,
            hook: None,
        }
    }

    /// Document the option for the help message.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Set the kind explicitly.
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind.replace(kind);
        self
    }

    /// Set the short name explicitly, rather than have one allocated.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// The value used when the option isn't specified.
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default.replace(default.into());
        self
    }

    /// Require the option to be specified.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Constrain the option to the given values.
    pub fn allowed<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed
            .replace(Inclusion::Values(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Constrain the option to numbers within the (inclusive) range.
    pub fn range<T: Into<f64> + Copy>(mut self, range: RangeInclusive<T>) -> Self {
        self.allowed.replace(Inclusion::Range {
            start: (*range.start()).into(),
            end: (*range.end()).into(),
        });
        self
    }

    /// Accept `--no-NAME` to set this boolean option to `false`.
    pub fn use_no(mut self) -> Self {
        self.use_no = true;
        self
    }

    /// Invoke `hook` with each accepted value of this option.
    ///
    /// ### Example
    /// ```
    /// # use cmdtab_builder as cmdtab;
    /// use cmdtab::{CommandDecl, CommandTable, OptionDecl, Value};
    ///
    /// let cli = CommandTable::new("program")
    ///     .global(OptionDecl::new("quiet").run(|_, params| {
    ///         params.insert("level".to_string(), Value::from(0));
    ///     }))
    ///     .command(CommandDecl::new("status"))
    ///     .finalize()
    ///     .unwrap();
    ///
    /// let result = cli.parse(&["status", "--quiet"]).unwrap();
    /// assert_eq!(result.params.get("level"), Some(&Value::from(0)));
    /// ```
    pub fn run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &mut Params) + Send + Sync + 'static,
    {
        self.hook.replace(Arc::new(hook));
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn resolve(self) -> Result<OptionSpec, ConfigError> {
        let OptionDecl {
            name,
            description,
            kind,
            short,
            default,
            required,
            allowed,
            use_no,
            hook,
        } = self;

        match &allowed {
            Some(Inclusion::Values(values)) => {
                let first = values.first().ok_or_else(|| {
                    ConfigError(format!("Option '{name}' cannot have empty allowed values."))
                })?;

                if values.iter().any(|v| v.kind() != first.kind()) {
                    return Err(ConfigError(format!(
                        "The allowed values of option '{name}' must all be of one kind."
                    )));
                }
            }
            Some(Inclusion::Range { start, end }) if start > end => {
                return Err(ConfigError(format!(
                    "Option '{name}' cannot have an empty range."
                )));
            }
            _ => {}
        }

        let kind = kind
            .or_else(|| default.as_ref().map(Value::kind))
            .or_else(|| allowed.as_ref().and_then(Inclusion::kind))
            .unwrap_or(Kind::Boolean);

        if let Some(allowed_kind) = allowed.as_ref().and_then(Inclusion::kind) {
            let fits = allowed_kind == kind
                || (allowed_kind == Kind::String && matches!(kind, Kind::Array | Kind::Greedy));

            if !fits {
                return Err(ConfigError(format!(
                    "The allowed values of option '{name}' must be of kind {kind}."
                )));
            }
        }

        if required && default.is_some() {
            return Err(ConfigError(format!(
                "Option '{name}' cannot be both required and defaulted."
            )));
        }

        if use_no && kind != Kind::Boolean {
            return Err(ConfigError(format!(
                "Option '{name}' cannot use the 'no-' negation unless it is {}.",
                Kind::Boolean
            )));
        }

        if let Some(default) = &default {
            if !default.fits(kind) {
                return Err(ConfigError(format!(
                    "The default of option '{name}' must be of kind {kind}."
                )));
            }

            if check_inclusion(default, allowed.as_ref()).is_err() {
                return Err(ConfigError(format!(
                    "The default of option '{name}' is not amongst its allowed values."
                )));
            }
        }

        Ok(OptionSpec {
            name,
            description,
            kind,
            short,
            default,
            required,
            allowed,
            use_no,
            hook,
        })
    }
}

impl std::fmt::Debug for OptionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDecl")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("short", &self.short)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("allowed", &self.allowed)
            .field("use_no", &self.use_no)
            .finish()
    }
}

/// The declaration of a positional argument.
///
/// An argument is required unless it has a default, or it collects the trailing tokens (see [`ArgumentDecl::splat`] and [`ArgumentDecl::greedy`]).
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::{ArgumentDecl, CommandDecl, CommandTable, Value};
///
/// let cli = CommandTable::new("program")
///     .command(
///         CommandDecl::new("copy")
///             .argument(ArgumentDecl::new("count").default(1))
///             .argument(ArgumentDecl::new("files").splat()),
///     )
///     .finalize()
///     .unwrap();
///
/// let result = cli.parse(&["copy", "2", "a", "b"]).unwrap();
/// assert_eq!(
///     result.args,
///     vec![Value::from(2), Value::from("a"), Value::from("b")]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentDecl {
    name: String,
    description: Option<String>,
    kind: Option<Kind>,
    arity: Arity,
    required: bool,
    default: Option<Value>,
}

impl ArgumentDecl {
    /// Declare an argument taking a single token.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: None,
            arity: Arity::Single,
            required: false,
            default: None,
        }
    }

    /// Document the argument for the help message.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Set the kind explicitly (of each value, for a splat).
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind.replace(kind);
        self
    }

    /// The value used when no token is provided.
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default.replace(default.into());
        self
    }

    /// Collect every remaining token, each as its own value.
    pub fn splat(mut self) -> Self {
        self.arity = Arity::Splat;
        self
    }

    /// Collect every remaining token, joined by spaces into one value.
    pub fn greedy(mut self) -> Self {
        self.arity = Arity::Greedy;
        self
    }

    /// Require at least one token, even for a splat or greedy argument.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub(crate) fn resolve(self) -> Result<ArgumentSpec, ConfigError> {
        let ArgumentDecl {
            name,
            description,
            kind,
            arity,
            required,
            default,
        } = self;

        if arity == Arity::Splat && default.is_some() {
            return Err(ConfigError(format!(
                "The {arity} argument '{name}' cannot have a default."
            )));
        }

        if required && default.is_some() {
            return Err(ConfigError(format!(
                "Argument '{name}' cannot be both required and defaulted."
            )));
        }

        let kind = match (arity, kind) {
            (Arity::Greedy, None | Some(Kind::String) | Some(Kind::Greedy)) => Kind::Greedy,
            (Arity::Greedy, Some(kind)) => {
                return Err(ConfigError(format!(
                    "The {arity} argument '{name}' cannot be of kind {kind}."
                )));
            }
            (_, kind) => kind
                .or_else(|| default.as_ref().map(Value::kind))
                .unwrap_or(Kind::String),
        };

        if let Some(default) = &default {
            if !default.fits(kind) {
                return Err(ConfigError(format!(
                    "The default of argument '{name}' must be of kind {kind}."
                )));
            }
        }

        let required = required || (default.is_none() && !arity.is_trailing());

        Ok(ArgumentSpec {
            name,
            description,
            kind,
            arity,
            required,
            default,
        })
    }
}
