use std::collections::BTreeSet;
use std::sync::Arc;

use crate::api::{ArgumentDecl, OptionDecl};
use crate::constant::*;
use crate::model::{Kind, Value};
use crate::parser::{Cli, ConfigError};
use crate::schema::{allocate_short_names, CommandSpec, OptionSpec};

/// The declaration of a command: its positional arguments and its own options.
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::{ArgumentDecl, CommandDecl, OptionDecl};
///
/// let command = CommandDecl::new("install")
///     .description("Install the files.")
///     .argument(ArgumentDecl::new("files").splat().required())
///     .option(OptionDecl::new("force"));
/// ```
#[derive(Debug, Clone)]
pub struct CommandDecl {
    name: String,
    description: Option<String>,
    arguments: Vec<ArgumentDecl>,
    options: Vec<OptionDecl>,
}

impl CommandDecl {
    /// Declare a command, matched by the first positional token.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::default(),
            options: Vec::default(),
        }
    }

    /// Document the command for the help message.
    /// If repeated, only the final description will apply.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Add a positional argument.
    /// The order of arguments corresponds to their positional order during parsing.
    pub fn argument(mut self, argument: ArgumentDecl) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Add an option local to this command.
    /// A local option is only recognized after the command token.
    pub fn option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Finalize this command alone, for use in testing.
    ///
    /// ### Example
    /// ```
    /// # use cmdtab_builder as cmdtab;
    /// use cmdtab::{ArgumentDecl, CommandDecl, Value};
    ///
    /// // Function under test.
    /// // We want to make sure the command is declared correctly.
    /// pub fn install() -> CommandDecl {
    ///     CommandDecl::new("install").argument(ArgumentDecl::new("count").default(1))
    /// }
    ///
    /// let cli = install().into_test_cli().unwrap();
    /// let result = cli.parse(&["install"]).unwrap();
    /// assert_eq!(result.args, vec![Value::from(1)]);
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn into_test_cli(self) -> Result<Cli, ConfigError> {
        CommandTable::new("test-dummy").command(self).finalize()
    }

    fn resolve(
        self,
        globals: Arc<[OptionSpec]>,
        reserved: &BTreeSet<char>,
        help_enabled: bool,
    ) -> Result<CommandSpec, ConfigError> {
        let CommandDecl {
            name,
            description,
            arguments,
            options,
        } = self;

        if name.is_empty() || name.starts_with('-') {
            return Err(ConfigError(format!("Invalid command name '{name}'.")));
        }

        let arguments = arguments
            .into_iter()
            .map(ArgumentDecl::resolve)
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let mut argument_names = BTreeSet::default();
        let mut optional: Option<&str> = None;

        for (i, argument) in arguments.iter().enumerate() {
            if !argument_names.insert(argument.name()) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the argument '{a}' in command '{name}'.",
                    a = argument.name()
                )));
            }

            if argument.arity().is_trailing() && i + 1 != arguments.len() {
                return Err(ConfigError(format!(
                    "The {arity} argument '{a}' must be the last argument in command '{name}'.",
                    arity = argument.arity(),
                    a = argument.name()
                )));
            }

            match (optional, argument.required()) {
                (Some(prior), true) => {
                    return Err(ConfigError(format!(
                        "The required argument '{a}' cannot follow the optional argument '{prior}' in command '{name}'.",
                        a = argument.name()
                    )));
                }
                (None, false) => optional = Some(argument.name()),
                _ => {}
            }
        }

        let mut options = resolve_options(options, help_enabled)?;
        let shorts =
            allocate_short_names(options.iter().map(|o| (o.name(), o.short())), reserved)?;

        for (option, short) in options.iter_mut().zip(shorts) {
            option.short.replace(short);
        }

        Ok(CommandSpec {
            name,
            description,
            arguments,
            options,
            globals,
        })
    }
}

/// The command line table: every command, plus the global options shared by all of them.
///
/// A synthetic `help` option (`-?`/`--help`) is included amongst the globals, unless disabled.
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::{ArgumentDecl, CommandDecl, CommandTable, OptionDecl, Value};
///
/// let cli = CommandTable::new("program")
///     .global(OptionDecl::new("verbose").default(false))
///     .command(CommandDecl::new("install").argument(ArgumentDecl::new("file")))
///     .command(CommandDecl::new("remove").argument(ArgumentDecl::new("file")))
///     .finalize()
///     .unwrap();
///
/// let result = cli.parse(&["remove", "a.txt"]).unwrap();
/// assert_eq!(result.command, "remove");
/// assert_eq!(result.params.get("help"), Some(&Value::from(false)));
/// assert_eq!(result.params.get("verbose"), Some(&Value::from(false)));
/// ```
#[derive(Debug, Clone)]
pub struct CommandTable {
    program: String,
    globals: Vec<OptionDecl>,
    commands: Vec<CommandDecl>,
    help_enabled: bool,
}

impl CommandTable {
    /// Create a command table for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            globals: Vec::default(),
            commands: Vec::default(),
            help_enabled: true,
        }
    }

    /// Add a global option, recognized before or after the command token.
    pub fn global(mut self, option: OptionDecl) -> Self {
        self.globals.push(option);
        self
    }

    /// Add a command.
    pub fn command(mut self, command: CommandDecl) -> Self {
        self.commands.push(command);
        self
    }

    /// Leave out the synthetic `help` option.
    pub fn disable_help(mut self) -> Self {
        self.help_enabled = false;
        self
    }

    /// Finalize the table as a Result.
    ///
    /// This resolves the kinds, allocates the short names, and checks every declaration
    /// (ex: a repeated option name, or a default outside the allowed values).
    pub fn finalize(self) -> Result<Cli, ConfigError> {
        let CommandTable {
            program,
            globals,
            commands,
            help_enabled,
        } = self;

        let mut globals = resolve_options(globals, help_enabled)?;

        if help_enabled {
            globals.insert(0, help_option());
        }

        let shorts = allocate_short_names(
            globals.iter().map(|o| (o.name(), o.short())),
            &BTreeSet::default(),
        )?;

        for (option, short) in globals.iter_mut().zip(shorts) {
            option.short.replace(short);
        }

        let reserved: BTreeSet<char> = globals.iter().filter_map(OptionSpec::short).collect();
        let globals: Arc<[OptionSpec]> = Arc::from(globals);
        let mut command_names = BTreeSet::default();
        let mut resolved = Vec::with_capacity(commands.len());

        for command in commands {
            if !command_names.insert(command.name.clone()) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the command '{c}'.",
                    c = command.name
                )));
            }

            resolved.push(command.resolve(globals.clone(), &reserved, help_enabled)?);
        }

        Ok(Cli::new(program, resolved, globals, help_enabled))
    }

    /// Finalize the table.
    ///
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Cli {
        match self.finalize() {
            Ok(cli) => cli,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

fn resolve_options(
    options: Vec<OptionDecl>,
    help_enabled: bool,
) -> Result<Vec<OptionSpec>, ConfigError> {
    let mut names = BTreeSet::default();

    for option in &options {
        if help_enabled && option.name() == HELP_NAME {
            return Err(ConfigError(format!(
                "Cannot declare the option '{HELP_NAME}' while help is enabled."
            )));
        }

        if option.name().is_empty() || option.name().starts_with('-') {
            return Err(ConfigError(format!(
                "Invalid option name '{o}'.",
                o = option.name()
            )));
        }

        if !names.insert(option.name()) {
            return Err(ConfigError(format!(
                "Cannot duplicate the option '{o}'.",
                o = option.name()
            )));
        }
    }

    options.into_iter().map(OptionDecl::resolve).collect()
}

fn help_option() -> OptionSpec {
    OptionSpec {
        name: HELP_NAME.to_string(),
        description: Some(HELP_MESSAGE.to_string()),
        kind: Kind::Boolean,
        short: Some(HELP_SHORT),
        default: Some(Value::Boolean(false)),
        required: false,
        allowed: None,
        use_no: false,
        hook: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn shorts(options: &[OptionSpec]) -> Vec<(&str, char)> {
        options
            .iter()
            .map(|o| (o.name(), o.short().unwrap()))
            .collect()
    }

    #[test]
    fn finalize_empty() {
        // Execute
        let cli = CommandTable::new("program").finalize().unwrap();

        // Verify
        assert_eq!(cli.program(), "program");
        assert!(cli.commands().is_empty());
        assert_eq!(shorts(cli.globals()), vec![(HELP_NAME, HELP_SHORT)]);
        assert_eq!(cli.globals()[0].default(), Some(&Value::from(false)));
    }

    #[test]
    fn finalize_help_disabled() {
        // Execute
        let cli = CommandTable::new("program")
            .global(OptionDecl::new(HELP_NAME))
            .disable_help()
            .finalize()
            .unwrap();

        // Verify
        assert_eq!(shorts(cli.globals()), vec![(HELP_NAME, 'h')]);
    }

    #[test]
    fn finalize_short_names() {
        // Setup
        let table = CommandTable::new("program")
            .global(OptionDecl::new("verbose"))
            .global(OptionDecl::new("version"))
            .global(OptionDecl::new("force").short('x'))
            .command(
                CommandDecl::new("install")
                    .option(OptionDecl::new("force"))
                    .option(OptionDecl::new("verify")),
            )
            .command(CommandDecl::new("remove").option(OptionDecl::new("recursive")));

        // Execute
        let cli = table.finalize().unwrap();

        // Verify
        assert_eq!(
            shorts(cli.globals()),
            vec![("help", '?'), ("verbose", 'v'), ("version", 'e'), ("force", 'x')]
        );
        assert_eq!(
            shorts(cli.commands()[0].options()),
            vec![("force", 'f'), ("verify", 'r')]
        );
        assert_eq!(shorts(cli.commands()[1].options()), vec![("recursive", 'r')]);
    }

    #[test]
    fn finalize_deterministic() {
        // Setup
        let table = || {
            CommandTable::new("program")
                .global(OptionDecl::new("aa"))
                .global(OptionDecl::new("ab"))
                .global(OptionDecl::new("ba"))
                .command(CommandDecl::new("run").option(OptionDecl::new("abba")))
        };

        // Execute
        let first = table().finalize().unwrap();
        let second = table().finalize().unwrap();

        // Verify
        assert_eq!(shorts(first.globals()), shorts(second.globals()));
        assert_eq!(
            shorts(first.commands()[0].options()),
            shorts(second.commands()[0].options())
        );
        assert_eq!(
            shorts(first.globals()),
            vec![("help", '?'), ("aa", 'a'), ("ab", 'b'), ("ba", '0')]
        );
        assert_eq!(shorts(first.commands()[0].options()), vec![("abba", '1')]);
    }

    #[rstest]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("a")).command(CommandDecl::new("a")),
        "Cannot duplicate the command 'a'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("")),
        "Invalid command name ''."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("-a")),
        "Invalid command name '-a'."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("a")).global(OptionDecl::new("a")),
        "Cannot duplicate the option 'a'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").option(OptionDecl::new("a")).option(OptionDecl::new("a"))),
        "Cannot duplicate the option 'a'."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("--a")),
        "Invalid option name '--a'."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("help")),
        "Cannot declare the option 'help' while help is enabled."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").option(OptionDecl::new("help"))),
        "Cannot declare the option 'help' while help is enabled."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("a").short('?')),
        "Cannot duplicate the short option '?'."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("a").short('x')).global(OptionDecl::new("b").short('x')),
        "Cannot duplicate the short option 'x'."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("a").short('x')).command(CommandDecl::new("c").option(OptionDecl::new("b").short('x'))),
        "Cannot duplicate the short option 'x'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").argument(ArgumentDecl::new("a")).argument(ArgumentDecl::new("a"))),
        "Cannot duplicate the argument 'a' in command 'c'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").argument(ArgumentDecl::new("a").splat()).argument(ArgumentDecl::new("b"))),
        "The Splat argument 'a' must be the last argument in command 'c'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").argument(ArgumentDecl::new("a").splat()).argument(ArgumentDecl::new("b").greedy())),
        "The Splat argument 'a' must be the last argument in command 'c'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").argument(ArgumentDecl::new("a").default("x")).argument(ArgumentDecl::new("b"))),
        "The required argument 'b' cannot follow the optional argument 'a' in command 'c'."
    )]
    #[case(
        CommandTable::new("p").command(CommandDecl::new("c").argument(ArgumentDecl::new("a").splat().default("x"))),
        "The Splat argument 'a' cannot have a default."
    )]
    #[case(
        CommandTable::new("p").global(OptionDecl::new("a").required().default(1)),
        "Option 'a' cannot be both required and defaulted."
    )]
    fn finalize_invalid(#[case] table: CommandTable, #[case] message: &str) {
        // Execute
        let error = table.finalize().unwrap_err();

        // Verify
        assert_eq!(error.to_string(), format!("Config error: {message}"));
    }

    #[test]
    fn finalize_short_names_exhausted() {
        // Setup
        // The first takes 'a', and the next ones take the fallbacks until none remain.
        let table = (1..=SHORT_FALLBACK.chars().count() + 2).fold(
            CommandTable::new("program").disable_help(),
            |table, i| table.global(OptionDecl::new("a".repeat(i))),
        );

        // Execute
        let error = table.finalize().unwrap_err();

        // Verify
        assert_matches!(error, ConfigError(ref m) if m.contains("No short option remains"));
    }

    #[test]
    fn finalize_local_shadows_global() {
        // Setup
        let table = CommandTable::new("program")
            .global(OptionDecl::new("level").default(1))
            .command(CommandDecl::new("run").option(OptionDecl::new("level").default("high")));

        // Execute
        let cli = table.finalize().unwrap();
        let result = cli.parse(&["run"]).unwrap();

        // Verify
        assert_eq!(result.params.get("level"), Some(&Value::from("high")));
        assert_eq!(cli.commands()[0].options()[0].short(), Some('e'));
    }

    #[rstest]
    #[case(vec!["run", "--level", "5"], vec!["Level is invalid"])]
    #[case(vec!["run", "-e", "5"], vec!["Level is invalid"])]
    #[case(vec!["run", "-l", "5"], vec!["L is an unknown option", "Too many arguments"])]
    fn finalize_local_shadows_global_short(
        #[case] tokens: Vec<&str>,
        #[case] expected: Vec<&str>,
    ) {
        // Setup
        let cli = CommandTable::new("program")
            .global(OptionDecl::new("level").default(1))
            .command(
                CommandDecl::new("run").option(OptionDecl::new("level").allowed(["high", "low"])),
            )
            .finalize()
            .unwrap();

        // Execute
        let errors = cli.parse(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(errors.error_messages(), expected);
        let result = cli.parse(&["run", "-e", "low"]).unwrap();
        assert_eq!(result.params.get("level"), Some(&Value::from("low")));
    }

    #[test]
    fn build() {
        let cli = CommandTable::new("program")
            .command(CommandDecl::new("status").description("Show the status."))
            .build();
        assert_contains!(cli.help(), "status");
    }

    #[test]
    #[cfg(feature = "unit_test")]
    fn into_test_cli() {
        // Setup
        pub fn setup() -> CommandDecl {
            CommandDecl::new("install").argument(ArgumentDecl::new("file"))
        }

        // Execute
        let cli = setup().into_test_cli().unwrap();

        // Verify
        let result = cli.parse(&["install", "a"]).unwrap();
        assert_eq!(result.args, vec![Value::from("a")]);
    }
}
