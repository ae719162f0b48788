use std::env;
use std::sync::Arc;

use crate::dispatch::{dispatch, Dispatch};
use crate::parser::base::*;
use crate::parser::interface::{ConsoleInterface, UserInterface};
use crate::parser::printer::HelpRenderer;
use crate::schema::{CommandSpec, OptionSpec};

/// The finalized command table.
/// Built via [`CommandTable::finalize`](./struct.CommandTable.html#method.finalize).
///
/// A `Cli` is immutable: it may be shared between threads and used for any number of parses.
#[derive(Debug, Clone)]
pub struct Cli {
    program: String,
    commands: Vec<CommandSpec>,
    globals: Arc<[OptionSpec]>,
    help_enabled: bool,
    renderer: HelpRenderer,
}

impl Cli {
    pub(crate) fn new(
        program: impl Into<String>,
        commands: Vec<CommandSpec>,
        globals: Arc<[OptionSpec]>,
        help_enabled: bool,
    ) -> Self {
        Self {
            program: program.into(),
            commands,
            globals,
            help_enabled,
            renderer: HelpRenderer::terminal(),
        }
    }

    /// Replace the help renderer (for example, to render against a fixed width).
    pub fn renderer(mut self, renderer: HelpRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// The program name, as shown in the usage line.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The commands, in declaration order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// The global options, in declaration order (led by `help`, unless it is disabled).
    pub fn globals(&self) -> &[OptionSpec] {
        &self.globals
    }

    /// Find a command by name.
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// Parse the input tokens (not including the program name).
    ///
    /// Every problem with the tokens is reported, in a stable order, through the `ErrorList`.
    ///
    /// ### Example
    /// ```
    /// # use cmdtab_builder as cmdtab;
    /// use cmdtab::{ArgumentDecl, CommandDecl, CommandTable, OptionDecl, Value};
    ///
    /// let cli = CommandTable::new("program")
    ///     .command(CommandDecl::new("install").argument(ArgumentDecl::new("file")))
    ///     .global(OptionDecl::new("verbose").default(false))
    ///     .finalize()
    ///     .unwrap();
    ///
    /// let result = cli.parse(&["-v", "install", "file.txt"]).unwrap();
    /// assert_eq!(result.command, "install");
    /// assert_eq!(result.args, vec![Value::from("file.txt")]);
    /// assert_eq!(result.params.get("verbose"), Some(&Value::from(true)));
    ///
    /// let errors = cli.parse(&["install"]).unwrap_err();
    /// assert_eq!(errors.error_messages(), vec!["File is required"]);
    /// ```
    pub fn parse(&self, tokens: &[&str]) -> Result<ParseResult, ErrorList> {
        Parser::new(&self.commands, &self.globals).parse(tokens)
    }

    /// Render the help listing for every command and global option.
    pub fn help(&self) -> String {
        self.renderer.render(&self.commands, &self.globals)
    }

    /// Render the help for a single command, or `None` when there is no such command.
    pub fn command_help(&self, name: &str) -> Option<String> {
        self.command(name)
            .map(|command| self.renderer.render_command(&self.program, command))
    }

    /// Parse the input tokens and dispatch the result to `target`.
    ///
    /// * When help is requested, the help is printed and this returns `Err(0)`.
    /// * When the tokens don't parse, each error is printed and this returns `Err(1)`.
    /// * When the dispatch fails, the failure is printed and this returns `Err(1)`.
    pub fn run_tokens<T: Dispatch>(
        &self,
        tokens: &[&str],
        target: &mut T,
    ) -> Result<T::Output, i32> {
        self.run_with_interface(tokens, target, &ConsoleInterface::default())
    }

    /// Parse the Cli [`env::args`] and dispatch the result to `target`.
    ///
    /// Behaves as [`Cli::run_tokens`], except this exits the process with the error code (via `std::process::exit`).
    pub fn run<T: Dispatch>(&self, target: &mut T) -> T::Output {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.run_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
            target,
        ) {
            Ok(output) => output,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }

    pub(crate) fn run_with_interface<T: Dispatch>(
        &self,
        tokens: &[&str],
        target: &mut T,
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<T::Output, i32> {
        match self.parse(tokens) {
            Ok(result) if result.help() => {
                match self.command_help(&result.command) {
                    Some(help) => user_interface.print(help),
                    None => user_interface.print(self.help()),
                }
                Err(0)
            }
            Ok(result) => match dispatch(result, target) {
                Ok(output) => Ok(output),
                Err(error) => {
                    user_interface.print_error(error.to_string());
                    Err(1)
                }
            },
            Err(_)
                if self.help_enabled
                    && Parser::new(&self.commands, &self.globals).help_requested(tokens) =>
            {
                user_interface.print(self.help());
                Err(0)
            }
            Err(error_list) => {
                for message in error_list.error_messages() {
                    user_interface.print_error(message);
                }
                Err(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ArgumentDecl, CommandDecl, CommandTable, OptionDecl};
    use crate::constant::HELP_NAME;
    use crate::dispatch::Signature;
    use crate::model::{Kind, Params, Value};
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;
    use rstest::rstest;

    #[derive(Default)]
    struct Recorder {
        params: Params,
        calls: Vec<(String, Vec<Value>)>,
    }

    impl Dispatch for Recorder {
        type Output = usize;

        fn set_params(&mut self, params: Params) {
            self.params = params;
        }

        fn signature(&self, command: &str) -> Option<Signature> {
            match command {
                "install" => Some(Signature::new(1)),
                "status" => Some(Signature::new(0)),
                _ => None,
            }
        }

        fn call(&mut self, command: &str, args: Vec<Value>) -> usize {
            self.calls.push((command.to_string(), args));
            self.calls.len()
        }
    }

    fn cli() -> Cli {
        CommandTable::new("program")
            .global(OptionDecl::new("verbose").default(false))
            .command(
                CommandDecl::new("install")
                    .description("Install a file")
                    .argument(ArgumentDecl::new("file"))
                    .option(OptionDecl::new("force"))
                    .option(OptionDecl::new("mode").kind(Kind::String)),
            )
            .command(CommandDecl::new("status"))
            .command(CommandDecl::new("remove"))
            .finalize()
            .unwrap()
            .renderer(HelpRenderer::new(None))
    }

    #[test]
    fn run_dispatches() {
        // Setup
        let cli = cli();
        let mut target = Recorder::default();
        let interface = InMemoryInterface::default();

        // Execute
        let output = cli
            .run_with_interface(&["-v", "install", "file.txt"], &mut target, &interface)
            .unwrap();

        // Verify
        assert_eq!(output, 1);
        assert_eq!(
            target.calls,
            vec![("install".to_string(), vec![Value::from("file.txt")])]
        );
        assert_eq!(target.params.get("verbose"), Some(&Value::from(true)));
        assert_eq!(target.params.get(HELP_NAME), Some(&Value::from(false)));

        let (messages, errors) = interface.consume();
        assert!(messages.is_empty());
        assert!(errors.is_empty());
    }

    #[rstest]
    #[case(vec!["install", "--help"])]
    #[case(vec!["-?", "install"])]
    #[case(vec!["install", "file.txt", "-?"])]
    fn run_command_help(#[case] tokens: Vec<&str>) {
        // Setup
        let cli = cli();
        let mut target = Recorder::default();
        let interface = InMemoryInterface::default();

        // Execute
        let error_code = cli
            .run_with_interface(tokens.as_slice(), &mut target, &interface)
            .unwrap_err();

        // Verify
        assert_eq!(error_code, 0);
        assert!(target.calls.is_empty());

        let message = interface.consume_message();
        assert_contains!(message, "Usage: program install [file]");
        assert_contains!(message, "Install a file");
        assert_contains!(message, "-f/--force");
        assert_contains!(message, "-v/--verbose");
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["-?"])]
    #[case(vec!["--help", "bogus"])]
    fn run_global_help(#[case] tokens: Vec<&str>) {
        // Setup
        let cli = cli();
        let mut target = Recorder::default();
        let interface = InMemoryInterface::default();

        // Execute
        let error_code = cli
            .run_with_interface(tokens.as_slice(), &mut target, &interface)
            .unwrap_err();

        // Verify
        assert_eq!(error_code, 0);

        let message = interface.consume_message();
        assert_eq!(message, cli.help());
        assert_contains!(message, "Commands");
        assert_contains!(message, "install [file]");
    }

    #[rstest]
    #[case(vec![], vec!["Unknown command"])]
    #[case(vec!["bogus"], vec!["Bogus is an unknown command"])]
    #[case(vec!["install", "--bogus"], vec!["Bogus is an unknown option", "File is required"])]
    #[case(vec!["--", "--help"], vec!["--help is an unknown command"])]
    #[case(vec!["install", "--mode", "--help"], vec!["File is required"])]
    fn run_parse_errors(#[case] tokens: Vec<&str>, #[case] expected: Vec<&str>) {
        // Setup
        let cli = cli();
        let mut target = Recorder::default();
        let interface = InMemoryInterface::default();

        // Execute
        let error_code = cli
            .run_with_interface(tokens.as_slice(), &mut target, &interface)
            .unwrap_err();

        // Verify
        assert_eq!(error_code, 1);
        assert!(target.calls.is_empty());

        let (messages, errors) = interface.consume();
        assert!(messages.is_empty());
        assert_eq!(errors, expected);
    }

    #[test]
    fn run_dispatch_error() {
        // Setup
        let cli = cli();
        let mut target = Recorder::default();
        let interface = InMemoryInterface::default();

        // Execute
        let error_code = cli
            .run_with_interface(&["remove"], &mut target, &interface)
            .unwrap_err();

        // Verify
        assert_eq!(error_code, 1);

        let (messages, errors) = interface.consume();
        assert!(messages.is_empty());
        assert_eq!(errors, vec!["No method for command 'remove'."]);
    }

    #[test]
    fn help_disabled() {
        // Setup
        let cli = CommandTable::new("program")
            .command(CommandDecl::new("status"))
            .disable_help()
            .finalize()
            .unwrap();
        let mut target = Recorder::default();
        let interface = InMemoryInterface::default();

        // Execute
        let error_code = cli
            .run_with_interface(&["--help"], &mut target, &interface)
            .unwrap_err();

        // Verify
        assert_eq!(error_code, 1);
        assert!(cli.globals().is_empty());

        let (messages, errors) = interface.consume();
        assert!(messages.is_empty());
        assert_eq!(errors, vec!["Unknown command"]);
    }

    #[test]
    fn command_help_unknown() {
        assert_eq!(cli().command_help("bogus"), None);
    }

    #[test]
    fn cli_shared() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        assert_send_sync(&cli());
    }
}
