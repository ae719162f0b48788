use std::collections::BTreeMap;
use std::thread;

use cmdtab::prelude::*;
use cmdtab::{
    dispatch, ArgumentDecl, Cli, CommandDecl, CommandTable, DispatchError, Kind, OptionDecl,
    Params, Signature, Value,
};

fn cli() -> Cli {
    CommandTable::new("program")
        .global(OptionDecl::new("verbose").default(false))
        .command(
            CommandDecl::new("install")
                .description("Install a file.")
                .argument(ArgumentDecl::new("file")),
        )
        .command(CommandDecl::new("kill").option(OptionDecl::new("pid").kind(Kind::Numeric)))
        .command(
            CommandDecl::new("copy")
                .argument(ArgumentDecl::new("target"))
                .argument(ArgumentDecl::new("sources").splat()),
        )
        .finalize()
        .unwrap()
}

#[test]
fn parse_empty() {
    let errors = cli().parse(&[]).unwrap_err();
    assert_eq!(errors.error_messages(), vec!["Unknown command"]);
}

#[test]
fn parse_unknown_command() {
    let errors = cli().parse(&["bogus"]).unwrap_err();
    assert_eq!(errors.error_messages(), vec!["Bogus is an unknown command"]);
}

#[test]
fn parse_missing_argument() {
    let errors = cli().parse(&["install"]).unwrap_err();
    assert_eq!(errors.error_messages(), vec!["File is required"]);
}

#[test]
fn parse_invalid_option() {
    let errors = cli().parse(&["kill", "--pid=something"]).unwrap_err();
    assert_eq!(errors.error_messages(), vec!["Pid is invalid"]);
}

#[test]
fn parse_global_before_command() {
    // Execute
    let result = cli().parse(&["-v", "install", "file"]).unwrap();

    // Verify
    assert_eq!(result.command, "install");
    assert_eq!(result.args, vec![Value::from("file")]);
    assert_eq!(
        result.params,
        BTreeMap::from([
            ("help".to_string(), Value::from(false)),
            ("verbose".to_string(), Value::from(true)),
        ])
    );
}

#[test]
fn parse_splat() {
    // Execute
    let result = cli().parse(&["copy", "dest", "a", "b", "c"]).unwrap();

    // Verify
    assert_eq!(
        result.args,
        vec![
            Value::from("dest"),
            Value::from("a"),
            Value::from("b"),
            Value::from("c")
        ]
    );
    assert!(!result.help());
}

#[test]
fn parse_error_order() {
    // Execute
    let errors = cli()
        .parse(&["copy", "--bogus", "--verbose=maybe"])
        .unwrap_err();

    // Verify
    assert_eq!(
        errors.error_messages(),
        vec!["Bogus is an unknown option", "Target is required", "Verbose is invalid"]
    );
    assert_eq!(errors.to_string(), errors.error_messages().join("\n"));
}

#[test]
fn short_names_deterministic() {
    let short_names = |cli: &Cli| {
        cli.commands()
            .iter()
            .flat_map(|c| c.merged_options())
            .map(|o| (o.name().to_string(), o.short()))
            .collect::<Vec<_>>()
    };

    assert_eq!(short_names(&cli()), short_names(&cli()));
}

#[test]
fn help_repeatable() {
    // Setup
    let cli = cli();

    // Execute
    let first = cli.help();
    let second = cli.help();

    // Verify
    assert_eq!(first, second);
    assert!(first.starts_with("Commands\n"));
    assert!(first.contains("\n\nGlobal options\n"));
    assert!(first.contains("install [file]"));
    assert!(first.contains("copy [target] <sources1 sources2 ...>"));
    assert!(first.contains("-v/--verbose"));
}

#[test]
fn splat_not_last_rejected() {
    // Execute
    let error = CommandTable::new("program")
        .command(
            CommandDecl::new("copy")
                .argument(ArgumentDecl::new("sources").splat())
                .argument(ArgumentDecl::new("target")),
        )
        .finalize()
        .unwrap_err();

    // Verify
    assert!(error.to_string().starts_with("Config error: "));
}

#[test]
fn parse_concurrently() {
    // Setup
    let cli = cli();

    // Execute
    thread::scope(|scope| {
        for i in 0..4 {
            let cli = &cli;
            scope.spawn(move || {
                let file = format!("file{i}");
                let result = cli.parse(&["install", file.as_str()]).unwrap();

                // Verify
                assert_eq!(result.args, vec![Value::from(file.as_str())]);
            });
        }
    });
}

#[derive(Default)]
struct Target {
    params: Params,
    installed: Vec<Value>,
}

impl Dispatch for Target {
    type Output = usize;

    fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    fn signature(&self, command: &str) -> Option<Signature> {
        match command {
            "install" => Some(Signature::new(1)),
            _ => None,
        }
    }

    fn call(&mut self, _command: &str, args: Vec<Value>) -> usize {
        self.installed.extend(args);
        self.installed.len()
    }
}

#[test]
fn dispatch_install() {
    // Setup
    let result = cli().parse(&["install", "file", "--verbose"]).unwrap();
    let mut target = Target::default();

    // Execute
    let output = dispatch(result, &mut target).unwrap();

    // Verify
    assert_eq!(output, 1);
    assert_eq!(target.installed, vec![Value::from("file")]);
    assert_eq!(target.params.get("verbose"), Some(&Value::from(true)));
}

#[test]
fn dispatch_missing_method() {
    // Setup
    let result = cli().parse(&["kill"]).unwrap();
    let mut target = Target::default();

    // Execute
    let error = dispatch(result, &mut target).unwrap_err();

    // Verify
    assert_eq!(error, DispatchError::MissingMethod("kill".to_string()));
}

#[test]
fn run_tokens_help() {
    let mut target = Target::default();
    assert_eq!(cli().run_tokens(&["install", "--help"], &mut target), Err(0));
    assert!(target.installed.is_empty());
}

#[test]
fn run_tokens_dispatch() {
    let mut target = Target::default();
    assert_eq!(cli().run_tokens(&["install", "file"], &mut target), Ok(1));
}
