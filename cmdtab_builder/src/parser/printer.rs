use terminal_size::{terminal_size, Width};

use crate::model::{Arity, Kind};
use crate::parser::interface::ColumnRenderer;
use crate::schema::{ArgumentSpec, CommandSpec, OptionSpec};

/// Formats commands and options into aligned, plain text help.
///
/// Rendering is pure: the same declarations always produce the same text.
/// Within a section, every label is padded to the widest label of that section.
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::{ArgumentDecl, CommandDecl, CommandTable, HelpRenderer, OptionDecl};
///
/// let cli = CommandTable::new("program")
///     .command(CommandDecl::new("install").argument(ArgumentDecl::new("file")))
///     .global(OptionDecl::new("verbose"))
///     .finalize()
///     .unwrap();
/// let text = HelpRenderer::new(None).render(cli.commands(), cli.globals());
///
/// assert_eq!(
///     text,
///     "Commands\n  install [file]\n\nGlobal options\n  -?/--help     Show this help message.\n  -v/--verbose"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct HelpRenderer {
    terminal_width: Option<usize>,
}

impl HelpRenderer {
    /// Create a renderer that wraps descriptions to `terminal_width` (or never wraps, for `None`).
    pub fn new(terminal_width: Option<usize>) -> Self {
        Self { terminal_width }
    }

    /// Create a renderer that wraps descriptions to the current terminal, when there is one.
    pub fn terminal() -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(terminal_width)
    }

    /// Render the `Commands` and `Global options` sections.
    pub fn render(&self, commands: &[CommandSpec], globals: &[OptionSpec]) -> String {
        let command_rows = commands
            .iter()
            .map(|c| (command_label(c), c.description().unwrap_or_default().to_string()))
            .collect();
        let option_rows = globals.iter().map(option_row).collect();

        let mut out = self.section("Commands", command_rows);
        out.push("".to_string());
        out.extend(self.section("Global options", option_rows));
        out.join("\n")
    }

    /// Render the help for a single command: usage, description, arguments, and options.
    pub fn render_command(&self, program: &str, command: &CommandSpec) -> String {
        let mut out = vec![format!("Usage: {program} {}", command_label(command))];

        if let Some(description) = command.description() {
            out.push("".to_string());
            out.push(description.to_string());
        }

        if !command.arguments().is_empty() {
            let rows = command
                .arguments()
                .iter()
                .map(|a| (argument_label(a), a.description().unwrap_or_default().to_string()))
                .collect();
            out.push("".to_string());
            out.extend(self.section("Arguments", rows));
        }

        if !command.options().is_empty() {
            let rows = command.options().iter().map(option_row).collect();
            out.push("".to_string());
            out.extend(self.section("Options", rows));
        }

        let globals: Vec<&OptionSpec> = command
            .merged_options()
            .filter(|o| !command.options().iter().any(|l| l.name() == o.name()))
            .collect();

        if !globals.is_empty() {
            let rows = globals.into_iter().map(option_row).collect();
            out.push("".to_string());
            out.extend(self.section("Global options", rows));
        }

        out.join("\n")
    }

    fn section(&self, title: &str, rows: Vec<(String, String)>) -> Vec<String> {
        let left_column_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();
        let column_renderer = ColumnRenderer::guided(left_column_width, self.terminal_width);
        let mut out = vec![title.to_string()];

        for (label, description) in &rows {
            out.extend(column_renderer.render(label, description));
        }

        out
    }
}

pub(crate) fn command_label(command: &CommandSpec) -> String {
    let mut parts = vec![command.name().to_string()];
    parts.extend(command.arguments().iter().map(argument_label));
    parts.join(" ")
}

pub(crate) fn argument_label(argument: &ArgumentSpec) -> String {
    let name = argument.name();

    match (argument.arity(), argument.default()) {
        (Arity::Splat, _) | (Arity::Greedy, _) => format!("<{name}1 {name}2 ...>"),
        (Arity::Single, Some(default)) => format!("<{name}={default}>"),
        (Arity::Single, None) => format!("[{name}]"),
    }
}

pub(crate) fn option_label(option: &OptionSpec) -> String {
    let name = option.name();
    let flags = match option.short() {
        Some(short) => format!("-{short}/--{name}"),
        None => format!("--{name}"),
    };

    match option.kind() {
        Kind::Boolean => flags,
        kind => format!("{flags}={kind}"),
    }
}

fn option_row(option: &OptionSpec) -> (String, String) {
    let description = match (option.description(), option.allowed()) {
        (Some(description), Some(allowed)) => format!("{description} {allowed}"),
        (Some(description), None) => description.to_string(),
        (None, Some(allowed)) => allowed.to_string(),
        (None, None) => "".to_string(),
    };

    (option_label(option), description)
}
