use thiserror::Error;

use crate::model::{Params, Value};
use crate::parser::ParseResult;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The positional shape of a command method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// The number of values the method must receive.
    pub required: usize,
    /// The number of additional values the method may receive.
    pub optional: usize,
    /// Whether the method receives any number of values beyond `required + optional`.
    pub rest: bool,
}

impl Signature {
    /// A method taking exactly `required` values.
    pub fn new(required: usize) -> Self {
        Self {
            required,
            optional: 0,
            rest: false,
        }
    }

    /// Accept up to `optional` values after the required ones.
    pub fn optional(mut self, optional: usize) -> Self {
        self.optional = optional;
        self
    }

    /// Accept any number of values after the required and optional ones.
    pub fn rest(mut self) -> Self {
        self.rest = true;
        self
    }

    /// Whether `count` values fit this signature.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.required && (self.rest || count <= self.required + self.optional)
    }
}

/// A target whose methods are invoked by command name.
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::prelude::*;
/// use cmdtab::{dispatch, ArgumentDecl, CommandDecl, CommandTable, Params, Signature, Value};
///
/// #[derive(Default)]
/// struct Installer {
///     params: Params,
///     installed: Vec<String>,
/// }
///
/// impl Dispatch for Installer {
///     type Output = ();
///
///     fn set_params(&mut self, params: Params) {
///         self.params = params;
///     }
///
///     fn signature(&self, command: &str) -> Option<Signature> {
///         match command {
///             "install" => Some(Signature::new(0).rest()),
///             _ => None,
///         }
///     }
///
///     fn call(&mut self, _command: &str, args: Vec<Value>) {
///         self.installed.extend(args.iter().map(Value::to_string));
///     }
/// }
///
/// let cli = CommandTable::new("program")
///     .command(CommandDecl::new("install").argument(ArgumentDecl::new("files").splat()))
///     .finalize()
///     .unwrap();
/// let mut installer = Installer::default();
///
/// dispatch(cli.parse(&["install", "a", "b"]).unwrap(), &mut installer).unwrap();
/// assert_eq!(installer.installed, vec!["a", "b"]);
/// ```
pub trait Dispatch {
    /// The result of a command method.
    type Output;

    /// Receive the option values of the parse, ahead of the method call.
    fn set_params(&mut self, params: Params);

    /// The signature of the method for `command`, or `None` when there is no such method.
    fn signature(&self, command: &str) -> Option<Signature>;

    /// Invoke the method for `command`.
    fn call(&mut self, command: &str, args: Vec<Value>) -> Self::Output;
}

/// A failure to bind a successful parse to the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The target has no method for the command.
    #[error("No method for command '{0}'.")]
    MissingMethod(String),

    /// The method can't take the number of argument values.
    #[error("Command '{command}' cannot take {count} argument(s).")]
    Arity {
        /// The command name.
        command: String,
        /// The number of argument values.
        count: usize,
    },
}

/// Set the target's params, then invoke its method named by the command with the argument values.
///
/// The params are set even when the invocation then fails.
pub fn dispatch<T: Dispatch>(
    result: ParseResult,
    target: &mut T,
) -> Result<T::Output, DispatchError> {
    let ParseResult {
        command,
        args,
        params,
    } = result;
    target.set_params(params);

    let signature = target
        .signature(&command)
        .ok_or_else(|| DispatchError::MissingMethod(command.clone()))?;

    if !signature.accepts(args.len()) {
        return Err(DispatchError::Arity {
            command,
            count: args.len(),
        });
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Dispatching '{command}' with {} value(s).", args.len());
    }

    Ok(target.call(&command, args))
}
