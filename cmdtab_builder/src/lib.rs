//! Builder module for `cmdtab`.
//! See [documentation root](https://docs.rs/cmdtab/latest/cmdtab/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod coerce;
mod constant;
mod dispatch;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod schema;
mod tokens;

pub use api::*;
pub use dispatch::{dispatch, DispatchError, Signature};
pub use model::*;
pub use parser::{Cli, ConfigError, ErrorList, HelpRenderer, ParseError, ParseResult};
pub use schema::{allocate_short_names, ArgumentSpec, CommandSpec, Inclusion, OptionSpec, RunHook};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
