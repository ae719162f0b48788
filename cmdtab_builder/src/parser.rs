mod base;
mod interface;
mod middleware;
mod printer;

pub use base::{ConfigError, ErrorList, ParseError, ParseResult};
pub(crate) use base::Parser;
#[cfg(test)]
pub(crate) use interface::util;
pub use middleware::Cli;
pub use printer::HelpRenderer;
