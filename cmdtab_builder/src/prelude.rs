//! Traits which, typically, may be imported without concern: `use cmdtab::prelude::*`.

// Needs to be imported in order to implement a dispatch target.
pub use crate::dispatch::Dispatch;
