//! `cmdtab` is a declarative command table parser for Rust.
//!
//! A program declares its commands, their positional arguments, and the named options (both global and per-command).
//! `cmdtab` then turns the raw Cli tokens into a validated, typed set of values, or else a complete list of human readable errors.
//! The same declarations drive the help message and the dispatch of the recognized command.
//!
//! `cmdtab` attempts to prioritize the following design concerns:
//! * *Declarative configuration*:
//! The user describes what the Cli accepts; the kinds, short names, defaults, and validation follow from the declarations.
//! * *Complete error reporting*:
//! A bad command line reports every problem at once, in a fixed order, rather than just the first.
//! * *Determinism*:
//! The same declarations always produce the same short names, the same parse, and the same help text.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/installer.rs")]
//! ```
//!
//! ```console
//! $ installer --help
//! Commands
//!   install <packages1 packages2 ...>  Install one or more packages.
//!   remove [package]                   Remove a package.
//!
//! Global options
//!   -?/--help     Show this help message.
//!   -v/--verbose  Print every step.
//!
//! $ installer install
//! Packages is required
//!
//! $ installer -v install --mode bogus abc
//! Mode is invalid
//! ```
//!
//! # Declarations
//! Configure `cmdtab` by starting with a [`CommandTable`], adding [`CommandDecl`]s and global [`OptionDecl`]s.
//! Each command takes positional [`ArgumentDecl`]s and its own options.
//! [`CommandTable::finalize`] checks the declarations and produces the immutable [`Cli`].
//!
//! ### Kinds
//! Every argument and option has one [`Kind`].
//! When not given explicitly, an option's kind is taken from its default, then its allowed values, and otherwise it is a boolean flag.
//! An argument's kind is taken from its default, and otherwise it is a string.
//! * `String`: the token as is.
//! * `Numeric`: an integer or float (ex: `3`, `-2.5`).
//! * `Boolean`: `true/false`, `yes/no`, or `1/0`; a flag given without a value is `true`.
//! * `Array`: comma separated items; repeated occurrences accumulate.
//! * `Hash`: `key:value` pairs, comma separated; repeated occurrences merge.
//! * `Greedy`: every remaining token, joined by spaces.
//!
//! ### Options
//! Options are specified via `--NAME`, `--NAME=VALUE`, `-C VALUE`, `-CVALUE`, or `-C=VALUE`.
//! Boolean short flags may be grouped (ex: `-abc`), and a boolean declared with [`OptionDecl::use_no`] accepts `--no-NAME`.
//! Short names are allocated deterministically from the option names, unless given explicitly.
//! Global options are recognized before or after the command; command options only after it.
//! The token `--` ends option parsing.
//!
//! ### Help
//! A synthetic `-?`/`--help` option is included, unless [`CommandTable::disable_help`] is used.
//! When help is given, the checks for missing and surplus values are waived, so that help may still be shown.
//!
//! # Dispatch
//! [`Cli::run`] parses the Cli arguments and invokes the [`Dispatch`](./prelude/trait.Dispatch.html) target.
//! Otherwise, use [`Cli::parse`] and [`dispatch`] separately.
//!
//! # Features
//! * `unit_test`: exposes [`CommandDecl::into_test_cli`], for testing a command declaration in isolation.
//! * `tracing_debug`: emits `tracing` debug events, for the short name allocation, command resolution, and help layout.
pub use cmdtab_builder::*;
