use std::collections::BTreeSet;

use crate::constant::SHORT_FALLBACK;
use crate::parser::ConfigError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Assign a short name to every option, in declaration order.
///
/// Each option is given as `(name, explicit_short)`.
/// Explicit short names are claimed first; a repeat (or a clash with `reserved`) is an error.
/// Every remaining option takes the first unclaimed character of its name, left to right.
/// If the whole name is taken, it falls back to digits and then symbols.
///
/// The result lines up with the input order.
/// This is a pure function: the same input always produces the same assignment.
///
/// ### Example
/// ```
/// # use cmdtab_builder as cmdtab;
/// use cmdtab::allocate_short_names;
/// use std::collections::BTreeSet;
///
/// let shorts = allocate_short_names(
///     [("verbose", None), ("version", None), ("force", Some('x'))],
///     &BTreeSet::from(['?']),
/// )
/// .unwrap();
/// assert_eq!(shorts, vec!['v', 'e', 'x']);
/// ```
pub fn allocate_short_names<'a>(
    options: impl IntoIterator<Item = (&'a str, Option<char>)>,
    reserved: &BTreeSet<char>,
) -> Result<Vec<char>, ConfigError> {
    let options: Vec<(&str, Option<char>)> = options.into_iter().collect();
    let mut claimed = reserved.clone();

    for (_, explicit) in &options {
        if let Some(short) = explicit {
            if !claimed.insert(*short) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the short option '{short}'."
                )));
            }
        }
    }

    let mut assignment = Vec::with_capacity(options.len());

    for (name, explicit) in &options {
        let short = match explicit {
            Some(short) => *short,
            None => {
                let short = name
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .chain(SHORT_FALLBACK.chars())
                    .find(|c| !claimed.contains(c))
                    .ok_or_else(|| {
                        ConfigError(format!("No short option remains for '{name}'."))
                    })?;
                claimed.insert(short);

                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Allocated short option '{short}' to '{name}'.");
                }

                short
            }
        };

        assignment.push(short);
    }

    Ok(assignment)
}
