pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = '?';
pub(crate) const HELP_MESSAGE: &str = "Show this help message.";
pub(crate) const NEGATION_PREFIX: &str = "no-";
pub(crate) const END_OF_OPTIONS: &str = "--";
pub(crate) const ARRAY_DELIMITER: char = ',';
pub(crate) const HASH_DELIMITER: char = ':';
pub(crate) const INLINE_DELIMITER: char = '=';
// Tried, in order, once every character of an option's name is taken.
pub(crate) const SHORT_FALLBACK: &str = "0123456789!@#$%^&*+~";
