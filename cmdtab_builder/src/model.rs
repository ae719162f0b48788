use std::collections::BTreeMap;

/// The resolved options of a parse, keyed by option name.
pub type Params = BTreeMap<String, Value>;

/// The closed set of value kinds an argument or option may take.
///
/// Every declaration resolves to exactly one `Kind` when the [`CommandTable`](./struct.CommandTable.html) is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Passed through as-is.
    String,
    /// An integer or float.
    Numeric,
    /// `true`/`false`, `yes`/`no`, `1`/`0`, or the bare presence of a flag.
    Boolean,
    /// Comma separated (or repeated) values.
    Array,
    /// Comma separated `key:value` pairs.
    Hash,
    /// Every remaining token, joined by a single space.
    Greedy,
}

impl Kind {
    /// The upper case name of this kind, as shown in help output.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::String => "STRING",
            Kind::Numeric => "NUMERIC",
            Kind::Boolean => "BOOLEAN",
            Kind::Array => "ARRAY",
            Kind::Hash => "HASH",
            Kind::Greedy => "GREEDY",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A numeric value, keeping integers exact.
///
/// Integers and floats compare by their numeric value: `Integer(1) == Float(1.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// An integer lexical form, ex: `-12`.
    Integer(i64),
    /// A float lexical form, ex: `2.5` or `1e3`.
    Float(f64),
}

impl Number {
    /// The value as a float.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A typed value produced by the parser (or declared as a default).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string (also the value of a greedy parameter).
    String(String),
    /// A number.
    Numeric(Number),
    /// A boolean.
    Boolean(bool),
    /// An ordered list of strings.
    Array(Vec<String>),
    /// A mapping of string keys to string values.
    Hash(BTreeMap<String, String>),
}

impl Value {
    /// The kind this value naturally belongs to.
    /// Strings report [`Kind::String`], never [`Kind::Greedy`].
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Numeric(_) => Kind::Numeric,
            Value::Boolean(_) => Kind::Boolean,
            Value::Array(_) => Kind::Array,
            Value::Hash(_) => Kind::Hash,
        }
    }

    /// Whether this value may be held by a parameter of kind `kind`.
    pub fn fits(&self, kind: Kind) -> bool {
        match (self, kind) {
            (Value::String(_), Kind::Greedy) => true,
            _ => self.kind() == kind,
        }
    }

    /// The string, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The boolean, if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is an integral `Numeric`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Numeric(Number::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// The number as a float, if this is any `Numeric`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// The items, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// The mapping, if this is a `Hash`.
    pub fn as_hash(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Value::Hash(map) => Some(map),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Numeric(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Array(items) => write!(f, "{}", items.join(",")),
            Value::Hash(map) => write!(
                f,
                "{}",
                map.iter()
                    .map(|(k, v)| format!("{k}:{v}"))
                    .collect::<Vec<String>>()
                    .join(",")
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Numeric(Number::Integer(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Numeric(Number::Integer(value as i64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Numeric(Number::Float(value))
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::Array(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Array(value)
    }
}

impl From<BTreeMap<String, String>> for Value {
    fn from(value: BTreeMap<String, String>) -> Self {
        Value::Hash(value)
    }
}

/// How many positional tokens an argument takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Precisely one token.
    Single,
    /// Every remaining token, each as its own value.
    Splat,
    /// Every remaining token, joined into a single string.
    Greedy,
}

impl Arity {
    /// Whether this arity consumes the rest of the positional tokens.
    pub fn is_trailing(&self) -> bool {
        !matches!(self, Arity::Single)
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
