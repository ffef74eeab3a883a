//! The DSL-agnostic statement model produced by the mappers.
//!
//! A [`Statement`] is one declarative schema operation: an operation name,
//! the identifier it targets, an ordered argument list and an ordered chain
//! of modifiers. The writer is the only place that knows how statements
//! serialize into the target DSL's concrete syntax.

/// A literal argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String literal.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Database-evaluated expression; the writer wraps it in the DSL's
    /// raw-expression escape hatch.
    Expression(String),
    /// Raw fragment emitted verbatim by the writer (no quoting).
    Raw(String),
}

impl Value {
    /// Convenience constructor for string values.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// An array of string values.
    pub fn str_array(items: &[String]) -> Self {
        Value::Array(items.iter().map(|s| Value::Str(s.clone())).collect())
    }

    /// A single column reference: a plain string for one column, an array
    /// for a composite list. Order is preserved.
    pub fn columns(columns: &[String]) -> Self {
        if columns.len() == 1 {
            Value::Str(columns[0].clone())
        } else {
            Value::str_array(columns)
        }
    }
}

/// One chained modifier: a name plus optional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    /// Modifier name (e.g. "nullable", "default", "onDelete").
    pub name: String,
    /// Modifier arguments, possibly empty.
    pub args: Vec<Value>,
}

impl Modifier {
    /// A modifier with no arguments.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A modifier with one argument.
    pub fn with_arg(name: impl Into<String>, arg: Value) -> Self {
        Self {
            name: name.into(),
            args: vec![arg],
        }
    }
}

/// One declarative schema operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Operation name (e.g. "string", "unique", "foreign").
    pub operation: String,

    /// The identifier this statement targets (column, index or constraint
    /// name), kept for logging and ordering; the argument list already
    /// contains everything the writer renders.
    pub target: String,

    /// Ordered operation arguments.
    pub args: Vec<Value>,

    /// Ordered modifier chain.
    pub modifiers: Vec<Modifier>,

    /// Data-integrity warning attached by a mapper (e.g. a foreign key
    /// whose referenced table is missing from the snapshot). Rendered as
    /// a comment; never fatal.
    pub warning: Option<String>,
}

impl Statement {
    /// Create a statement targeting `target`.
    pub fn new(operation: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            target: target.into(),
            args: Vec::new(),
            modifiers: Vec::new(),
            warning: None,
        }
    }

    /// Append an argument.
    pub fn arg(mut self, value: Value) -> Self {
        self.args.push(value);
        self
    }

    /// Append a modifier to the chain.
    pub fn chain(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Attach a data-integrity warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}
