use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{ErrorKind, EXPR};
use crate::symbolic::Group;

/// A division by zero was attempted.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this expression evaluated to zero"],
    help = "exact arithmetic cannot represent an infinite result",
)]
pub struct DivisionByZero;

/// A node was converted into a group that cannot represent it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot convert a node of group {} into group {}", self.from, self.to),
    labels = ["while evaluating this"],
    help = self.reason,
)]
pub struct InvalidConversion {
    /// The group of the node before the conversion.
    pub from: Group,

    /// The group that was requested.
    pub to: Group,

    /// Why the conversion is not possible.
    pub reason: &'static str,
}

/// An identifier is not a valid variable name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid variable name", self.name),
    labels = ["this name"],
    help = format!(
        "names must start with a letter or underscore, followed by letters, digits or underscores, like {}",
        "x_1".fg(EXPR),
    ),
)]
pub struct InvalidName {
    /// The offending name.
    pub name: String,
}

/// A function was called with too few or too many arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments for the `{}` function", self.name),
    labels = ["this function call"],
    help = format!(
        "the `{}` function takes {}; there are {} argument(s) provided here",
        (&self.name).fg(EXPR),
        match (self.min, self.max) {
            (min, Some(max)) if min == max => format!("{} argument(s)", min),
            (min, Some(max)) => format!("between {} and {} arguments", min, max),
            (min, None) => format!("at least {} argument(s)", min),
        },
        self.given,
    ),
)]
pub struct ArityMismatch {
    /// The name of the function that was called.
    pub name: String,

    /// The minimum number of arguments.
    pub min: usize,

    /// The maximum number of arguments, if bounded.
    pub max: Option<usize>,

    /// The number of arguments that were given.
    pub given: usize,
}

/// A function with the given name does not exist.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a supported function", self.name),
    labels = ["this function"],
    help = if self.suggestions.is_empty() {
        "see `:funcs` for a list of available functions".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` function?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these functions? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UnsupportedFunction {
    /// The name of the function.
    pub name: String,

    /// A list of similarly named functions, if any.
    pub suggestions: Vec<String>,
}

/// The shapes of two vector or matrix operands are incompatible.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "dimension mismatch",
    labels = ["in this operation"],
    help = format!("cannot combine a {} with a {}", self.left, self.right),
)]
pub struct DimensionMismatch {
    /// Description of the left operand's shape.
    pub left: String,

    /// Description of the right operand's shape.
    pub right: String,
}

/// The given operation cannot be applied to operands of these kinds.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot apply `{}` to these operands", self.op),
    labels = [format!("the operands have kinds `{}` and `{}`", self.left, self.right)],
)]
pub struct InvalidOperands {
    /// The operation that was attempted.
    pub op: &'static str,

    /// The kind of the left operand.
    pub left: &'static str,

    /// The kind of the right operand.
    pub right: &'static str,
}

/// An index into a vector or matrix is out of range.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("index `{}` is out of bounds", self.index),
    labels = ["this index"],
    help = format!("indices start at 1; this value has {} element(s)", self.len),
)]
pub struct IndexOutOfBounds {
    /// The index that was given.
    pub index: String,

    /// The number of elements in the indexed value.
    pub len: usize,
}

/// An integer exponent does not fit into 32 bits.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "exponent is too large",
    labels = ["this power"],
    help = "integer exponents must have a magnitude of at most `2^32 - 1`",
)]
pub struct ExponentTooLarge;

/// A name that belongs to a built-in function or constant was used as a variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is a reserved name", self.name),
    labels = ["this name"],
    help = "built-in functions and constants cannot be reassigned",
)]
pub struct ReservedName {
    /// The reserved name.
    pub name: String,
}

/// A matrix without an inverse was inverted.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the matrix is singular",
    labels = ["this matrix has no inverse"],
)]
pub struct SingularMatrix;
