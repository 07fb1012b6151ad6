use std::collections::BTreeMap;
use super::Expr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name of the grouping function, which renders as bare parentheses.
pub const PARENS: &str = "parens";

/// The keyed children of a collection node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Terms {
    /// The cached canonical value of the collection. For [`super::Node::PowerSum`], this is the
    /// shared base; for the other collections, it is the text of the children.
    pub(crate) value: String,

    /// The children, keyed by [`Expr::key_for_group`].
    pub(crate) children: BTreeMap<String, Expr>,
}

impl Terms {
    /// Creates an empty collection with the given canonical value.
    pub(crate) fn with_value(value: impl Into<String>) -> Self {
        Terms { value: value.into(), children: BTreeMap::new() }
    }

    /// The number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over the children, in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Expr> {
        self.children.values()
    }
}

/// A function application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    pub(crate) name: String,
    pub(crate) args: Vec<Expr>,

    /// The rendered call, which doubles as the canonical value of the node.
    pub(crate) value: String,
}

impl Call {
    pub(crate) fn new(name: &str, args: Vec<Expr>) -> Self {
        let args_text = args.iter().map(Expr::text).collect::<Vec<_>>().join(",");
        let value = if name == PARENS {
            format!("({})", args_text)
        } else {
            format!("{}({})", name, args_text)
        };
        Call { name: name.to_string(), args, value }
    }

    /// The name of the function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments of the call.
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub(crate) fn into_args(self) -> Vec<Expr> {
        self.args
    }
}
