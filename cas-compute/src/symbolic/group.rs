use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The structural category of an expression node.
///
/// Groups are ordered by rank. When two nodes are combined, the higher-ranked node is treated as
/// the outer structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Group {
    /// `N`: a pure number.
    Number,

    /// `P`: a number acting as a symbol, used for irrational powers of literals, such as
    /// `2^(1/3)`.
    Literal,

    /// `S`: a bare variable.
    Variable,

    /// `EX`: a node raised to a symbolic power, such as `x^y`.
    Exponential,

    /// `FN`: a named function application.
    Function,

    /// `PL`: a sum of terms that share the same base but have different powers, such as
    /// `x + x^2`.
    PowerSum,

    /// `CB`: a product of distinct factors, such as `x*y`.
    Product,

    /// `CP`: a general sum of heterogeneous terms, such as `x + y + 1`.
    Sum,
}

impl Group {
    /// Returns true for the groups that hold a keyed collection of children.
    pub fn is_collection(self) -> bool {
        matches!(self, Group::PowerSum | Group::Product | Group::Sum)
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Group::Number => "N",
            Group::Literal => "P",
            Group::Variable => "S",
            Group::Exponential => "EX",
            Group::Function => "FN",
            Group::PowerSum => "PL",
            Group::Product => "CB",
            Group::Sum => "CP",
        };
        write!(f, "{}", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank() {
        let ranked = [
            Group::Number,
            Group::Literal,
            Group::Variable,
            Group::Exponential,
            Group::Function,
            Group::PowerSum,
            Group::Product,
            Group::Sum,
        ];
        assert!(ranked.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
