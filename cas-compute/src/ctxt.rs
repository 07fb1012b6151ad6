//! The evaluation context: settings, variables and stored expressions.

use cas_error::Error;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use crate::{
    consts,
    error::kind::{InvalidName, ReservedName},
    funcs::{self, Builtin},
    symbolic::expr::is_valid_name,
    value::Value,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control how expressions are evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Evaluate functions of numbers numerically, converting the result back into an exact
    /// fraction. Grouping parentheses are also removed in this mode.
    pub parse_to_number: bool,

    /// Recover from recoverable errors instead of failing: arity checks are skipped, unbalanced
    /// brackets are ignored or closed, and failing operations on vectors and matrices leave their
    /// left operand unchanged.
    pub suppress_errors: bool,

    /// The name of the imaginary unit.
    pub imaginary: String,

    /// Built-in functions that are disabled.
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            parse_to_number: false,
            suppress_errors: false,
            imaginary: "i".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    /// Decides whether a recoverable error aborts evaluation. Returns the error back if errors
    /// are not suppressed.
    pub fn recover(&self, err: Error) -> Result<(), Error> {
        if self.suppress_errors {
            debug!(error = %err, "suppressed error");
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Returns true if the named built-in function is disabled.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|excluded| excluded == name)
    }
}

/// A context in which expressions are evaluated.
#[derive(Debug, Clone)]
pub struct Ctxt {
    /// The settings used for evaluation.
    pub settings: Settings,

    vars: HashMap<String, Value>,
    expressions: Vec<Value>,
    reserved: HashSet<String>,
}

impl Default for Ctxt {
    fn default() -> Self {
        Ctxt::new(Settings::default())
    }
}

impl Ctxt {
    /// Creates a context with the given settings.
    pub fn new(settings: Settings) -> Self {
        let reserved = funcs::names()
            .chain(consts::NAMES)
            .map(str::to_string)
            .collect();
        Ctxt {
            settings,
            vars: HashMap::new(),
            expressions: Vec::new(),
            reserved,
        }
    }

    /// Returns true if the name belongs to a built-in function or constant.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Returns the built-in function with the given name, unless it is excluded in the settings.
    pub fn builtin(&self, name: &str) -> Option<&'static Builtin> {
        if self.settings.is_excluded(name) {
            return None;
        }
        funcs::get(name)
    }

    /// Assigns a value to a variable.
    pub fn set_var(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if !is_valid_name(name) {
            return Err(Error::spanless(InvalidName { name: name.to_string() }));
        }
        if self.is_reserved(name) {
            return Err(Error::spanless(ReservedName { name: name.to_string() }));
        }

        debug!(name, %value, "assigned variable");
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Returns the value of a variable.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// All assigned variables.
    pub fn vars(&self) -> &HashMap<String, Value> {
        &self.vars
    }

    /// Removes every variable.
    pub fn clear_vars(&mut self) {
        debug!(count = self.vars.len(), "cleared variables");
        self.vars.clear();
    }

    /// Stores an evaluated expression, returning its 1-based index.
    pub fn store(&mut self, value: Value) -> usize {
        self.expressions.push(value);
        debug!(index = self.expressions.len(), "stored expression");
        self.expressions.len()
    }

    /// Returns the stored expression with the given 1-based index.
    pub fn expression(&self, index: usize) -> Option<&Value> {
        index.checked_sub(1).and_then(|i| self.expressions.get(i))
    }

    /// All stored expressions, in order.
    pub fn expressions(&self) -> &[Value] {
        &self.expressions
    }

    /// Removes every stored expression.
    pub fn clear_expressions(&mut self) {
        self.expressions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Expr;
    use pretty_assertions::assert_eq;

    #[test]
    fn variables() {
        let mut ctxt = Ctxt::default();
        ctxt.set_var("a", Value::Expr(Expr::number(3))).unwrap();
        assert_eq!(ctxt.get_var("a"), Some(&Value::Expr(Expr::number(3))));

        ctxt.clear_vars();
        assert!(ctxt.get_var("a").is_none());
    }

    #[test]
    fn reserved_and_invalid_names() {
        let mut ctxt = Ctxt::default();
        let err = ctxt.set_var("sin", Value::Expr(Expr::one())).unwrap_err();
        assert!(err.is::<ReservedName>());
        let err = ctxt.set_var("PI", Value::Expr(Expr::one())).unwrap_err();
        assert!(err.is::<ReservedName>());
        let err = ctxt.set_var("1x", Value::Expr(Expr::one())).unwrap_err();
        assert!(err.is::<InvalidName>());
    }

    #[test]
    fn stored_expressions() {
        let mut ctxt = Ctxt::default();
        assert_eq!(ctxt.store(Value::Expr(Expr::one())), 1);
        assert_eq!(ctxt.store(Value::Expr(Expr::zero())), 2);
        assert_eq!(ctxt.expression(2), Some(&Value::Expr(Expr::zero())));
        assert!(ctxt.expression(0).is_none());

        ctxt.clear_expressions();
        assert!(ctxt.expressions().is_empty());
    }

    #[test]
    fn excluded_functions() {
        let settings = Settings { exclude: vec!["sin".to_string()], ..Settings::default() };
        let ctxt = Ctxt::new(settings);
        assert!(ctxt.builtin("sin").is_none());
        assert!(ctxt.builtin("cos").is_some());
    }
}
