//! Commands that manage the context, such as `:set numer on` and `:vars`.

use cas_compute::{ctxt::Ctxt, funcs};
use tracing::debug;

/// The help text printed by `:help`.
pub const HELP: &str = "\
commands:
  :set numer on|off      evaluate functions of numbers numerically
  :set suppress on|off   recover from unbalanced brackets and arity errors
  :set imaginary <name>  rename the imaginary unit
  :vars                  list the assigned variables
  :clear                 remove every variable and stored expression
  :funcs                 list the built-in functions
  :help                  print this message
anything else is evaluated; `name = expr` assigns a variable";

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Changes a setting.
    Set { name: &'a str, value: &'a str },

    /// Lists the variables.
    Vars,

    /// Clears the variables and stored expressions.
    Clear,

    /// Lists the built-in functions.
    Funcs,

    /// Prints the help text.
    Help,
}

impl<'a> Command<'a> {
    /// Parses a line as a command. Returns [`None`] if the line is not a command, that is, if it
    /// does not start with `:`.
    pub fn parse(line: &'a str) -> Option<Result<Self, String>> {
        let rest = line.trim().strip_prefix(':')?;
        let mut words = rest.split_whitespace();
        let command = match (words.next(), words.next(), words.next(), words.next()) {
            (Some("set"), Some(name), Some(value), None) => Ok(Command::Set { name, value }),
            (Some("vars"), None, None, None) => Ok(Command::Vars),
            (Some("clear"), None, None, None) => Ok(Command::Clear),
            (Some("funcs"), None, None, None) => Ok(Command::Funcs),
            (Some("help"), None, None, None) => Ok(Command::Help),
            _ => Err(format!("unknown command `{}`; try `:help`", line.trim())),
        };
        Some(command)
    }

    /// Runs the command, returning the text to print.
    pub fn run(&self, ctxt: &mut Ctxt) -> Result<String, String> {
        debug!(command = ?self, "running command");
        match *self {
            Command::Set { name, value } => set(ctxt, name, value),
            Command::Vars => {
                let mut vars = ctxt
                    .vars()
                    .iter()
                    .map(|(name, value)| format!("{} = {}", name, value))
                    .collect::<Vec<_>>();
                vars.sort();
                Ok(vars.join("\n"))
            },
            Command::Clear => {
                ctxt.clear_vars();
                ctxt.clear_expressions();
                Ok(String::new())
            },
            Command::Funcs => {
                let mut names = funcs::names()
                    .filter(|name| ctxt.builtin(name).is_some())
                    .collect::<Vec<_>>();
                names.sort_unstable();
                Ok(names.join(", "))
            },
            Command::Help => Ok(HELP.to_string()),
        }
    }
}

/// Parses `on` or `off`.
fn switch(value: &str) -> Result<bool, String> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(format!("expected `on` or `off`, found `{}`", value)),
    }
}

/// Changes a setting of the context.
fn set(ctxt: &mut Ctxt, name: &str, value: &str) -> Result<String, String> {
    let settings = &mut ctxt.settings;
    match name {
        "numer" => settings.parse_to_number = switch(value)?,
        "suppress" => settings.suppress_errors = switch(value)?,
        "imaginary" => settings.imaginary = value.to_string(),
        _ => return Err(format!("unknown setting `{}`; the settings are numer, suppress and imaginary", name)),
    }
    Ok(format!("{} = {}", name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_parser::evaluate;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("x + 1"), None);
        assert_eq!(Command::parse(" :vars "), Some(Ok(Command::Vars)));
        assert_eq!(
            Command::parse(":set numer on"),
            Some(Ok(Command::Set { name: "numer", value: "on" })),
        );
        assert!(matches!(Command::parse(":set numer"), Some(Err(_))));
        assert!(matches!(Command::parse(":frobnicate"), Some(Err(_))));
    }

    #[test]
    fn settings() {
        let mut ctxt = Ctxt::default();
        Command::Set { name: "numer", value: "on" }.run(&mut ctxt).unwrap();
        assert!(ctxt.settings.parse_to_number);

        Command::Set { name: "imaginary", value: "j" }.run(&mut ctxt).unwrap();
        assert_eq!(ctxt.settings.imaginary, "j");

        assert!(Command::Set { name: "suppress", value: "maybe" }.run(&mut ctxt).is_err());
        assert!(Command::Set { name: "colour", value: "on" }.run(&mut ctxt).is_err());
    }

    #[test]
    fn vars_and_clear() {
        let mut ctxt = Ctxt::default();
        evaluate(&mut ctxt, "b = 2").unwrap();
        evaluate(&mut ctxt, "a = x").unwrap();
        evaluate(&mut ctxt, "a + b").unwrap();
        assert_eq!(Command::Vars.run(&mut ctxt).unwrap(), "a = x\nb = 2");

        Command::Clear.run(&mut ctxt).unwrap();
        assert!(ctxt.vars().is_empty());
        assert!(ctxt.expressions().is_empty());
    }

    #[test]
    fn excluded_functions_are_hidden() {
        let mut ctxt = Ctxt::default();
        ctxt.settings.exclude.push("sin".to_string());
        let funcs = Command::Funcs.run(&mut ctxt).unwrap();
        assert!(funcs.contains("cos"));
        assert!(!funcs.split(", ").any(|name| name == "sin"));
    }
}
