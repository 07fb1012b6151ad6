mod command;
mod error;

use cas_compute::ctxt::Ctxt;
use cas_parser::evaluate;
use command::Command;
use error::report_to_stderr;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Evaluates one line of input, printing the result or the error. Returns false if the line
/// failed.
fn read_eval(input: &str, ctxt: &mut Ctxt) -> bool {
    if let Some(command) = Command::parse(input) {
        return match command.and_then(|command| command.run(ctxt)) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{}", output);
                }
                true
            },
            Err(message) => {
                eprintln!("{}", message);
                false
            },
        };
    }

    match evaluate(ctxt, input) {
        Ok(value) => {
            println!("{}", value);
            true
        },
        Err(err) => {
            report_to_stderr(&err, input);
            false
        },
    }
}

/// Evaluates every non-empty line of the input in one context.
fn execute(input: &str) -> ExitCode {
    let mut ctxt = Ctxt::default();
    let mut failed = false;
    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        failed |= !read_eval(line, &mut ctxt);
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Runs the interactive mode.
fn repl() -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;
    let mut ctxt = Ctxt::default();

    loop {
        let input = match rl.readline("> ") {
            Ok(input) => input,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err),
        };
        if input.trim().is_empty() {
            continue;
        }

        rl.add_history_entry(&input)?;
        read_eval(&input, &mut ctxt);
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        debug!(%filename, "reading file");
        match fs::read_to_string(&filename) {
            Ok(input) => execute(&input),
            Err(err) => {
                eprintln!("could not read `{}`: {}", filename, err);
                ExitCode::FAILURE
            },
        }
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("could not read stdin: {}", err);
            return ExitCode::FAILURE;
        }
        execute(&input)
    } else {
        // run the repl / interactive mode
        match repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_shares_context() {
        let mut ctxt = Ctxt::default();
        assert!(read_eval("a = 3", &mut ctxt));
        assert!(read_eval(":set numer on", &mut ctxt));
        assert!(read_eval("a^2", &mut ctxt));
        assert!(ctxt.settings.parse_to_number);
        assert_eq!(ctxt.expressions().len(), 1);
    }

    #[test]
    fn failures_are_reported() {
        let mut ctxt = Ctxt::default();
        assert!(!read_eval("sin(1,2)", &mut ctxt));
        assert!(!read_eval(":nope", &mut ctxt));
        assert!(ctxt.expressions().is_empty());
    }
}
