use ariadne::Source;
use cas_parser::parser::error::Error;

/// Reports the error to stderr, pointing into the input it came from.
///
/// The `ariadne` crate's [`Report`](ariadne::Report) type does not have a `Display`
/// implementation, so we can only use its `eprint` method to print to stderr.
pub fn report_to_stderr(err: &Error, input: &str) {
    let report = err.build_report("input");
    if report.eprint(("input", Source::from(input))).is_err() {
        eprintln!("error: {}", err);
    }
}
