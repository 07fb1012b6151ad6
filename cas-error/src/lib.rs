//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that pairs a kind with the regions of the input it refers to.
//!
//! Errors raised deep inside the rewrite engine do not know where in the source text they
//! originated, so they are created without spans. The parser fills in the span of whatever it
//! was evaluating with [`Error::with_fallback_span`] before the error reaches the user.

#[cfg(test)]
extern crate self as cas_error;

use ariadne::{Color, Report};
use std::{any::Any, fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Returns the error kind as [`Any`], so that it can be downcast to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Returns the top-level message of the error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error that is not (yet) associated with any region of source code.
    pub fn spanless(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// Attaches the given span to the error if it has none.
    pub fn with_fallback_span(mut self, span: Range<usize>) -> Self {
        if self.spans.is_empty() {
            self.spans.push(span);
        }
        self
    }

    /// Returns true if the kind of this error is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns the kind of this error as `K`, if it is one.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_attrs::ErrorKind;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("`{}` went wrong", self.what),
        labels = ["here", "and here"],
        help = "try something else",
    )]
    struct Broken {
        what: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "unit error", labels = ["this"])]
    struct Unit;

    #[test]
    fn downcast() {
        let err = Error::new(vec![0..3], Broken { what: "abc".to_string() });
        assert!(err.is::<Broken>());
        assert!(!err.is::<Unit>());
        assert_eq!(err.downcast_ref::<Broken>(), Some(&Broken { what: "abc".to_string() }));
        assert_eq!(err.to_string(), "`abc` went wrong");
    }

    #[test]
    fn fallback_span() {
        let err = Error::spanless(Unit).with_fallback_span(2..4);
        assert_eq!(err.spans, vec![2..4]);

        let err = Error::new(vec![0..1], Unit).with_fallback_span(2..4);
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn report_without_spans() {
        let mut buf = Vec::new();
        Error::spanless(Unit)
            .build_report("input")
            .write(("input", ariadne::Source::from("1 + 2")), &mut buf)
            .unwrap();
        let text = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(text.contains("unit error"));
    }

    #[test]
    fn report_with_help() {
        let mut buf = Vec::new();
        Error::new(vec![0..1, 4..5], Broken { what: "x".to_string() })
            .build_report("input")
            .write(("input", ariadne::Source::from("1 + 2")), &mut buf)
            .unwrap();
        let text = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(text.contains("`x` went wrong"));
        assert!(text.contains("and here"));
        assert!(text.contains("try something else"));
    }
}
