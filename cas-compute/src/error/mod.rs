//! Errors raised by the rewrite engine, the function table and the evaluation context.
//!
//! All of them are reported through [`cas_error::Error`]. Errors created here carry no spans; the
//! parser attaches the span of the operator or function call that caused them.

pub mod kind;

pub use cas_error::Error;
