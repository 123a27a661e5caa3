//! Compass, a tiny line-oriented command interpreter.
//!
//! This crate provides the two building blocks of a Compass session: a total
//! tokenizer that turns one line of text into a typed token sequence, and an
//! [`Interpreter`] that consumes that sequence, dispatches to a fixed set of
//! command handlers, and reports results and diagnostics as text lines on a
//! caller-supplied sink. It is intentionally small and easy to read, suitable
//! for coursework and experiments with lexing and command dispatch.
//!
//! State is process-lifetime only: the variable store lives inside one
//! [`Interpreter`] instance and nothing is persisted.

pub mod env;
pub mod lexer;
pub mod value;

mod interpreter;

pub use interpreter::{Diagnostic, Interpreter};
pub use lexer::{Token, tokenize};
pub use value::Value;
