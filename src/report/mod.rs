//! Markdown report modification.

pub mod injector;

pub use injector::*;
