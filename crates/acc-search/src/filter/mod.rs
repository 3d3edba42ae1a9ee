//! Filter expressions.
//!
//! Supports a subset of the OData `$filter` syntax: comparisons, `and`,
//! `or`, `not`, parentheses and the `startswith`, `endswith` and `contains`
//! string functions.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{CompareOp, Expr, Literal, Operand, StringFunction};
pub use parser::parse;
