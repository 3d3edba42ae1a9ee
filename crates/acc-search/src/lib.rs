//! # acc-search
//!
//! Secondary index for the accounts directory.
//!
//! The index answers list and lookup queries; the directory store remains
//! the system of record and every hit is hydrated from it. Filters use a
//! subset of the OData `$filter` syntax and are translated to tantivy
//! queries node by node.
//!
//! ## Components
//!
//! - [`SearchIndex`] - in-memory tantivy index with upsert/remove/search
//! - [`filter`] - filter lexer, syntax tree and parser
//! - [`translate`] - filter to query translation and the field table

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod filter;
pub mod index;
pub mod schema;
pub mod translate;

pub use error::{SearchError, SearchResult};
pub use index::SearchIndex;
pub use schema::{IndexField, IndexSchema};
