//! # acc-core
//!
//! Configuration and the shared error taxonomy for the accounts directory.
//!
//! Every other crate in the workspace classifies its failures with
//! [`ErrorKind`], so a transport layer can tell caller mistakes apart from
//! server faults without knowing which component produced them.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
