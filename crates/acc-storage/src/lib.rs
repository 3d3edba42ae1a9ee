//! # acc-storage
//!
//! Storage abstraction for the accounts directory.
//!
//! This crate defines the store interfaces that concrete backends implement,
//! the storage error type and [`SafeId`], the identifier sanitizer every
//! backend must route ids through.
//!
//! ## Store Traits
//!
//! - [`AccountStore`] - load/save/delete/list for accounts
//! - [`GroupStore`] - load/save/delete/list for groups
//!
//! The traits are synchronous. Callers on an async runtime are expected to
//! move store calls onto blocking threads.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod account;
pub mod error;
pub mod group;
pub mod id;

pub use account::AccountStore;
pub use error::{StorageError, StorageResult};
pub use group::GroupStore;
pub use id::SafeId;
