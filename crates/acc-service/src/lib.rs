//! # acc-service
//!
//! Directory operations for accounts and groups.
//!
//! [`Directory`] ties a store to the search index: writes go to the store
//! first and are then mirrored into the index, reads come from the store,
//! filtered listings ask the index for ids and load each hit from the store.
//!
//! ## Membership
//!
//! A membership edge is recorded on both entities. [`Directory::add_member`]
//! and [`Directory::remove_member`] keep the two sides in step; deleting a
//! group removes it from every member account first.
//!
//! ## Async access
//!
//! The directory itself is synchronous. [`DirectoryHandle`] implements the
//! async [`AccountsService`] and [`GroupsService`] interfaces on top of it.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

mod accounts;
mod directory;
pub mod dto;
pub mod error;
mod groups;
pub mod handler;
mod listing;
mod mask;
pub mod password;
pub mod permissions;
mod relations;
#[cfg(test)]
mod testing;

pub use directory::Directory;
pub use error::{ServiceError, ServiceResult};
pub use handler::{AccountsService, DirectoryHandle, GroupsService};
pub use password::{PasswordHasherService, PasswordPolicy};
pub use permissions::{PolicyError, PolicyService, register_permissions};
