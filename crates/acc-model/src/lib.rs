//! # acc-model
//!
//! Domain models for the accounts directory: [`Account`], [`Group`] and the
//! [`Reference`] edge that links them.
//!
//! Membership is many-to-many and mirrored on both sides: an account lists
//! the groups it belongs to in `member_of`, a group lists its accounts in
//! `members`. On disk and in the index a reference is only ever an id.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod account;
pub mod group;
pub mod kind;
pub mod reference;

pub use account::{Account, PasswordProfile};
pub use group::Group;
pub use kind::{Entity, EntityKind};
pub use reference::{Deflation, Reference, deflate_all};
