//! Domain types and authorization policy invariants.

#![forbid(unsafe_code)]

mod event;
mod permission;
mod role;
mod subject;
mod verdict;

pub use event::RelationshipEvent;
pub use permission::{CoachPermission, Permission, ResourceScope};
pub use role::Role;
pub use subject::{ResourceKind, ResourceRef, Subject};
pub use verdict::{DenyReason, Verdict};
