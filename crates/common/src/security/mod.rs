//! Access control
//!
//! - **[`Acl`]** / **[`Ace`]**: entries attached to repository locations
//! - **[`AclChecker`]**: nearest-ACL-wins permission resolution
//! - **[`UserDirectory`]**: credentials and group membership used at login

mod acl;
mod checker;
mod users;

pub use acl::{Ace, Acl, PermissionType, Principal};
pub use checker::AclChecker;
pub use users::{password_digest, UserDirectory, UserDirectoryError, UserRecord};
