/**
 * Content commands.
 *  Validation, existence, conflict and permission
 *  checks in front of a single repository mutation.
 */
pub mod commands;
pub mod error;
/**
 * Mapping from raw repository nodes to the
 *  domain objects handed back to callers.
 */
pub mod factory;
/**
 * Domain value objects: content, folders,
 *  categories, comments and users.
 */
pub mod model;
/**
 * Path helpers for the `/`-delimited locations
 *  used throughout the repository.
 */
pub mod path;
/**
 * The repository abstraction: provider trait,
 *  in-memory implementation, connections and sessions.
 */
pub mod repository;
/**
 * ACLs, the ACL checker and the user directory.
 */
pub mod security;
pub mod service;

pub mod prelude {
    pub use crate::error::{ContentError, ContentErrorKind};
    pub use crate::model::{Category, Comment, Content, ContentBody, ContentKind, User};
    pub use crate::repository::{
        MemoryRepository, Repository, RepositoryProvider, Session, WorkspaceBootstrap,
    };
    pub use crate::security::{Ace, Acl, PermissionType, Principal, UserDirectory, UserRecord};
    pub use crate::service::ContentService;
}
