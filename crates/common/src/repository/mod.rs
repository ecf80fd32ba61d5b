//! Content repository abstraction
//!
//! The command layer talks to storage only through [`RepositoryProvider`],
//! a small async interface over a path addressed tree of [`Node`]s.
//! [`MemoryRepository`] is the bundled implementation; it keeps every
//! workspace in an ordered path map and can be snapshotted to JSON.
//!
//! [`Repository`] pairs a provider with a [`UserDirectory`](crate::security::UserDirectory)
//! and hands out authenticated [`Session`]s.

mod connection;
mod memory;
mod node;
mod provider;

pub use connection::{Repository, Session, WorkspaceBootstrap};
pub use memory::{
    MemoryRepository, MemoryRepositoryError, RepositorySnapshot, Workspace, SYSTEM_USER,
};
pub use node::{props, Node, NodeKind, Properties, PropertyValue, RawComment, Variant};
pub use provider::{RepositoryError, RepositoryProvider};
