use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::node::{Node, NodeKind, RawComment, Variant};
use crate::security::Acl;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError<T> {
    /// Fault inside the provider itself
    #[error("unhandled repository provider error: {0}")]
    Provider(#[from] T),
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),
    /// A node was to be created under a parent that does not exist
    #[error("parent not found: {0}")]
    ParentNotFound(String),
    #[error("node not found: {0}")]
    NodeNotFound(String),
    /// The path (or path and locale) is already taken
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// A node exists at the path but is of another kind --
    ///  path, existing, requested
    #[error("node {0} is a {1}, not a {2}")]
    KindMismatch(String, NodeKind, NodeKind),
    #[error("locale {1} not found at {0}")]
    LocaleNotFound(String, String),
}

/// Hierarchical, path addressed node store.
///
/// Every method is scoped to a workspace. Paths must already be normalized
/// with [`normalize_location`](crate::path::normalize_location).
///
/// Mutations are atomic per call: an implementation either applies the whole
/// change or returns an error having changed nothing.
#[async_trait]
pub trait RepositoryProvider: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync;

    /// Create an empty workspace holding the root and the category root
    async fn create_workspace(&self, workspace: &str) -> Result<(), RepositoryError<Self::Error>>;

    async fn workspace_exists(&self, workspace: &str)
        -> Result<bool, RepositoryError<Self::Error>>;

    /// Fetch the node stored at `path`
    ///
    /// # Returns
    /// * `Ok(Some(Node))` - The node at the path
    /// * `Ok(None)` - Nothing is stored at the path
    /// * `Err(RepositoryError::WorkspaceNotFound)` - The workspace does not exist
    async fn node(
        &self,
        workspace: &str,
        path: &str,
    ) -> Result<Option<Node>, RepositoryError<Self::Error>>;

    async fn exists(&self, workspace: &str, path: &str) -> Result<bool, RepositoryError<Self::Error>> {
        Ok(self.node(workspace, path).await?.is_some())
    }

    /// Check whether `path` holds a variant for `locale`
    async fn variant_exists(
        &self,
        workspace: &str,
        path: &str,
        locale: &str,
    ) -> Result<bool, RepositoryError<Self::Error>> {
        Ok(self
            .node(workspace, path)
            .await?
            .map(|node| node.has_locale(locale))
            .unwrap_or(false))
    }

    /// Direct children of `path`, ordered by path
    async fn children(
        &self,
        workspace: &str,
        path: &str,
    ) -> Result<Vec<Node>, RepositoryError<Self::Error>>;

    /// Create a folder at `path`
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(RepositoryError::ParentNotFound)` - The parent does not exist
    /// * `Err(RepositoryError::AlreadyExists)` - Any node already lives at `path`
    async fn insert_folder(
        &self,
        workspace: &str,
        path: &str,
        author: &str,
    ) -> Result<(), RepositoryError<Self::Error>>;

    /// Add a locale variant at `path`, creating the node if needed
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(RepositoryError::ParentNotFound)` - The node is absent and so is its parent
    /// * `Err(RepositoryError::KindMismatch)` - A node of another kind lives at `path`
    /// * `Err(RepositoryError::AlreadyExists)` - The locale is already present
    async fn insert_variant(
        &self,
        workspace: &str,
        path: &str,
        kind: NodeKind,
        locale: &str,
        variant: Variant,
    ) -> Result<(), RepositoryError<Self::Error>>;

    /// Append a comment to the variant for `locale`, or to the node itself
    ///  when `locale` is `None`
    async fn append_comment(
        &self,
        workspace: &str,
        path: &str,
        locale: Option<&str>,
        comment: RawComment,
    ) -> Result<(), RepositoryError<Self::Error>>;

    /// Reference the category at `category_path` from a content variant.
    ///  Adding a reference twice is a no-op.
    async fn add_category_ref(
        &self,
        workspace: &str,
        path: &str,
        locale: &str,
        category_path: &str,
    ) -> Result<(), RepositoryError<Self::Error>>;

    /// The ACL attached directly to `path`, without inheritance
    async fn acl(
        &self,
        workspace: &str,
        path: &str,
    ) -> Result<Option<Acl>, RepositoryError<Self::Error>>;

    /// Attach `acl` to `path`, replacing any ACL already there
    async fn set_acl(
        &self,
        workspace: &str,
        path: &str,
        acl: Acl,
    ) -> Result<(), RepositoryError<Self::Error>>;
}
