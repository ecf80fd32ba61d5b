//! Content commands
//!
//! Every operation is a request struct implementing [`Command`]. The
//! session is never stored in the command; it is passed to
//! [`Command::execute`] so one caller's connection and user travel with the
//! call.
//!
//! Mutating commands follow the same sequence:
//!
//! 1. validate parameters (`Validation`)
//! 2. check the session (`Io`)
//! 3. check the target location exists (`NotFound`)
//! 4. check the identity tuple is free (`Conflict`)
//! 5. check the user's permission (`Permission`)
//! 6. issue one mutating repository call
//! 7. re-read the node and build the result with the
//!    [`ContentFactory`](crate::factory::ContentFactory)
//!
//! Step 4 is a plain read and can race with another session. The providers
//! enforce uniqueness on insert as well, and a uniqueness violation reported
//! at step 6 still surfaces as `Conflict`.

mod acl;
mod create;
mod read;
mod update;

use async_trait::async_trait;

use crate::error::ContentError;
use crate::factory::ContentFactory;
use crate::model::Content;
use crate::path;
use crate::repository::{Node, RepositoryProvider, Session};
use crate::security::PermissionType;

pub use acl::SetAcl;
pub use create::{
    CreateBinaryContent, CreateCategory, CreateContentComment, CreateFolder, CreateTextContent,
};
pub use read::{GetCategory, GetContent};
pub use update::AddContentCategory;

#[async_trait]
pub trait Command<P: RepositoryProvider>: Send + Sync {
    type Output: Send;

    async fn execute(&self, ctx: &Session<P>) -> Result<Self::Output, ContentError>;
}

/// Validate and normalize a location that must not be inside the category tree.
pub(crate) fn content_location(location: &str) -> Result<String, ContentError> {
    ContentError::require("location", location)?;
    let location = path::normalize_location(location)?;
    if path::is_reserved(&location) {
        return Err(ContentError::Validation(format!(
            "location {} is reserved for categories",
            location
        )));
    }
    Ok(location)
}

/// Validate an id or locale: required, and usable as one path segment.
pub(crate) fn segment(name: &str, value: &str) -> Result<(), ContentError> {
    ContentError::require(name, value)?;
    path::check_name(value)?;
    Ok(())
}

/// Fetch the node at `path`, failing with `NotFound` for `op` if absent.
pub(crate) async fn existing_node<P: RepositoryProvider>(
    ctx: &Session<P>,
    path: &str,
    op: &str,
) -> Result<Node, ContentError> {
    ctx.provider()
        .node(ctx.workspace(), path)
        .await
        .map_err(ContentError::io)?
        .ok_or_else(|| {
            ContentError::NotFound(format!(
                "location {} doesn't exist for {}() operation",
                path, op
            ))
        })
}

/// Fail with `Permission` unless the session user holds `required` at `path`.
pub(crate) async fn require_permission<P: RepositoryProvider>(
    ctx: &Session<P>,
    path: &str,
    required: PermissionType,
) -> Result<(), ContentError> {
    let granted = ctx
        .checker()
        .has_permission(ctx.user(), path, required)
        .await
        .map_err(ContentError::io)?;
    if !granted {
        tracing::warn!(user = %ctx.user(), %path, %required, "permission denied");
        return Err(ContentError::Permission(format!(
            "user {} has not {} rights in location {}",
            ctx.user(),
            required,
            path
        )));
    }
    Ok(())
}

/// Re-read the node at `path` and build the content the caller sees.
///
/// The node was just written or checked, so its absence here is a
/// repository fault rather than a missing location.
pub(crate) async fn materialize<P: RepositoryProvider>(
    ctx: &Session<P>,
    path: &str,
    locale: Option<&str>,
) -> Result<Content, ContentError> {
    let provider = ctx.provider();
    let workspace = ctx.workspace();

    let node = provider
        .node(workspace, path)
        .await
        .map_err(ContentError::io)?
        .ok_or_else(|| ContentError::Io(format!("node {} vanished after write", path)))?;

    let children = if node.kind.is_container() {
        provider
            .children(workspace, path)
            .await
            .map_err(ContentError::io)?
    } else {
        Vec::new()
    };

    let mut categories = Vec::new();
    if let Some(variant) = locale.and_then(|l| node.variant(l)) {
        for reference in &variant.categories {
            if let Some(category) = provider
                .node(workspace, reference)
                .await
                .map_err(ContentError::io)?
            {
                categories.push(category);
            }
        }
    }

    Ok(ContentFactory::content(&node, locale, &children, &categories)?)
}
