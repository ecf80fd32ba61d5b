use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::factory::ContentFactory;
use crate::model::{Category, Content, User};
use crate::path;
use crate::repository::{
    props, NodeKind, Properties, PropertyValue, RawComment, RepositoryProvider, Session, Variant,
};
use crate::security::PermissionType;

use super::{
    content_location, existing_node, materialize, require_permission, segment, Command,
};

/// Fail with `Validation` unless `node` can hold children.
fn require_container(node: &crate::repository::Node, op: &str) -> Result<(), ContentError> {
    if !node.kind.is_container() {
        return Err(ContentError::Validation(format!(
            "location {} is a {} and cannot hold content for {}() operation",
            node.path, node.kind, op
        )));
    }
    Ok(())
}

/// Fail with `Conflict` if `(path, locale)` is taken or `path` holds another kind.
async fn require_free_variant<P: RepositoryProvider>(
    ctx: &Session<P>,
    path: &str,
    kind: NodeKind,
    locale: &str,
    op: &str,
) -> Result<(), ContentError> {
    let existing = ctx
        .provider()
        .node(ctx.workspace(), path)
        .await
        .map_err(ContentError::io)?;
    match existing {
        Some(node) if node.kind != kind => Err(ContentError::Conflict(format!(
            "{} exists as a {} for {}() operation",
            path, node.kind, op
        ))),
        Some(node) if node.has_locale(locale) => Err(ContentError::Conflict(format!(
            "location {} locale {} id {} exists for {}() operation",
            path::parent(path).unwrap_or(path::ROOT),
            locale,
            node.id(),
            op
        ))),
        _ => Ok(()),
    }
}

/// Create a text entry at `(location, id, locale)`.
#[derive(Debug, Clone)]
pub struct CreateTextContent {
    pub id: String,
    pub locale: String,
    pub location: String,
    pub html: String,
    pub encoding: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for CreateTextContent {
    type Output = Content;

    async fn execute(&self, ctx: &Session<P>) -> Result<Content, ContentError> {
        const OP: &str = "create_text_content";
        debug!("{}()", OP);

        segment("id", &self.id)?;
        segment("locale", &self.locale)?;
        let location = content_location(&self.location)?;
        ContentError::require("html", &self.html)?;
        ContentError::require("encoding", &self.encoding)?;

        ctx.check().await?;

        let parent = existing_node(ctx, &location, OP).await?;
        require_container(&parent, OP)?;

        let node_path = path::join(&location, &self.id);
        require_free_variant(ctx, &node_path, NodeKind::Text, &self.locale, OP).await?;

        require_permission(ctx, &location, PermissionType::Write).await?;

        let mut properties = Properties::new();
        properties.insert(
            props::HTML.to_string(),
            PropertyValue::String(self.html.clone()),
        );
        properties.insert(
            props::ENCODING.to_string(),
            PropertyValue::String(self.encoding.clone()),
        );
        ctx.provider()
            .insert_variant(
                ctx.workspace(),
                &node_path,
                NodeKind::Text,
                &self.locale,
                Variant::new(&ctx.user().username, properties),
            )
            .await
            .map_err(ContentError::from_mutation)?;

        info!(path = %node_path, locale = %self.locale, user = %ctx.user(), "text content created");
        materialize(ctx, &node_path, Some(&self.locale)).await
    }
}

/// Create a binary entry at `(location, id, locale)`.
#[derive(Debug, Clone)]
pub struct CreateBinaryContent {
    pub id: String,
    pub locale: String,
    pub location: String,
    pub content_type: String,
    /// Declared size of the file, must be non zero
    pub size: u64,
    pub file_name: String,
    pub data: Bytes,
}

impl CreateBinaryContent {
    /// Check every parameter except the payload, returning the normalized
    /// location. Callers streaming the payload run this before reading it.
    pub fn validate(&self) -> Result<String, ContentError> {
        segment("id", &self.id)?;
        segment("locale", &self.locale)?;
        let location = content_location(&self.location)?;
        ContentError::require("content_type", &self.content_type)?;
        if self.size == 0 {
            return Err(ContentError::Validation(
                "parameter size cannot be 0".to_string(),
            ));
        }
        ContentError::require("file_name", &self.file_name)?;
        Ok(location)
    }
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for CreateBinaryContent {
    type Output = Content;

    async fn execute(&self, ctx: &Session<P>) -> Result<Content, ContentError> {
        const OP: &str = "create_binary_content";
        debug!("{}()", OP);

        let location = self.validate()?;
        if self.data.is_empty() {
            return Err(ContentError::Validation(
                "parameter content cannot be empty".to_string(),
            ));
        }

        ctx.check().await?;

        let parent = existing_node(ctx, &location, OP).await?;
        require_container(&parent, OP)?;

        let node_path = path::join(&location, &self.id);
        require_free_variant(ctx, &node_path, NodeKind::Binary, &self.locale, OP).await?;

        require_permission(ctx, &location, PermissionType::Write).await?;

        let mut properties = Properties::new();
        properties.insert(
            props::CONTENT_TYPE.to_string(),
            PropertyValue::String(self.content_type.clone()),
        );
        properties.insert(
            props::FILE_NAME.to_string(),
            PropertyValue::String(self.file_name.clone()),
        );
        properties.insert(props::SIZE.to_string(), PropertyValue::Long(self.size));
        properties.insert(
            props::DATA.to_string(),
            PropertyValue::Binary(self.data.to_vec()),
        );
        ctx.provider()
            .insert_variant(
                ctx.workspace(),
                &node_path,
                NodeKind::Binary,
                &self.locale,
                Variant::new(&ctx.user().username, properties),
            )
            .await
            .map_err(ContentError::from_mutation)?;

        info!(
            path = %node_path,
            locale = %self.locale,
            bytes = self.data.len(),
            user = %ctx.user(),
            "binary content created"
        );
        materialize(ctx, &node_path, Some(&self.locale)).await
    }
}

/// Create a folder at `(location, id)`. Folders have no locale.
#[derive(Debug, Clone)]
pub struct CreateFolder {
    pub id: String,
    pub location: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for CreateFolder {
    type Output = Content;

    async fn execute(&self, ctx: &Session<P>) -> Result<Content, ContentError> {
        const OP: &str = "create_folder";
        debug!("{}()", OP);

        segment("id", &self.id)?;
        let location = content_location(&self.location)?;

        ctx.check().await?;

        let parent = existing_node(ctx, &location, OP).await?;
        require_container(&parent, OP)?;

        let node_path = path::join(&location, &self.id);
        let exists = ctx
            .provider()
            .exists(ctx.workspace(), &node_path)
            .await
            .map_err(ContentError::io)?;
        if exists {
            return Err(ContentError::Conflict(format!(
                "location {} id {} exists for {}() operation",
                location, self.id, OP
            )));
        }

        require_permission(ctx, &location, PermissionType::Write).await?;

        ctx.provider()
            .insert_folder(ctx.workspace(), &node_path, &ctx.user().username)
            .await
            .map_err(ContentError::from_mutation)?;

        info!(path = %node_path, user = %ctx.user(), "folder created");
        materialize(ctx, &node_path, None).await
    }
}

/// Create a category under the reserved category tree.
///
/// `category_location` is relative to the category root; `"/"` and `""`
/// both place the category directly under it.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub id: String,
    pub locale: String,
    pub description: String,
    pub category_location: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for CreateCategory {
    type Output = Category;

    async fn execute(&self, ctx: &Session<P>) -> Result<Category, ContentError> {
        const OP: &str = "create_category";
        debug!("{}()", OP);

        segment("id", &self.id)?;
        segment("locale", &self.locale)?;
        ContentError::require("description", &self.description)?;
        let location = path::category_location(&self.category_location)?;

        ctx.check().await?;

        let parent = existing_node(ctx, &location, OP).await?;
        if !matches!(parent.kind, NodeKind::Root | NodeKind::Category) {
            return Err(ContentError::Validation(format!(
                "location {} is not a category",
                self.category_location
            )));
        }

        let node_path = path::join(&location, &self.id);
        require_free_variant(ctx, &node_path, NodeKind::Category, &self.locale, OP).await?;

        require_permission(ctx, &location, PermissionType::Admin).await?;

        let mut properties = Properties::new();
        properties.insert(
            props::DESCRIPTION.to_string(),
            PropertyValue::String(self.description.clone()),
        );
        ctx.provider()
            .insert_variant(
                ctx.workspace(),
                &node_path,
                NodeKind::Category,
                &self.locale,
                Variant::new(&ctx.user().username, properties),
            )
            .await
            .map_err(ContentError::from_mutation)?;

        info!(path = %node_path, locale = %self.locale, user = %ctx.user(), "category created");

        let node = ctx
            .provider()
            .node(ctx.workspace(), &node_path)
            .await
            .map_err(ContentError::io)?
            .ok_or_else(|| ContentError::Io(format!("node {} vanished after write", node_path)))?;
        Ok(ContentFactory::category(&node, &self.locale)?)
    }
}

/// Append a comment to the entry stored at `location`.
///
/// `location` is the full path of the commented entry. For text and binary
/// entries `locale` selects the variant; folders keep their comments on the
/// folder itself.
#[derive(Debug, Clone)]
pub struct CreateContentComment {
    pub location: String,
    pub locale: String,
    pub comment: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for CreateContentComment {
    type Output = Content;

    async fn execute(&self, ctx: &Session<P>) -> Result<Content, ContentError> {
        const OP: &str = "create_content_comment";
        debug!("{}()", OP);

        let location = content_location(&self.location)?;
        segment("locale", &self.locale)?;
        ContentError::require("comment", &self.comment)?;

        ctx.check().await?;

        let node = existing_node(ctx, &location, OP).await?;
        let locale = if node.kind.is_localized() {
            if !node.has_locale(&self.locale) {
                return Err(ContentError::NotFound(format!(
                    "location {} has no locale {} for {}() operation",
                    location, self.locale, OP
                )));
            }
            Some(self.locale.as_str())
        } else {
            None
        };

        require_permission(ctx, &location, PermissionType::Comments).await?;

        let author: User = ctx.user().clone();
        ctx.provider()
            .append_comment(
                ctx.workspace(),
                &location,
                locale,
                RawComment::new(author, self.comment.clone()),
            )
            .await
            .map_err(ContentError::from_mutation)?;

        info!(path = %location, locale = %self.locale, user = %ctx.user(), "comment added");
        materialize(ctx, &location, Some(&self.locale)).await
    }
}
