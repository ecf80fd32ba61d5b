use async_trait::async_trait;
use tracing::debug;

use crate::error::ContentError;
use crate::factory::ContentFactory;
use crate::model::{Category, Content};
use crate::path;
use crate::repository::{NodeKind, RepositoryProvider, Session};
use crate::security::PermissionType;

use super::{content_location, existing_node, materialize, require_permission, segment, Command};

/// Read the entry stored at `location` in `locale`.
///
/// Folders ignore the locale.
#[derive(Debug, Clone)]
pub struct GetContent {
    pub location: String,
    pub locale: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for GetContent {
    type Output = Content;

    async fn execute(&self, ctx: &Session<P>) -> Result<Content, ContentError> {
        const OP: &str = "get_content";
        debug!("{}()", OP);

        let location = content_location(&self.location)?;
        segment("locale", &self.locale)?;

        ctx.check().await?;

        let node = existing_node(ctx, &location, OP).await?;
        if node.kind.is_localized() && !node.has_locale(&self.locale) {
            return Err(ContentError::NotFound(format!(
                "location {} has no locale {}",
                location, self.locale
            )));
        }

        require_permission(ctx, &location, PermissionType::Read).await?;

        materialize(ctx, &location, Some(&self.locale)).await
    }
}

/// Read a category by its path relative to the category root.
#[derive(Debug, Clone)]
pub struct GetCategory {
    pub category_path: String,
    pub locale: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for GetCategory {
    type Output = Category;

    async fn execute(&self, ctx: &Session<P>) -> Result<Category, ContentError> {
        const OP: &str = "get_category";
        debug!("{}()", OP);

        ContentError::require("category_path", &self.category_path)?;
        segment("locale", &self.locale)?;
        let category_path = path::category_location(&self.category_path)?;

        ctx.check().await?;

        let node = existing_node(ctx, &category_path, OP).await?;
        if node.kind != NodeKind::Category {
            return Err(ContentError::NotFound(format!(
                "no category at {}",
                self.category_path
            )));
        }
        if !node.has_locale(&self.locale) {
            return Err(ContentError::NotFound(format!(
                "category {} has no locale {}",
                self.category_path, self.locale
            )));
        }

        require_permission(ctx, &category_path, PermissionType::Read).await?;

        Ok(ContentFactory::category(&node, &self.locale)?)
    }
}
