use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::model::Content;
use crate::path;
use crate::repository::{NodeKind, RepositoryProvider, Session};
use crate::security::PermissionType;

use super::{content_location, existing_node, materialize, require_permission, segment, Command};

/// Attach an existing category to a text or binary entry.
///
/// The category must exist in the same locale as the entry. Attaching the
/// same category twice leaves a single reference.
#[derive(Debug, Clone)]
pub struct AddContentCategory {
    pub location: String,
    pub locale: String,
    pub category_location: String,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for AddContentCategory {
    type Output = Content;

    async fn execute(&self, ctx: &Session<P>) -> Result<Content, ContentError> {
        const OP: &str = "add_content_category";
        debug!("{}()", OP);

        let location = content_location(&self.location)?;
        segment("locale", &self.locale)?;
        ContentError::require("category_location", &self.category_location)?;
        let category_path = path::category_location(&self.category_location)?;

        ctx.check().await?;

        let node = existing_node(ctx, &location, OP).await?;
        if !matches!(node.kind, NodeKind::Text | NodeKind::Binary) {
            return Err(ContentError::Validation(format!(
                "{} is a {} and cannot be categorized",
                location, node.kind
            )));
        }
        if !node.has_locale(&self.locale) {
            return Err(ContentError::NotFound(format!(
                "location {} has no locale {} for {}() operation",
                location, self.locale, OP
            )));
        }

        let category = existing_node(ctx, &category_path, OP).await?;
        if category.kind != NodeKind::Category || !category.has_locale(&self.locale) {
            return Err(ContentError::NotFound(format!(
                "category {} does not exist in locale {}",
                self.category_location, self.locale
            )));
        }

        require_permission(ctx, &location, PermissionType::Write).await?;

        ctx.provider()
            .add_category_ref(ctx.workspace(), &location, &self.locale, &category_path)
            .await
            .map_err(ContentError::from_mutation)?;

        info!(path = %location, category = %category_path, user = %ctx.user(), "category attached");
        materialize(ctx, &location, Some(&self.locale)).await
    }
}
