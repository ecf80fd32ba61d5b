use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::path;
use crate::repository::{RepositoryProvider, Session};
use crate::security::{Ace, Acl, PermissionType};

use super::{existing_node, require_permission, Command};

/// Replace the ACL attached to `location`.
///
/// Requires `Admin` at the location as resolved before the change. Unlike
/// the content commands this one accepts locations inside the category tree.
#[derive(Debug, Clone)]
pub struct SetAcl {
    pub location: String,
    pub description: String,
    pub aces: Vec<Ace>,
}

#[async_trait]
impl<P: RepositoryProvider> Command<P> for SetAcl {
    type Output = Acl;

    async fn execute(&self, ctx: &Session<P>) -> Result<Acl, ContentError> {
        const OP: &str = "set_acl";
        debug!("{}()", OP);

        ContentError::require("location", &self.location)?;
        let location = path::normalize_location(&self.location)?;

        ctx.check().await?;

        existing_node(ctx, &location, OP).await?;
        require_permission(ctx, &location, PermissionType::Admin).await?;

        let mut acl = Acl::new(location.clone(), self.description.clone());
        for ace in &self.aces {
            acl.push(ace.clone());
        }
        ctx.provider()
            .set_acl(ctx.workspace(), &location, acl.clone())
            .await
            .map_err(ContentError::from_mutation)?;

        info!(path = %location, entries = acl.aces.len(), user = %ctx.user(), "acl replaced");
        Ok(acl)
    }
}
