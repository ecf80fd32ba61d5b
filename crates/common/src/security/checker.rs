use crate::model::User;
use crate::path;
use crate::repository::{RepositoryError, RepositoryProvider};

use super::{Acl, PermissionType};

/// Resolves permissions against the ACLs stored in a repository.
///
/// Starting at the requested path, the checker walks the parent chain
/// towards the root and stops at the first location with an ACL attached.
/// That ACL alone decides; ACLs further up are never consulted and never
/// merged. If no location on the chain has an ACL the request is denied.
#[derive(Debug, Clone)]
pub struct AclChecker<P> {
    provider: P,
    workspace: String,
}

impl<P: RepositoryProvider> AclChecker<P> {
    pub fn new(provider: P, workspace: impl Into<String>) -> Self {
        Self {
            provider,
            workspace: workspace.into(),
        }
    }

    /// The ACL governing `path`, if any, found by walking towards the root.
    pub async fn effective_acl(
        &self,
        path: &str,
    ) -> Result<Option<Acl>, RepositoryError<P::Error>> {
        for location in path::ancestors(path) {
            if let Some(acl) = self.provider.acl(&self.workspace, location).await? {
                return Ok(Some(acl));
            }
        }
        Ok(None)
    }

    pub async fn has_permission(
        &self,
        user: &User,
        path: &str,
        required: PermissionType,
    ) -> Result<bool, RepositoryError<P::Error>> {
        let granted = match self.effective_acl(path).await? {
            Some(acl) => {
                tracing::trace!(acl = %acl.id, %path, %required, "resolved acl");
                acl.grants(user, required)
            }
            None => false,
        };
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::security::Ace;

    async fn setup() -> AclChecker<MemoryRepository> {
        let repo = MemoryRepository::new();
        repo.create_workspace("default").await.unwrap();
        repo.insert_folder("default", "/public", "admin").await.unwrap();
        repo.insert_folder("default", "/public/drafts", "admin")
            .await
            .unwrap();
        repo.insert_folder("default", "/public/drafts/deep", "admin")
            .await
            .unwrap();

        repo.set_acl(
            "default",
            "/",
            Acl::new("/", "root").with_ace(Ace::group("admins", PermissionType::Admin)),
        )
        .await
        .unwrap();
        repo.set_acl(
            "default",
            "/public",
            Acl::new("/public", "public")
                .with_ace(Ace::group("editors", PermissionType::Write))
                .with_ace(Ace::user("reader", PermissionType::Read)),
        )
        .await
        .unwrap();

        AclChecker::new(repo, "default")
    }

    #[tokio::test]
    async fn test_nearest_acl_wins() {
        let checker = setup().await;
        let admin = User::new("root", vec!["admins".to_string()]);
        let editor = User::new("ed", vec!["editors".to_string()]);

        // Root ACL governs paths outside /public
        assert!(checker
            .has_permission(&admin, "/", PermissionType::Write)
            .await
            .unwrap());
        // /public has its own ACL that does not mention admins
        assert!(!checker
            .has_permission(&admin, "/public/drafts", PermissionType::Write)
            .await
            .unwrap());
        assert!(checker
            .has_permission(&editor, "/public/drafts/deep", PermissionType::Write)
            .await
            .unwrap());
        assert!(!checker
            .has_permission(&editor, "/", PermissionType::Write)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_implied_permissions() {
        let checker = setup().await;
        let editor = User::new("ed", vec!["editors".to_string()]);
        let reader = User::new("reader", vec![]);

        assert!(checker
            .has_permission(&editor, "/public", PermissionType::Read)
            .await
            .unwrap());
        assert!(!checker
            .has_permission(&editor, "/public", PermissionType::Comments)
            .await
            .unwrap());
        assert!(!checker
            .has_permission(&reader, "/public", PermissionType::Write)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_deny_without_any_acl() {
        let repo = MemoryRepository::new();
        repo.create_workspace("default").await.unwrap();
        let checker = AclChecker::new(repo, "default");
        let user = User::new("anyone", vec![]);

        assert!(checker.effective_acl("/").await.unwrap().is_none());
        assert!(!checker
            .has_permission(&user, "/", PermissionType::Read)
            .await
            .unwrap());
    }
}
