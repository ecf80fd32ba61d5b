//! Integration tests for repository faults surfacing through the service

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use ::common::prelude::*;
use ::common::repository::{
    MemoryRepositoryError, Node, NodeKind, RawComment, RepositoryError, Variant,
};

type Result<T> = std::result::Result<T, RepositoryError<MemoryRepositoryError>>;

/// Wraps the memory repository and injects faults into it.
#[derive(Debug, Clone, Default)]
struct FaultyRepository {
    inner: MemoryRepository,
    /// Every mutation fails with a provider error while set
    fail_writes: Arc<AtomicBool>,
    /// Reads report nothing at this path, as if another session had
    ///  not yet committed it
    hidden: Option<String>,
}

impl FaultyRepository {
    fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Provider(MemoryRepositoryError::Internal(
                "injected write failure".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryProvider for FaultyRepository {
    type Error = MemoryRepositoryError;

    async fn create_workspace(&self, workspace: &str) -> Result<()> {
        self.inner.create_workspace(workspace).await
    }

    async fn workspace_exists(&self, workspace: &str) -> Result<bool> {
        self.inner.workspace_exists(workspace).await
    }

    async fn node(&self, workspace: &str, path: &str) -> Result<Option<Node>> {
        if self.hidden.as_deref() == Some(path) {
            return Ok(None);
        }
        self.inner.node(workspace, path).await
    }

    async fn children(&self, workspace: &str, path: &str) -> Result<Vec<Node>> {
        self.inner.children(workspace, path).await
    }

    async fn insert_folder(&self, workspace: &str, path: &str, author: &str) -> Result<()> {
        self.check_write()?;
        self.inner.insert_folder(workspace, path, author).await
    }

    async fn insert_variant(
        &self,
        workspace: &str,
        path: &str,
        kind: NodeKind,
        locale: &str,
        variant: Variant,
    ) -> Result<()> {
        self.check_write()?;
        self.inner
            .insert_variant(workspace, path, kind, locale, variant)
            .await
    }

    async fn append_comment(
        &self,
        workspace: &str,
        path: &str,
        locale: Option<&str>,
        comment: RawComment,
    ) -> Result<()> {
        self.check_write()?;
        self.inner
            .append_comment(workspace, path, locale, comment)
            .await
    }

    async fn add_category_ref(
        &self,
        workspace: &str,
        path: &str,
        locale: &str,
        category_path: &str,
    ) -> Result<()> {
        self.check_write()?;
        self.inner
            .add_category_ref(workspace, path, locale, category_path)
            .await
    }

    async fn acl(&self, workspace: &str, path: &str) -> Result<Option<Acl>> {
        self.inner.acl(workspace, path).await
    }

    async fn set_acl(&self, workspace: &str, path: &str, acl: Acl) -> Result<()> {
        self.check_write()?;
        self.inner.set_acl(workspace, path, acl).await
    }
}

async fn setup(provider: FaultyRepository) -> ContentService<FaultyRepository> {
    let repository = Repository::new(provider, common::users());
    repository.bootstrap(&common::layout()).await.unwrap();
    let session = repository
        .login(common::WORKSPACE, "admin", "admin")
        .await
        .unwrap();
    ContentService::new(session)
}

#[tokio::test]
async fn test_write_failure_is_io() {
    let provider = FaultyRepository::default();
    let service = setup(provider.clone()).await;
    provider.fail_writes(true);

    let err = service
        .create_text_content("post", "en", "/site", "hello", "UTF8")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);
    assert!(err.is_retryable());

    let err = service
        .create_binary_content(
            "logo",
            "en",
            "/site",
            "image/png",
            3,
            "logo.png",
            &b"png"[..],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);

    let err = service.create_folder("dir", "/site").await.unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);

    let err = service
        .create_category("tags", "en", "Tags", "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);

    let err = service
        .create_content_comment("/site", "en", "hello")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);

    // Nothing was written
    assert!(!provider.inner.exists(common::WORKSPACE, "/site/post").await.unwrap());
    assert!(!provider.inner.exists(common::WORKSPACE, "/site/logo").await.unwrap());
    assert!(!provider.inner.exists(common::WORKSPACE, "/site/dir").await.unwrap());

    provider.fail_writes(false);
    service
        .create_text_content("post", "en", "/site", "hello", "UTF8")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_failed_comment_leaves_content_untouched() {
    let provider = FaultyRepository::default();
    let service = setup(provider.clone()).await;

    service
        .create_text_content("post", "en", "/site", "hello", "UTF8")
        .await
        .unwrap();
    service
        .create_content_comment("/site/post", "en", "one")
        .await
        .unwrap();

    provider.fail_writes(true);
    let err = service
        .create_content_comment("/site/post", "en", "two")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Io);

    let content = service.get_content("/site/post", "en").await.unwrap();
    assert_eq!(content.comments.len(), 1);
    assert_eq!(content.html(), Some("hello"));
}

#[tokio::test]
async fn test_lost_race_is_conflict() {
    let provider = FaultyRepository {
        hidden: Some("/site/post".to_string()),
        ..Default::default()
    };
    let service = setup(provider.clone()).await;

    // Another session commits the tuple behind the existence check
    provider
        .inner
        .insert_variant(
            common::WORKSPACE,
            "/site/post",
            NodeKind::Text,
            "en",
            Variant::new("editor", Default::default()),
        )
        .await
        .unwrap();

    let err = service
        .create_text_content("post", "en", "/site", "mine", "UTF8")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Conflict);

    let err = service.create_folder("post", "/site").await.unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Conflict);

    let err = service
        .create_binary_content(
            "post",
            "en",
            "/site",
            "text/plain",
            4,
            "post.txt",
            &b"post"[..],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ContentErrorKind::Conflict);
}
