//! Shared test utilities for content service integration tests
#![allow(dead_code)]

use common::prelude::*;

pub const WORKSPACE: &str = "default";

/// Workspace layout used by every test:
///
/// - `/` admins only
/// - `/site` admins, editors (write), commenters (comments), reader (read)
/// - `/private` admins only
/// - `/__categories` admins, editors (read)
pub fn layout() -> WorkspaceBootstrap {
    WorkspaceBootstrap {
        name: WORKSPACE.to_string(),
        folders: vec![
            "/site/news".to_string(),
            "/private".to_string(),
        ],
        acls: vec![
            Acl::new("/", "root").with_ace(Ace::group("admin", PermissionType::Admin)),
            Acl::new("/site", "site")
                .with_ace(Ace::group("admin", PermissionType::Admin))
                .with_ace(Ace::group("editors", PermissionType::Write))
                .with_ace(Ace::group("commenters", PermissionType::Comments))
                .with_ace(Ace::user("reader", PermissionType::Read)),
            Acl::new("/private", "private").with_ace(Ace::group("admin", PermissionType::Admin)),
            Acl::new("/__categories", "categories")
                .with_ace(Ace::group("admin", PermissionType::Admin))
                .with_ace(Ace::group("editors", PermissionType::Read)),
        ],
    }
}

/// Users log in with their username as password.
pub fn users() -> UserDirectory {
    UserDirectory::from_records([
        UserRecord::new("admin", "admin", vec!["admin".to_string()]),
        UserRecord::new("editor", "editor", vec!["editors".to_string()]),
        UserRecord::new("commenter", "commenter", vec!["commenters".to_string()]),
        UserRecord::new("reader", "reader", vec![]),
    ])
    .unwrap()
}

/// Route library logs to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Set up a bootstrapped in-memory repository.
pub async fn setup_test_env() -> Repository<MemoryRepository> {
    init_tracing();
    let repository = Repository::new(MemoryRepository::new(), users());
    repository.bootstrap(&layout()).await.unwrap();
    repository
}

/// Log `username` in and wrap the session in a service.
pub async fn service_for(
    repository: &Repository<MemoryRepository>,
    username: &str,
) -> ContentService<MemoryRepository> {
    let session = repository
        .login(WORKSPACE, username, username)
        .await
        .unwrap();
    ContentService::new(session)
}

/// Whether anything is stored at `path`, checked without a session.
pub async fn node_exists(repository: &Repository<MemoryRepository>, path: &str) -> bool {
    repository.provider().exists(WORKSPACE, path).await.unwrap()
}

/// Whether `path` holds a variant for `locale`, checked without a session.
pub async fn variant_exists(
    repository: &Repository<MemoryRepository>,
    path: &str,
    locale: &str,
) -> bool {
    repository
        .provider()
        .variant_exists(WORKSPACE, path, locale)
        .await
        .unwrap()
}
