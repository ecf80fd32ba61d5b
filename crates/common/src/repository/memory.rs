use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::node::{Node, NodeKind, RawComment, Variant};
use super::provider::{RepositoryError, RepositoryProvider};
use crate::path::{self, CATEGORIES_ROOT, ROOT};
use crate::security::Acl;

/// Author recorded on nodes created by the repository itself.
pub const SYSTEM_USER: &str = "system";

/// In-memory repository provider keyed by path
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    inner: Arc<RwLock<MemoryRepositoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryRepositoryInner {
    workspaces: HashMap<String, Workspace>,
}

/// One workspace: the node index and the ACLs attached to its paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    /// path -> node, ordered so a subtree is a contiguous range
    nodes: BTreeMap<String, Node>,
    /// path -> ACL attached directly to that path
    acls: HashMap<String, Acl>,
}

impl Workspace {
    fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT.to_string(), Node::new(ROOT, NodeKind::Root, SYSTEM_USER));
        nodes.insert(
            CATEGORIES_ROOT.to_string(),
            Node::new(CATEGORIES_ROOT, NodeKind::Root, SYSTEM_USER),
        );
        Self {
            nodes,
            acls: HashMap::new(),
        }
    }

    fn check_parent(&self, node_path: &str) -> Result<()> {
        let parent = path::parent(node_path)
            .ok_or_else(|| RepositoryError::AlreadyExists(node_path.to_string()))?;
        match self.nodes.get(parent) {
            Some(node) if node.kind.is_container() => Ok(()),
            Some(node) => Err(RepositoryError::KindMismatch(
                parent.to_string(),
                node.kind,
                NodeKind::Folder,
            )),
            None => Err(RepositoryError::ParentNotFound(parent.to_string())),
        }
    }

    fn node_mut(&mut self, node_path: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(node_path)
            .ok_or_else(|| RepositoryError::NodeNotFound(node_path.to_string()))
    }
}

/// Serializable copy of every workspace, used to persist the repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub workspaces: HashMap<String, Workspace>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryRepositoryError {
    #[error("memory repository error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, RepositoryError<MemoryRepositoryError>>;

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryRepositoryInner::default())),
        }
    }

    /// Rebuild a repository from a snapshot
    pub fn from_snapshot(snapshot: RepositorySnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryRepositoryInner {
                workspaces: snapshot.workspaces,
            })),
        }
    }

    /// Copy out the current state of every workspace
    pub fn snapshot(&self) -> Result<RepositorySnapshot> {
        let inner = self.read()?;
        Ok(RepositorySnapshot {
            workspaces: inner.workspaces.clone(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryRepositoryInner>> {
        self.inner.read().map_err(|e| {
            RepositoryError::Provider(MemoryRepositoryError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryRepositoryInner>> {
        self.inner.write().map_err(|e| {
            RepositoryError::Provider(MemoryRepositoryError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepositoryInner {
    fn workspace(&self, name: &str) -> Result<&Workspace> {
        self.workspaces
            .get(name)
            .ok_or_else(|| RepositoryError::WorkspaceNotFound(name.to_string()))
    }

    fn workspace_mut(&mut self, name: &str) -> Result<&mut Workspace> {
        self.workspaces
            .get_mut(name)
            .ok_or_else(|| RepositoryError::WorkspaceNotFound(name.to_string()))
    }
}

#[async_trait]
impl RepositoryProvider for MemoryRepository {
    type Error = MemoryRepositoryError;

    async fn create_workspace(&self, workspace: &str) -> Result<()> {
        let mut inner = self.write()?;
        if inner.workspaces.contains_key(workspace) {
            return Err(RepositoryError::AlreadyExists(workspace.to_string()));
        }
        inner
            .workspaces
            .insert(workspace.to_string(), Workspace::new());
        Ok(())
    }

    async fn workspace_exists(&self, workspace: &str) -> Result<bool> {
        let inner = self.read()?;
        Ok(inner.workspaces.contains_key(workspace))
    }

    async fn node(&self, workspace: &str, path: &str) -> Result<Option<Node>> {
        let inner = self.read()?;
        Ok(inner.workspace(workspace)?.nodes.get(path).cloned())
    }

    async fn children(&self, workspace: &str, path: &str) -> Result<Vec<Node>> {
        let inner = self.read()?;
        let ws = inner.workspace(workspace)?;
        if !ws.nodes.contains_key(path) {
            return Err(RepositoryError::NodeNotFound(path.to_string()));
        }

        // Everything below `path` sorts directly after `prefix`
        let prefix = if path == ROOT {
            ROOT.to_string()
        } else {
            format!("{}/", path)
        };
        Ok(ws
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| key.as_str() != path && path::parent(key) == Some(path))
            .map(|(_, node)| node.clone())
            .collect())
    }

    async fn insert_folder(&self, workspace: &str, path: &str, author: &str) -> Result<()> {
        let mut inner = self.write()?;
        let ws = inner.workspace_mut(workspace)?;
        if ws.nodes.contains_key(path) {
            return Err(RepositoryError::AlreadyExists(path.to_string()));
        }
        ws.check_parent(path)?;
        ws.nodes
            .insert(path.to_string(), Node::new(path, NodeKind::Folder, author));
        Ok(())
    }

    async fn insert_variant(
        &self,
        workspace: &str,
        path: &str,
        kind: NodeKind,
        locale: &str,
        variant: Variant,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let ws = inner.workspace_mut(workspace)?;

        match ws.nodes.get_mut(path) {
            Some(node) if node.kind != kind => Err(RepositoryError::KindMismatch(
                path.to_string(),
                node.kind,
                kind,
            )),
            Some(node) if node.has_locale(locale) => Err(RepositoryError::AlreadyExists(format!(
                "{} [{}]",
                path, locale
            ))),
            Some(node) => {
                node.variants.insert(locale.to_string(), variant);
                Ok(())
            }
            None => {
                ws.check_parent(path)?;
                let mut node = Node::new(path, kind, &variant.created_by);
                node.variants.insert(locale.to_string(), variant);
                ws.nodes.insert(path.to_string(), node);
                Ok(())
            }
        }
    }

    async fn append_comment(
        &self,
        workspace: &str,
        path: &str,
        locale: Option<&str>,
        comment: RawComment,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let node = inner.workspace_mut(workspace)?.node_mut(path)?;
        match locale {
            Some(locale) => {
                let variant = node.variant_mut(locale).ok_or_else(|| {
                    RepositoryError::LocaleNotFound(path.to_string(), locale.to_string())
                })?;
                variant.comments.push(comment);
            }
            None => node.comments.push(comment),
        }
        Ok(())
    }

    async fn add_category_ref(
        &self,
        workspace: &str,
        path: &str,
        locale: &str,
        category_path: &str,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let ws = inner.workspace_mut(workspace)?;
        match ws.nodes.get(category_path) {
            Some(node) if node.kind == NodeKind::Category => {}
            Some(node) => {
                return Err(RepositoryError::KindMismatch(
                    category_path.to_string(),
                    node.kind,
                    NodeKind::Category,
                ))
            }
            None => return Err(RepositoryError::NodeNotFound(category_path.to_string())),
        }

        let variant = ws
            .node_mut(path)?
            .variant_mut(locale)
            .ok_or_else(|| RepositoryError::LocaleNotFound(path.to_string(), locale.to_string()))?;
        if !variant.categories.iter().any(|c| c == category_path) {
            variant.categories.push(category_path.to_string());
            variant.modified = Utc::now();
        }
        Ok(())
    }

    async fn acl(&self, workspace: &str, path: &str) -> Result<Option<Acl>> {
        let inner = self.read()?;
        Ok(inner.workspace(workspace)?.acls.get(path).cloned())
    }

    async fn set_acl(&self, workspace: &str, path: &str, acl: Acl) -> Result<()> {
        let mut inner = self.write()?;
        let ws = inner.workspace_mut(workspace)?;
        if !ws.nodes.contains_key(path) {
            return Err(RepositoryError::NodeNotFound(path.to_string()));
        }
        ws.acls.insert(path.to_string(), acl);
        Ok(())
    }
}
