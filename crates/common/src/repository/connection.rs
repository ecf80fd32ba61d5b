use tracing::{debug, info};

use crate::error::ContentError;
use crate::model::User;
use crate::path;
use crate::security::{Acl, AclChecker, UserDirectory};

use super::provider::{RepositoryError, RepositoryProvider};
use super::SYSTEM_USER;

/// Initial layout of a workspace: folders to create and ACLs to attach.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceBootstrap {
    pub name: String,
    /// Folder paths, created with their parents when missing
    pub folders: Vec<String>,
    /// ACLs keyed by their `id` location
    pub acls: Vec<Acl>,
}

/// A content repository: a storage provider plus the users allowed to log in.
#[derive(Debug, Clone)]
pub struct Repository<P> {
    provider: P,
    users: UserDirectory,
}

impl<P: RepositoryProvider> Repository<P> {
    pub fn new(provider: P, users: UserDirectory) -> Self {
        Self { provider, users }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Open an authenticated session against `workspace`.
    pub async fn login(
        &self,
        workspace: &str,
        username: &str,
        password: &str,
    ) -> Result<Session<P>, ContentError> {
        let user = self.users.authenticate(username, password).ok_or_else(|| {
            tracing::warn!(%username, "authentication failed");
            ContentError::Permission(format!("authentication failed for user {}", username))
        })?;

        if !self
            .provider
            .workspace_exists(workspace)
            .await
            .map_err(ContentError::io)?
        {
            return Err(ContentError::NotFound(format!(
                "workspace {} does not exist",
                workspace
            )));
        }

        debug!(%username, %workspace, "session opened");
        Ok(Session::new(self.provider.clone(), workspace, user))
    }

    /// Create a workspace with its folders and ACLs.
    ///
    /// Runs as the system user and performs no permission checks. Existing
    /// workspaces and folders are left in place, so bootstrapping twice is
    /// harmless; ACLs are replaced.
    pub async fn bootstrap(&self, layout: &WorkspaceBootstrap) -> Result<(), ContentError> {
        let mut folders = Vec::with_capacity(layout.folders.len());
        for folder in &layout.folders {
            let folder = path::normalize_location(folder)?;
            if path::is_reserved(&folder) {
                return Err(ContentError::Validation(format!(
                    "bootstrap folder {} is reserved for categories",
                    folder
                )));
            }
            folders.push(folder);
        }

        match self.provider.create_workspace(&layout.name).await {
            Ok(()) => info!(workspace = %layout.name, "workspace created"),
            Err(RepositoryError::AlreadyExists(_)) => {}
            Err(e) => return Err(ContentError::io(e)),
        }

        for folder in &folders {
            let mut chain: Vec<&str> = path::ancestors(folder).collect();
            chain.reverse();
            for location in chain.into_iter().skip(1) {
                match self
                    .provider
                    .insert_folder(&layout.name, location, SYSTEM_USER)
                    .await
                {
                    Ok(()) | Err(RepositoryError::AlreadyExists(_)) => {}
                    Err(e) => return Err(ContentError::from_mutation(e)),
                }
            }
        }

        for acl in &layout.acls {
            let location = path::normalize_location(&acl.id)?;
            let mut acl = acl.clone();
            acl.id = location.clone();
            self.provider
                .set_acl(&layout.name, &location, acl)
                .await
                .map_err(|e| match e {
                    RepositoryError::NodeNotFound(p) => {
                        ContentError::NotFound(format!("acl location {} does not exist", p))
                    }
                    e => ContentError::from_mutation(e),
                })?;
        }
        Ok(())
    }
}

/// An authenticated connection to one workspace.
///
/// A session belongs to a single caller and is passed explicitly to every
/// command. After [`Session::logout`] every command fails with an i/o error.
#[derive(Debug)]
pub struct Session<P> {
    provider: P,
    workspace: String,
    user: User,
    live: bool,
}

impl<P: RepositoryProvider> Session<P> {
    pub fn new(provider: P, workspace: impl Into<String>, user: User) -> Self {
        Self {
            provider,
            workspace: workspace.into(),
            user,
            live: true,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn logout(&mut self) {
        debug!(user = %self.user, workspace = %self.workspace, "session closed");
        self.live = false;
    }

    pub fn checker(&self) -> AclChecker<P> {
        AclChecker::new(self.provider.clone(), self.workspace.clone())
    }

    /// Fail unless the session is open and its workspace still exists.
    pub async fn check(&self) -> Result<(), ContentError> {
        if !self.live {
            return Err(ContentError::Io("session is closed".to_string()));
        }
        let exists = self
            .provider
            .workspace_exists(&self.workspace)
            .await
            .map_err(ContentError::io)?;
        if !exists {
            return Err(ContentError::Io(format!(
                "workspace {} is not available",
                self.workspace
            )));
        }
        Ok(())
    }
}
