use std::{fs, path::PathBuf};

use common::prelude::*;
use common::repository::RepositorySnapshot;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "wcm";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const REPOSITORY_FILE_NAME: &str = "repository.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Workspace used when --workspace is not given
    #[serde(default = "default_workspace")]
    pub default_workspace: String,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceConfig>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_workspace() -> String {
    "default".to_string()
}

impl AppConfig {
    /// A single workspace where the `admin` group holds ADMIN at the root,
    /// and one `admin` user in that group.
    pub fn with_admin(password: &str) -> Self {
        Self {
            log_level: default_log_level(),
            default_workspace: default_workspace(),
            workspaces: vec![WorkspaceConfig {
                name: default_workspace(),
                folders: Vec::new(),
                acls: vec![AclConfig {
                    location: "/".to_string(),
                    description: "root".to_string(),
                    aces: vec![AceConfig {
                        principal: "admin".to_string(),
                        kind: PrincipalKind::Group,
                        permission: PermissionType::Admin,
                    }],
                }],
            }],
            users: vec![UserRecord::new("admin", password, vec!["admin".to_string()])],
        }
    }

    pub fn user_directory(&self) -> Result<UserDirectory, StateError> {
        let users = UserDirectory::from_records(self.users.iter().cloned())
            .map_err(|e| StateError::InvalidConfig(e.to_string()))?;
        if users.is_empty() {
            return Err(StateError::InvalidConfig("no users configured".to_string()));
        }
        tracing::debug!(users = users.len(), "loaded user directory");
        Ok(users)
    }

    pub fn bootstraps(&self) -> Vec<WorkspaceBootstrap> {
        self.workspaces.iter().map(WorkspaceConfig::bootstrap).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    /// Folders created (with their parents) on every start
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub acls: Vec<AclConfig>,
}

impl WorkspaceConfig {
    fn bootstrap(&self) -> WorkspaceBootstrap {
        WorkspaceBootstrap {
            name: self.name.clone(),
            folders: self.folders.clone(),
            acls: self.acls.iter().map(AclConfig::acl).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclConfig {
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aces: Vec<AceConfig>,
}

impl AclConfig {
    fn acl(&self) -> Acl {
        let mut acl = Acl::new(self.location.clone(), self.description.clone());
        for ace in &self.aces {
            acl.push(ace.ace());
        }
        acl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AceConfig {
    pub principal: String,
    pub kind: PrincipalKind,
    pub permission: PermissionType,
}

impl AceConfig {
    fn ace(&self) -> Ace {
        match self.kind {
            PrincipalKind::User => Ace::user(self.principal.clone(), self.permission),
            PrincipalKind::Group => Ace::group(self.principal.clone(), self.permission),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the wcm directory (~/.wcm)
    pub wcm_dir: PathBuf,
    /// Path to the repository snapshot
    pub repository_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the wcm directory path (custom or default ~/.wcm)
    pub fn wcm_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new wcm state directory
    pub fn init(custom_path: Option<PathBuf>, config: AppConfig) -> Result<Self, StateError> {
        let wcm_dir = Self::wcm_dir(custom_path)?;

        if wcm_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&wcm_dir)?;

        // Reject a config that would not load back
        config.user_directory()?;

        let config_path = wcm_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        let state = Self {
            repository_path: wcm_dir.join(REPOSITORY_FILE_NAME),
            wcm_dir,
            config_path,
            config,
        };
        state.save_snapshot(&RepositorySnapshot::default())?;
        Ok(state)
    }

    /// Load existing state from the wcm directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let wcm_dir = Self::wcm_dir(custom_path)?;

        let config_path = wcm_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            repository_path: wcm_dir.join(REPOSITORY_FILE_NAME),
            wcm_dir,
            config_path,
            config,
        })
    }

    /// Read the repository snapshot; a missing file is an empty repository
    pub fn load_snapshot(&self) -> Result<RepositorySnapshot, StateError> {
        if !self.repository_path.exists() {
            return Ok(RepositorySnapshot::default());
        }
        let json = fs::read_to_string(&self.repository_path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Replace the repository snapshot, going through a temporary file
    pub fn save_snapshot(&self, snapshot: &RepositorySnapshot) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.repository_path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.repository_path)?;
        Ok(())
    }

    /// Build the repository from the snapshot. Configured workspaces missing
    /// from the snapshot are bootstrapped; existing ones keep their ACLs.
    pub async fn open_repository(&self) -> Result<Repository<MemoryRepository>, StateError> {
        let provider = MemoryRepository::from_snapshot(self.load_snapshot()?);
        let repository = Repository::new(provider, self.config.user_directory()?);
        for layout in self.config.bootstraps() {
            let exists = repository
                .provider()
                .workspace_exists(&layout.name)
                .await
                .map_err(|e| StateError::Snapshot(e.to_string()))?;
            if !exists {
                tracing::info!(workspace = %layout.name, "bootstrapping workspace");
                repository.bootstrap(&layout).await?;
            }
        }
        Ok(repository)
    }

    pub fn persist(&self, repository: &Repository<MemoryRepository>) -> Result<(), StateError> {
        let snapshot = repository
            .provider()
            .snapshot()
            .map_err(|e| StateError::Snapshot(e.to_string()))?;
        self.save_snapshot(&snapshot)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("wcm directory not initialized. Run 'wcm init' first")]
    NotInitialized,

    #[error("wcm directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("repository snapshot error: {0}")]
    Snapshot(String),

    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] ContentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_load() {
        let dir = TempDir::new().unwrap();
        let path = Some(dir.path().to_path_buf());

        let state = AppState::init(path.clone(), AppConfig::with_admin("secret")).unwrap();
        assert!(state.config_path.exists());
        assert!(state.repository_path.exists());

        let loaded = AppState::load(path.clone()).unwrap();
        assert_eq!(loaded.config, state.config);
        assert_eq!(loaded.config.log_level, "info");

        let users = loaded.config.user_directory().unwrap();
        assert!(users.authenticate("admin", "secret").is_some());
        assert!(users.authenticate("admin", "admin").is_none());

        assert!(matches!(
            AppState::init(path, AppConfig::with_admin("again")),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().to_path_buf())),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_config_defaults_and_acls() {
        let toml = r#"
            [[workspaces]]
            name = "site"
            folders = ["/news"]

            [[workspaces.acls]]
            location = "/news"
            aces = [
                { principal = "editors", kind = "group", permission = "write" },
                { principal = "bob", kind = "user", permission = "read" },
            ]
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_workspace, "default");
        assert!(config.users.is_empty());
        assert!(matches!(
            config.user_directory(),
            Err(StateError::InvalidConfig(_))
        ));

        let layouts = config.bootstraps();
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].folders, vec!["/news".to_string()]);
        let acl = &layouts[0].acls[0];
        assert_eq!(acl.id, "/news");
        assert_eq!(acl.aces[0], Ace::group("editors", PermissionType::Write));
        assert_eq!(acl.aces[1], Ace::user("bob", PermissionType::Read));
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let state =
            AppState::init(Some(dir.path().to_path_buf()), AppConfig::with_admin("pw")).unwrap();

        let repository = state.open_repository().await.unwrap();
        let session = repository.login("default", "admin", "pw").await.unwrap();
        ContentService::new(session)
            .create_folder("news", "/")
            .await
            .unwrap();
        state.persist(&repository).unwrap();

        let reopened = state.open_repository().await.unwrap();
        assert!(reopened.provider().exists("default", "/news").await.unwrap());
    }

    #[tokio::test]
    async fn test_reopen_keeps_changed_acls() {
        let dir = TempDir::new().unwrap();
        let state =
            AppState::init(Some(dir.path().to_path_buf()), AppConfig::with_admin("pw")).unwrap();

        let repository = state.open_repository().await.unwrap();
        let session = repository.login("default", "admin", "pw").await.unwrap();
        ContentService::new(session)
            .set_acl(
                "/",
                "root",
                vec![
                    Ace::group("admin", PermissionType::Admin),
                    Ace::user("guest", PermissionType::Read),
                ],
            )
            .await
            .unwrap();
        state.persist(&repository).unwrap();

        let reopened = state.open_repository().await.unwrap();
        let acl = reopened.provider().acl("default", "/").await.unwrap().unwrap();
        assert_eq!(acl.aces.len(), 2);
    }
}
