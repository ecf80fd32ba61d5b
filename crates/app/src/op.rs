use std::error::Error;
use std::path::PathBuf;

use common::prelude::*;

use crate::state::{AppState, StateError};

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Optional custom config path (defaults to ~/.wcm)
    pub config_path: Option<PathBuf>,
    /// Workspace override, falls back to the configured default
    pub workspace: Option<String>,
    pub user: String,
    pub password: Option<String>,
}

impl OpContext {
    pub fn new(
        config_path: Option<PathBuf>,
        workspace: Option<String>,
        user: String,
        password: Option<String>,
    ) -> Self {
        Self {
            config_path,
            workspace,
            user,
            password,
        }
    }

    /// Load state, open the repository and log in as the configured user.
    pub async fn connect(&self) -> Result<Connection, SessionError> {
        let state = AppState::load(self.config_path.clone())?;
        let password = self
            .password
            .as_deref()
            .ok_or(SessionError::MissingPassword)?;
        let workspace = self
            .workspace
            .clone()
            .unwrap_or_else(|| state.config.default_workspace.clone());

        let repository = state.open_repository().await?;
        let session = repository.login(&workspace, &self.user, password).await?;
        tracing::debug!(user = %self.user, %workspace, "connected");

        Ok(Connection {
            state,
            service: ContentService::new(session),
            repository,
        })
    }
}

/// An open session plus what is needed to persist its changes.
pub struct Connection {
    pub state: AppState,
    pub repository: Repository<MemoryRepository>,
    pub service: ContentService<MemoryRepository>,
}

impl Connection {
    /// Write the repository back to the snapshot file.
    pub fn commit(&self) -> Result<(), StateError> {
        self.state.persist(&self.repository)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("no password given, use --password or WCM_PASSWORD")]
    MissingPassword,
}

/// Error shared by the ops that run a content command.
#[derive(Debug, thiserror::Error)]
pub enum ContentOpError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("failed to save repository: {0}")]
    State(#[from] StateError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Invalid(String),
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
