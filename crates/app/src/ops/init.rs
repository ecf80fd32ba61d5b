use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Password of the initial admin user (defaults to --password / WCM_PASSWORD)
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Name of the default workspace
    #[arg(long, default_value = "default")]
    pub workspace_name: String,

    /// Default log level written to the config
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
    #[error("no admin password given, use --admin-password or --password")]
    MissingPassword,
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let password = self
            .admin_password
            .as_deref()
            .or(ctx.password.as_deref())
            .ok_or(InitError::MissingPassword)?;

        let mut config = AppConfig::with_admin(password);
        config.log_level = self.log_level.clone();
        config.default_workspace = self.workspace_name.clone();
        for workspace in &mut config.workspaces {
            workspace.name = self.workspace_name.clone();
        }

        let state = AppState::init(ctx.config_path.clone(), config)?;
        let repository = state.open_repository().await?;
        state.persist(&repository)?;

        Ok(format!(
            "Initialized wcm directory at: {}\n\
             - Config: {}\n\
             - Repository: {}\n\
             - Workspace: {}\n\
             - Admin user: admin",
            state.wcm_dir.display(),
            state.config_path.display(),
            state.repository_path.display(),
            state.config.default_workspace,
        ))
    }
}
