use clap::{Args, Subcommand};

use crate::op::{ContentOpError, Op, OpContext};

use super::display;

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Name of the new folder
    pub id: String,

    /// Folder to create it in
    #[arg(long, default_value = "/")]
    pub location: String,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let folder = conn.service.create_folder(&self.id, &self.location).await?;
        conn.commit()?;
        Ok(display::content(&folder))
    }
}

crate::command_enum! {
    (Create, Create),
}

#[derive(Args, Debug, Clone)]
pub struct Folder {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Folder {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
