use clap::{Args, Subcommand};

use crate::op::{ContentOpError, Op, OpContext};

use super::display;

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// Full path of the commented entry
    pub location: String,

    pub comment: String,

    #[arg(long, default_value = "en")]
    pub locale: String,
}

#[async_trait::async_trait]
impl Op for Add {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let content = conn
            .service
            .create_content_comment(&self.location, &self.locale, &self.comment)
            .await?;
        conn.commit()?;
        Ok(display::content(&content))
    }
}

crate::command_enum! {
    (Add, Add),
}

#[derive(Args, Debug, Clone)]
pub struct Comment {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Comment {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
