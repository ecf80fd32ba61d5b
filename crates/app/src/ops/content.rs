use clap::{Args, Subcommand};

use crate::op::{ContentOpError, Op, OpContext};

use super::display;

#[derive(Args, Debug, Clone)]
pub struct Get {
    /// Full path of the entry
    pub location: String,

    #[arg(long, default_value = "en")]
    pub locale: String,
}

#[async_trait::async_trait]
impl Op for Get {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let content = conn.service.get_content(&self.location, &self.locale).await?;
        Ok(display::content(&content))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Categorize {
    /// Full path of the entry
    pub location: String,

    /// Category path relative to the category root
    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "en")]
    pub locale: String,
}

#[async_trait::async_trait]
impl Op for Categorize {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let content = conn
            .service
            .add_content_category(&self.location, &self.locale, &self.category)
            .await?;
        conn.commit()?;
        Ok(display::content(&content))
    }
}

crate::command_enum! {
    (Get, Get),
    (Categorize, Categorize),
}

#[derive(Args, Debug, Clone)]
pub struct Content {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Content {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
