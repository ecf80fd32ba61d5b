use clap::{Args, Subcommand};

use crate::op::{ContentOpError, Op, OpContext};

use super::display;

#[derive(Args, Debug, Clone)]
pub struct Create {
    pub id: String,

    #[arg(long, default_value = "en")]
    pub locale: String,

    #[arg(long)]
    pub description: String,

    /// Parent category, relative to the category root
    #[arg(long, default_value = "/")]
    pub parent: String,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let category = conn
            .service
            .create_category(&self.id, &self.locale, &self.description, &self.parent)
            .await?;
        conn.commit()?;
        Ok(display::category(&category))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Get {
    /// Category path relative to the category root, e.g. /sports/football
    pub path: String,

    #[arg(long, default_value = "en")]
    pub locale: String,
}

#[async_trait::async_trait]
impl Op for Get {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let conn = ctx.connect().await?;
        let category = conn.service.get_category(&self.path, &self.locale).await?;
        Ok(display::category(&category))
    }
}

crate::command_enum! {
    (Create, Create),
    (Get, Get),
}

#[derive(Args, Debug, Clone)]
pub struct Category {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Category {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
