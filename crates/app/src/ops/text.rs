use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::op::{ContentOpError, Op, OpContext};

use super::display;

#[derive(Args, Debug, Clone)]
pub struct Create {
    pub id: String,

    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Folder to create the entry in
    #[arg(long, default_value = "/")]
    pub location: String,

    /// Inline HTML body
    #[arg(long, group = "body")]
    pub html: Option<String>,

    /// Read the HTML body from a file
    #[arg(long, group = "body")]
    pub file: Option<PathBuf>,

    #[arg(long, default_value = common::factory::DEFAULT_ENCODING)]
    pub encoding: String,
}

impl Create {
    fn html(&self) -> Result<String, ContentOpError> {
        match (&self.html, &self.file) {
            (Some(html), _) => Ok(html.clone()),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
            (None, None) => Err(ContentOpError::Invalid(
                "either --html or --file must be provided".to_string(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let html = self.html()?;
        let conn = ctx.connect().await?;
        let content = conn
            .service
            .create_text_content(&self.id, &self.locale, &self.location, &html, &self.encoding)
            .await?;
        conn.commit()?;
        Ok(display::content(&content))
    }
}

crate::command_enum! {
    (Create, Create),
}

#[derive(Args, Debug, Clone)]
pub struct Text {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Text {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
