use std::fs::File;
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

    /// File to upload
    #[arg(long)]
    pub file: PathBuf,

    /// MIME type, guessed from the file extension when omitted
    #[arg(long)]
    pub content_type: Option<String>,

    /// Stored file name, defaults to the uploaded file's name
    #[arg(long)]
    pub file_name: Option<String>,
}

impl Create {
    fn content_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file)
                .first_or_octet_stream()
                .to_string()
        })
    }

    fn file_name(&self) -> Result<String, ContentOpError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ContentOpError::Invalid(format!("{} has no file name", self.file.display()))
            })
    }
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = ContentOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let file = File::open(&self.file)?;
        let size = file.metadata()?.len();
        let file_name = self.file_name()?;

        let conn = ctx.connect().await?;
        let content = conn
            .service
            .create_binary_content(
                &self.id,
                &self.locale,
                &self.location,
                &self.content_type(),
                size,
                &file_name,
                file,
            )
            .await?;
        conn.commit()?;
        Ok(display::content(&content))
    }
}

crate::command_enum! {
    (Create, Create),
}

#[derive(Args, Debug, Clone)]
pub struct Binary {
    #[command(subcommand)]
    pub command: Command,
}

#[async_trait::async_trait]
impl Op for Binary {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(file: &str) -> Create {
        Create {
            id: "logo".to_string(),
            locale: "en".to_string(),
            location: "/".to_string(),
            file: PathBuf::from(file),
            content_type: None,
            file_name: None,
        }
    }

    #[test]
    fn test_content_type_is_guessed() {
        assert_eq!(create("/tmp/logo.png").content_type(), "image/png");
        assert_eq!(
            create("/tmp/blob").content_type(),
            "application/octet-stream"
        );

        let mut explicit = create("/tmp/logo.png");
        explicit.content_type = Some("image/x-custom".to_string());
        assert_eq!(explicit.content_type(), "image/x-custom");
    }

    #[test]
    fn test_file_name_defaults_to_path() {
        assert_eq!(create("/tmp/logo.png").file_name().unwrap(), "logo.png");
    }
}
