//! Service facade over the content commands
//!
//! [`ContentService`] owns one [`Session`] and exposes each command as a
//! method taking plain parameters, which is the surface web and CLI callers
//! use. Callers that want to build commands themselves can go through
//! [`ContentService::execute`].

use std::io::Read;

use bytes::Bytes;

use crate::commands::{
    AddContentCategory, Command, CreateBinaryContent, CreateCategory, CreateContentComment,
    CreateFolder, CreateTextContent, GetCategory, GetContent, SetAcl,
};
use crate::error::ContentError;
use crate::model::{Category, Content, User};
use crate::repository::{RepositoryProvider, Session};
use crate::security::{Ace, Acl};

#[derive(Debug)]
pub struct ContentService<P> {
    session: Session<P>,
}

impl<P: RepositoryProvider> ContentService<P> {
    pub fn new(session: Session<P>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    pub fn user(&self) -> &User {
        self.session.user()
    }

    /// Close the underlying session. Every later call fails with an i/o error.
    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub async fn execute<C: Command<P>>(&self, command: C) -> Result<C::Output, ContentError> {
        command.execute(&self.session).await
    }

    /// Create a text entry. Fails with `Conflict` if `(location, id, locale)`
    ///  is already taken; there is no implicit update.
    pub async fn create_text_content(
        &self,
        id: &str,
        locale: &str,
        location: &str,
        html: &str,
        encoding: &str,
    ) -> Result<Content, ContentError> {
        self.execute(CreateTextContent {
            id: id.to_string(),
            locale: locale.to_string(),
            location: location.to_string(),
            html: html.to_string(),
            encoding: encoding.to_string(),
        })
        .await
    }

    /// Create a binary entry from `content`. Parameters are validated before
    /// the stream is read to the end.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_binary_content<R>(
        &self,
        id: &str,
        locale: &str,
        location: &str,
        content_type: &str,
        size: u64,
        file_name: &str,
        mut content: R,
    ) -> Result<Content, ContentError>
    where
        R: Read + Send,
    {
        let mut command = CreateBinaryContent {
            id: id.to_string(),
            locale: locale.to_string(),
            location: location.to_string(),
            content_type: content_type.to_string(),
            size,
            file_name: file_name.to_string(),
            data: Bytes::new(),
        };
        command.validate()?;

        let mut buf = Vec::new();
        content
            .read_to_end(&mut buf)
            .map_err(|e| ContentError::Io(format!("cannot read content stream: {}", e)))?;
        command.data = Bytes::from(buf);

        self.execute(command).await
    }

    pub async fn create_folder(&self, id: &str, location: &str) -> Result<Content, ContentError> {
        self.execute(CreateFolder {
            id: id.to_string(),
            location: location.to_string(),
        })
        .await
    }

    pub async fn create_category(
        &self,
        id: &str,
        locale: &str,
        description: &str,
        category_location: &str,
    ) -> Result<Category, ContentError> {
        self.execute(CreateCategory {
            id: id.to_string(),
            locale: locale.to_string(),
            description: description.to_string(),
            category_location: category_location.to_string(),
        })
        .await
    }

    pub async fn create_content_comment(
        &self,
        location: &str,
        locale: &str,
        comment: &str,
    ) -> Result<Content, ContentError> {
        self.execute(CreateContentComment {
            location: location.to_string(),
            locale: locale.to_string(),
            comment: comment.to_string(),
        })
        .await
    }

    pub async fn get_content(&self, location: &str, locale: &str) -> Result<Content, ContentError> {
        self.execute(GetContent {
            location: location.to_string(),
            locale: locale.to_string(),
        })
        .await
    }

    pub async fn get_category(
        &self,
        category_path: &str,
        locale: &str,
    ) -> Result<Category, ContentError> {
        self.execute(GetCategory {
            category_path: category_path.to_string(),
            locale: locale.to_string(),
        })
        .await
    }

    pub async fn add_content_category(
        &self,
        location: &str,
        locale: &str,
        category_location: &str,
    ) -> Result<Content, ContentError> {
        self.execute(AddContentCategory {
            location: location.to_string(),
            locale: locale.to_string(),
            category_location: category_location.to_string(),
        })
        .await
    }

    pub async fn set_acl(
        &self,
        location: &str,
        description: &str,
        aces: Vec<Ace>,
    ) -> Result<Acl, ContentError> {
        self.execute(SetAcl {
            location: location.to_string(),
            description: description.to_string(),
            aces,
        })
        .await
    }
}
