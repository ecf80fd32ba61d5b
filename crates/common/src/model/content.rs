use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Comment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Binary,
    Folder,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Text => write!(f, "text"),
            ContentKind::Binary => write!(f, "binary"),
            ContentKind::Folder => write!(f, "folder"),
        }
    }
}

/// Payload of a content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentBody {
    Text {
        html: String,
        encoding: String,
    },
    Binary {
        content_type: String,
        file_name: String,
        size: u64,
        #[serde(skip)]
        data: bytes::Bytes,
    },
    Folder {
        /// Ids of the direct children, in path order.
        children: Vec<String>,
    },
}

/// A content entry as seen by callers.
///
/// Folders carry no locale. Text and binary entries are identified by
/// `(location, id, locale)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub locale: Option<String>,
    pub location: String,
    pub body: ContentBody,
    pub version: u64,
    pub created: DateTime<Utc>,
    pub created_by: String,
    pub modified: DateTime<Utc>,
    pub modified_by: String,
    pub comments: Vec<Comment>,
    pub categories: Vec<Category>,
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self.body {
            ContentBody::Text { .. } => ContentKind::Text,
            ContentBody::Binary { .. } => ContentKind::Binary,
            ContentBody::Folder { .. } => ContentKind::Folder,
        }
    }

    /// Full path of the entry.
    pub fn path(&self) -> String {
        crate::path::join(&self.location, &self.id)
    }

    pub fn html(&self) -> Option<&str> {
        match &self.body {
            ContentBody::Text { html, .. } => Some(html),
            _ => None,
        }
    }

    pub fn encoding(&self) -> Option<&str> {
        match &self.body {
            ContentBody::Text { encoding, .. } => Some(encoding),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.body {
            ContentBody::Binary { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Comments authored by `username`, in insertion order.
    pub fn comments_by<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a Comment> {
        self.comments
            .iter()
            .filter(move |c| c.created_by.username == username)
    }
}
