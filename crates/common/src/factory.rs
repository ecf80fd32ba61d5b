//! Mapping from raw repository nodes to domain objects
//!
//! The factory never talks to the repository and never checks permissions.
//! Callers fetch the nodes they need and hand them over; the factory only
//! reshapes them. Optional state that is absent on a node maps to a default:
//! no comments is an empty list, a missing encoding is [`DEFAULT_ENCODING`],
//! a dangling category reference is dropped.

use bytes::Bytes;

use crate::model::{Category, Comment, Content, ContentBody};
use crate::path::{self, CATEGORIES_ROOT, ROOT};
use crate::repository::{props, Node, NodeKind, RawComment, Variant};

pub const DEFAULT_ENCODING: &str = "UTF8";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    #[error("node {0} is a {1}, expected {2}")]
    UnexpectedKind(String, NodeKind, &'static str),
    #[error("node {0} has no variant for locale {1}")]
    MissingLocale(String, String),
    #[error("node {0} needs a locale")]
    LocaleRequired(String),
    #[error("property {1} of node {0} has an unexpected type")]
    PropertyType(String, &'static str),
}

pub struct ContentFactory;

impl ContentFactory {
    /// Build the content stored at `node`.
    ///
    /// `locale` selects the variant of text and binary nodes and is ignored
    /// for folders. `children` are the node's direct children (only used for
    /// folders) and `categories` must hold the category nodes referenced by
    /// the selected variant.
    pub fn content(
        node: &Node,
        locale: Option<&str>,
        children: &[Node],
        categories: &[Node],
    ) -> Result<Content, FactoryError> {
        let location = path::parent(&node.path).unwrap_or(ROOT).to_string();
        match node.kind {
            NodeKind::Root | NodeKind::Folder => Ok(Self::folder(node, location, children)),
            NodeKind::Text | NodeKind::Binary => {
                let locale = locale.ok_or_else(|| FactoryError::LocaleRequired(node.path.clone()))?;
                let variant = node.variant(locale).ok_or_else(|| {
                    FactoryError::MissingLocale(node.path.clone(), locale.to_string())
                })?;
                let body = if node.kind == NodeKind::Text {
                    Self::text_body(node, variant)?
                } else {
                    Self::binary_body(node, variant)?
                };
                Ok(Content {
                    id: node.id().to_string(),
                    locale: Some(locale.to_string()),
                    location,
                    body,
                    version: variant.version,
                    created: variant.created,
                    created_by: variant.created_by.clone(),
                    modified: variant.modified,
                    modified_by: variant.modified_by.clone(),
                    comments: Self::comments(&variant.comments),
                    categories: Self::referenced_categories(variant, locale, categories),
                })
            }
            NodeKind::Category => Err(FactoryError::UnexpectedKind(
                node.path.clone(),
                node.kind,
                "content",
            )),
        }
    }

    /// Build the category stored at `node` in `locale`.
    pub fn category(node: &Node, locale: &str) -> Result<Category, FactoryError> {
        if node.kind != NodeKind::Category {
            return Err(FactoryError::UnexpectedKind(
                node.path.clone(),
                node.kind,
                "category",
            ));
        }
        let variant = node
            .variant(locale)
            .ok_or_else(|| FactoryError::MissingLocale(node.path.clone(), locale.to_string()))?;
        let description = string_prop(node, variant, props::DESCRIPTION)?.unwrap_or_default();

        Ok(Category {
            id: node.id().to_string(),
            locale: locale.to_string(),
            location: category_parent(&node.path),
            description: description.to_string(),
        })
    }

    pub fn comments(raw: &[RawComment]) -> Vec<Comment> {
        raw.iter()
            .enumerate()
            .map(|(id, c)| Comment {
                id,
                created_by: c.author.clone(),
                created: c.created,
                comment: c.text.clone(),
            })
            .collect()
    }

    fn folder(node: &Node, location: String, children: &[Node]) -> Content {
        let children = children
            .iter()
            .filter(|child| !path::is_reserved(&child.path))
            .map(|child| child.id().to_string())
            .collect();
        Content {
            id: node.id().to_string(),
            locale: None,
            location,
            body: ContentBody::Folder { children },
            version: 1,
            created: node.created,
            created_by: node.created_by.clone(),
            modified: node.created,
            modified_by: node.created_by.clone(),
            comments: Self::comments(&node.comments),
            categories: Vec::new(),
        }
    }

    fn text_body(node: &Node, variant: &Variant) -> Result<ContentBody, FactoryError> {
        let html = string_prop(node, variant, props::HTML)?.unwrap_or_default();
        let encoding = string_prop(node, variant, props::ENCODING)?.unwrap_or(DEFAULT_ENCODING);
        Ok(ContentBody::Text {
            html: html.to_string(),
            encoding: encoding.to_string(),
        })
    }

    fn binary_body(node: &Node, variant: &Variant) -> Result<ContentBody, FactoryError> {
        let data = match variant.property(props::DATA) {
            Some(value) => value
                .as_binary()
                .map(Bytes::copy_from_slice)
                .ok_or_else(|| FactoryError::PropertyType(node.path.clone(), props::DATA))?,
            None => Bytes::new(),
        };
        let size = match variant.property(props::SIZE) {
            Some(value) => value
                .as_long()
                .ok_or_else(|| FactoryError::PropertyType(node.path.clone(), props::SIZE))?,
            None => data.len() as u64,
        };
        let content_type =
            string_prop(node, variant, props::CONTENT_TYPE)?.unwrap_or(DEFAULT_CONTENT_TYPE);
        let file_name = string_prop(node, variant, props::FILE_NAME)?.unwrap_or(node.id());

        Ok(ContentBody::Binary {
            content_type: content_type.to_string(),
            file_name: file_name.to_string(),
            size,
            data,
        })
    }

    fn referenced_categories(variant: &Variant, locale: &str, nodes: &[Node]) -> Vec<Category> {
        variant
            .categories
            .iter()
            .filter_map(|reference| nodes.iter().find(|n| n.path == *reference))
            .filter_map(|node| {
                // Prefer the content's locale, fall back to any translation
                let locale = if node.has_locale(locale) {
                    locale
                } else {
                    node.variants.keys().next()?.as_str()
                };
                Self::category(node, locale).ok()
            })
            .collect()
    }
}

fn string_prop<'a>(
    node: &Node,
    variant: &'a Variant,
    name: &'static str,
) -> Result<Option<&'a str>, FactoryError> {
    match variant.property(name) {
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| FactoryError::PropertyType(node.path.clone(), name)),
        None => Ok(None),
    }
}

/// Parent of a category path, relative to the category root.
fn category_parent(category_path: &str) -> String {
    let parent = path::parent(category_path).unwrap_or(CATEGORIES_ROOT);
    match parent.strip_prefix(CATEGORIES_ROOT) {
        Some("") | None => ROOT.to_string(),
        Some(relative) => relative.to_string(),
    }
}
