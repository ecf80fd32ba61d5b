//! Plain text rendering of service results for the terminal

use std::fmt::Write;

use common::prelude::{Category, Content, ContentBody};

pub fn content(content: &Content) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} {}", content.kind(), content.path());
    if let Some(locale) = &content.locale {
        let _ = write!(out, " [{}]", locale);
    }
    let _ = writeln!(out, " v{}", content.version);
    let _ = writeln!(
        out,
        "  created {} by {}, modified {} by {}",
        content.created.to_rfc3339(),
        content.created_by,
        content.modified.to_rfc3339(),
        content.modified_by
    );

    match &content.body {
        ContentBody::Text { html, encoding } => {
            let _ = writeln!(out, "  encoding: {}", encoding);
            let _ = writeln!(out, "  html: {}", html);
        }
        ContentBody::Binary {
            content_type,
            file_name,
            size,
            ..
        } => {
            let _ = writeln!(out, "  file: {} ({}, {} bytes)", file_name, content_type, size);
        }
        ContentBody::Folder { children } => {
            let _ = writeln!(out, "  children: {}", children.join(", "));
        }
    }

    if !content.categories.is_empty() {
        let paths: Vec<String> = content.categories.iter().map(Category::path).collect();
        let _ = writeln!(out, "  categories: {}", paths.join(", "));
    }
    for comment in &content.comments {
        let _ = writeln!(
            out,
            "  #{} {} {}: {}",
            comment.id,
            comment.created.to_rfc3339(),
            comment.created_by,
            comment.comment
        );
    }
    out.trim_end().to_string()
}

pub fn category(category: &Category) -> String {
    format!(
        "category {} [{}]: {}",
        category.path(),
        category.locale,
        category.description
    )
}
