//! Repository path helpers
//!
//! Locations are absolute, `/`-delimited strings rooted at the workspace
//! root. Every path handed to a [`RepositoryProvider`](crate::repository::RepositoryProvider)
//! goes through [`normalize_location`] first so the indexed path map only
//! ever sees one spelling of a location.

/// Path of the workspace root.
pub const ROOT: &str = "/";

/// Reserved subtree holding every category in a workspace.
pub const CATEGORIES_ROOT: &str = "/__categories";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("location '{0}' is not absolute")]
    NotAbsolute(String),
    #[error("location '{0}' contains an empty, '.' or '..' segment")]
    InvalidSegment(String),
    #[error("name '{0}' cannot contain '/'")]
    InvalidName(String),
}

/// Normalize a caller supplied location.
///
/// Strips a trailing `/` (except for the root itself) and rejects relative
/// paths and empty, `.` or `..` segments.
pub fn normalize_location(location: &str) -> Result<String, PathError> {
    if !location.starts_with('/') {
        return Err(PathError::NotAbsolute(location.to_string()));
    }
    let trimmed = location.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(ROOT.to_string());
    }
    for segment in trimmed[1..].split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(PathError::InvalidSegment(location.to_string()));
        }
    }
    Ok(trimmed.to_string())
}

/// Check that an id or locale can be used as a single path segment.
pub fn check_name(name: &str) -> Result<(), PathError> {
    if name.contains('/') || name == "." || name == ".." {
        return Err(PathError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Join a normalized location and a child name.
pub fn join(location: &str, name: &str) -> String {
    if location == ROOT {
        format!("/{}", name)
    } else {
        format!("{}/{}", location, name)
    }
}

/// Parent of a normalized path, `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Last segment of a normalized path, empty for the root.
pub fn name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Iterate from `path` up to the root, yielding `path` first and `/` last.
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors { next: Some(path) }
}

pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = parent(current);
        Some(current)
    }
}

/// Whether `path` is the reserved category root or lives below it.
pub fn is_reserved(path: &str) -> bool {
    path == CATEGORIES_ROOT || path.starts_with(&format!("{}/", CATEGORIES_ROOT))
}

/// Resolve a category location relative to the reserved category root.
///
/// `"/"` and `""` both place a category directly under [`CATEGORIES_ROOT`].
/// The leading slash is optional, so `"sports"` and `"/sports"` name the
/// same category.
pub fn category_location(category_location: &str) -> Result<String, PathError> {
    let relative = category_location.trim_start_matches('/');
    if relative.is_empty() {
        return Ok(CATEGORIES_ROOT.to_string());
    }
    normalize_location(&format!("{}/{}", CATEGORIES_ROOT, relative))
}
