//! # Access control lists
//!
//! An [`Acl`] is attached to a single location and holds an ordered list of
//! [`Ace`]s. Each entry grants one [`PermissionType`] to a [`Principal`],
//! which is either a single user or a named group.
//!
//! ## Inheritance
//!
//! ACLs are not merged across levels. A location is governed by the ACL
//! attached closest to it on the way up to the root; see
//! [`AclChecker`](super::AclChecker).

use serde::{Deserialize, Serialize};

use crate::model::User;

/// Permission granted by an access control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    /// Read content and categories.
    Read,
    /// Create content and folders.
    Write,
    /// Append comments to content.
    Comments,
    /// Everything, including category management and ACL changes.
    Admin,
}

impl PermissionType {
    /// Whether holding `self` is enough to satisfy `required`.
    ///
    /// `Admin` implies every permission. `Write` and `Comments` each imply
    /// `Read`. Nothing else is implied.
    pub fn implies(self, required: PermissionType) -> bool {
        match (self, required) {
            (a, b) if a == b => true,
            (PermissionType::Admin, _) => true,
            (PermissionType::Write, PermissionType::Read) => true,
            (PermissionType::Comments, PermissionType::Read) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for PermissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionType::Read => write!(f, "READ"),
            PermissionType::Write => write!(f, "WRITE"),
            PermissionType::Comments => write!(f, "COMMENTS"),
            PermissionType::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for PermissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(PermissionType::Read),
            "write" => Ok(PermissionType::Write),
            "comments" | "comment" => Ok(PermissionType::Comments),
            "admin" => Ok(PermissionType::Admin),
            other => Err(format!("unknown permission '{}'", other)),
        }
    }
}

/// The subject an entry grants a permission to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Principal {
    User(String),
    Group(String),
}

impl Principal {
    /// Whether this principal names `user` or one of its groups.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Principal::User(name) => *name == user.username,
            Principal::Group(name) => user.groups.iter().any(|g| g == name),
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principal::User(name) => write!(f, "user:{}", name),
            Principal::Group(name) => write!(f, "group:{}", name),
        }
    }
}

/// A single grant of a permission to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ace {
    pub principal: Principal,
    pub permission: PermissionType,
}

impl Ace {
    pub fn new(principal: Principal, permission: PermissionType) -> Self {
        Self {
            principal,
            permission,
        }
    }

    pub fn user(name: impl Into<String>, permission: PermissionType) -> Self {
        Self::new(Principal::User(name.into()), permission)
    }

    pub fn group(name: impl Into<String>, permission: PermissionType) -> Self {
        Self::new(Principal::Group(name.into()), permission)
    }

    /// Whether this entry lets `user` do something needing `required`.
    pub fn grants(&self, user: &User, required: PermissionType) -> bool {
        self.principal.matches(user) && self.permission.implies(required)
    }
}

/// Ordered set of entries attached to one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    /// The location this list is attached to.
    pub id: String,
    pub description: String,
    pub aces: Vec<Ace>,
}

impl Acl {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            aces: Vec::new(),
        }
    }

    pub fn with_ace(mut self, ace: Ace) -> Self {
        self.push(ace);
        self
    }

    /// Append an entry, skipping exact duplicates.
    pub fn push(&mut self, ace: Ace) {
        if !self.aces.contains(&ace) {
            self.aces.push(ace);
        }
    }

    pub fn grants(&self, user: &User, required: PermissionType) -> bool {
        self.aces.iter().any(|ace| ace.grants(user, required))
    }
}
